//! Fixture loading and management.

use serde::{Deserialize, Serialize};

/// One argument of a fixture call, mirroring the core's typed argument
/// variants in serializable form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixtureArg {
    /// A signed integer (also feeds `%c` and `*` width/precision).
    Int(i64),
    /// An unsigned integer.
    Uint(u64),
    /// A float (parses, never renders).
    Float(f64),
    /// A string argument.
    Str(String),
    /// A null string pointer.
    NullStr,
    /// A pointer value; 0 is null.
    Ptr(usize),
    /// A live `%n` writeback target.
    Count,
    /// A null `%n` writeback target.
    NullCount,
}

/// A single fixture test case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureCase {
    /// Case identifier.
    pub name: String,
    /// C spec section reference.
    pub spec_section: String,
    /// The printf template.
    pub template: String,
    /// Arguments, in declaration order.
    pub args: Vec<FixtureArg>,
    /// Expected rendered output.
    pub expected_output: String,
    /// Expected return value (-1 for failing calls).
    pub expected_return: i32,
}

/// A collection of fixture cases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureSet {
    /// Schema version.
    pub version: String,
    /// Function family name.
    pub family: String,
    /// Individual test cases.
    pub cases: Vec<FixtureCase>,
}

impl FixtureSet {
    /// Load fixture set from JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize fixture set to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load fixture set from a file path.
    pub fn from_file(path: &std::path::Path) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let set = Self::from_json(&content)?;
        Ok(set)
    }
}
