//! Structured logging contract for printf_rust harness runs.
//!
//! Provides:
//! - [`LogEntry`]: canonical JSONL log record with required + optional fields.
//! - [`LogEmitter`]: writes JSONL lines to a file or stdout.
//! - [`validate_log_line`]: validates a single JSONL line against the schema.

use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

// ---------------------------------------------------------------------------
// Log entry
// ---------------------------------------------------------------------------

/// Severity level for log entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

/// Test/verification outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Pass,
    Fail,
    Error,
}

/// Canonical structured log entry.
///
/// Required fields: `timestamp`, `campaign`, `level`, `event`. Optional
/// fields carry per-case context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    // Required
    pub timestamp: String,
    pub campaign: String,
    pub level: LogLevel,
    pub event: String,

    // Optional
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl LogEntry {
    /// Create a new log entry with required fields only.
    #[must_use]
    pub fn new(campaign: impl Into<String>, level: LogLevel, event: impl Into<String>) -> Self {
        Self {
            timestamp: unix_timestamp(),
            campaign: campaign.into(),
            level,
            event: event.into(),
            case: None,
            outcome: None,
            details: None,
        }
    }

    /// Attach a case name.
    #[must_use]
    pub fn with_case(mut self, case: impl Into<String>) -> Self {
        self.case = Some(case.into());
        self
    }

    /// Attach an outcome.
    #[must_use]
    pub fn with_outcome(mut self, outcome: Outcome) -> Self {
        self.outcome = Some(outcome);
        self
    }

    /// Serialize to one JSONL line (no trailing newline).
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Seconds since the Unix epoch, as a string.
fn unix_timestamp() -> String {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| String::from("0"))
}

// ---------------------------------------------------------------------------
// Emitter
// ---------------------------------------------------------------------------

/// Writes JSONL log lines to a file or stdout.
pub struct LogEmitter {
    target: Option<std::fs::File>,
}

impl LogEmitter {
    /// Emit to stdout.
    #[must_use]
    pub fn stdout() -> Self {
        Self { target: None }
    }

    /// Emit to a file, appending.
    pub fn file(path: &Path) -> std::io::Result<Self> {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        Ok(Self { target: Some(file) })
    }

    /// Write one entry as a JSONL line.
    pub fn emit(&mut self, entry: &LogEntry) -> std::io::Result<()> {
        let line = entry
            .to_jsonl()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        match &mut self.target {
            Some(file) => writeln!(file, "{line}"),
            None => writeln!(std::io::stdout(), "{line}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate one JSONL line against the log schema.
pub fn validate_log_line(line: &str) -> Result<LogEntry, String> {
    let entry: LogEntry =
        serde_json::from_str(line).map_err(|e| format!("invalid log line: {e}"))?;
    if entry.timestamp.is_empty() {
        return Err("empty timestamp".into());
    }
    if entry.campaign.is_empty() {
        return Err("empty campaign".into());
    }
    if entry.event.is_empty() {
        return Err("empty event".into());
    }
    Ok(entry)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_round_trips_and_validates() {
        let entry = LogEntry::new("smoke", LogLevel::Info, "case_finished")
            .with_case("neg")
            .with_outcome(Outcome::Pass);
        let line = entry.to_jsonl().expect("serialize");
        let back = validate_log_line(&line).expect("validates");
        assert_eq!(back.case.as_deref(), Some("neg"));
        assert_eq!(back.outcome, Some(Outcome::Pass));
    }

    #[test]
    fn optional_fields_are_omitted() {
        let entry = LogEntry::new("smoke", LogLevel::Debug, "run_started");
        let line = entry.to_jsonl().expect("serialize");
        assert!(!line.contains("\"case\""));
        assert!(!line.contains("\"outcome\""));
    }

    #[test]
    fn invalid_lines_are_rejected() {
        assert!(validate_log_line("not json").is_err());
        assert!(validate_log_line(r#"{"timestamp":"","campaign":"x","level":"info","event":"e"}"#).is_err());
    }
}
