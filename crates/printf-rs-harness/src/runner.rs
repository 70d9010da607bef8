//! Test execution engine.

use std::cell::Cell;

use printf_rs_core::{fprintf, Arg};

use crate::diff;
use crate::fixtures::{FixtureArg, FixtureCase, FixtureSet};
use crate::verify::VerificationResult;

/// Runs a fixture set and collects verification results.
pub struct TestRunner {
    /// Name of the test campaign.
    pub campaign: String,
}

impl TestRunner {
    /// Create a new test runner.
    #[must_use]
    pub fn new(campaign: impl Into<String>) -> Self {
        Self {
            campaign: campaign.into(),
        }
    }

    /// Run all fixtures in a set and return results.
    pub fn run(&self, fixture_set: &FixtureSet) -> Vec<VerificationResult> {
        fixture_set
            .cases
            .iter()
            .map(|case| {
                let (actual, diff) = execute_case(case);
                let expected = expected_text(case);
                VerificationResult {
                    case_name: case.name.clone(),
                    spec_section: case.spec_section.clone(),
                    passed: diff.is_none(),
                    expected,
                    actual,
                    diff,
                }
            })
            .collect()
    }
}

fn expected_text(case: &FixtureCase) -> String {
    format!("ret={} out={:?}", case.expected_return, case.expected_output)
}

/// Execute one case against the core and return the observed behavior and
/// a diff when it deviates.
fn execute_case(case: &FixtureCase) -> (String, Option<String>) {
    // Writeback cells must outlive the argument slice borrowing them.
    let cell_count = case
        .args
        .iter()
        .filter(|arg| matches!(arg, FixtureArg::Count))
        .count();
    let cells: Vec<Cell<i64>> = (0..cell_count).map(|_| Cell::new(0)).collect();

    let mut next_cell = 0;
    let mut args: Vec<Arg<'_>> = Vec::with_capacity(case.args.len());
    for arg in &case.args {
        args.push(match arg {
            FixtureArg::Int(value) => Arg::Int(*value),
            FixtureArg::Uint(value) => Arg::Uint(*value),
            FixtureArg::Float(value) => Arg::Float(*value),
            FixtureArg::Str(text) => Arg::Str(Some(text.as_bytes())),
            FixtureArg::NullStr => Arg::Str(None),
            FixtureArg::Ptr(value) => Arg::Ptr(*value),
            FixtureArg::Count => {
                let cell = &cells[next_cell];
                next_cell += 1;
                Arg::Count(Some(cell))
            }
            FixtureArg::NullCount => Arg::Count(None),
        });
    }

    let mut out = Vec::new();
    let ret = fprintf(&mut out, case.template.as_bytes(), &args);
    let rendered = String::from_utf8_lossy(&out).into_owned();
    let actual = format!("ret={ret} out={rendered:?}");

    let output_matches = ret < 0 || rendered == case.expected_output;
    let return_matches = ret == case.expected_return;
    if output_matches && return_matches {
        (actual, None)
    } else if output_matches {
        let note = format!(
            "return mismatch: expected {}, actual {ret}",
            case.expected_return
        );
        (actual, Some(note))
    } else {
        let diff_out = diff::render_diff(&case.expected_output, &rendered);
        (actual, Some(diff_out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FixtureSet;

    #[test]
    fn runner_passes_matching_case() {
        let fixture = FixtureSet::from_json(
            r#"{
                "version":"v1",
                "family":"printf/int",
                "cases":[
                    {"name":"neg","spec_section":"C99 7.19.6.1","template":"%d",
                     "args":[{"int":-5}],"expected_output":"-5","expected_return":2},
                    {"name":"hex","spec_section":"C99 7.19.6.1","template":"%#010x",
                     "args":[{"uint":255}],"expected_output":"0x000000ff","expected_return":10}
                ]
            }"#,
        )
        .expect("valid fixture json");

        let results = TestRunner::new("smoke").run(&fixture);
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.passed), "{results:?}");
    }

    #[test]
    fn runner_reports_diff_on_mismatch() {
        let fixture = FixtureSet::from_json(
            r#"{
                "version":"v1",
                "family":"printf/int",
                "cases":[
                    {"name":"wrong","spec_section":"C99 7.19.6.1","template":"%d",
                     "args":[{"int":5}],"expected_output":"six","expected_return":3}
                ]
            }"#,
        )
        .expect("valid fixture json");

        let results = TestRunner::new("smoke").run(&fixture);
        assert!(!results[0].passed);
        assert!(results[0].diff.is_some());
    }

    #[test]
    fn runner_handles_failing_call_expectation() {
        let fixture = FixtureSet::from_json(
            r#"{
                "version":"v1",
                "family":"printf/error",
                "cases":[
                    {"name":"float","spec_section":"C99 7.19.6.1","template":"%f",
                     "args":[{"float":1.5}],"expected_output":"","expected_return":-1}
                ]
            }"#,
        )
        .expect("valid fixture json");

        let results = TestRunner::new("smoke").run(&fixture);
        assert!(results[0].passed, "{results:?}");
    }

    #[test]
    fn runner_threads_count_writeback() {
        let fixture = FixtureSet::from_json(
            r#"{
                "version":"v1",
                "family":"printf/n",
                "cases":[
                    {"name":"count","spec_section":"C99 7.19.6.1","template":"abc%n",
                     "args":["count"],"expected_output":"abc","expected_return":3}
                ]
            }"#,
        )
        .expect("valid fixture json");

        let results = TestRunner::new("smoke").run(&fixture);
        assert!(results[0].passed, "{results:?}");
    }
}
