//! Integration test: fixture pipeline.
//!
//! Loads the shipped fixture set, runs it through the runner, and renders
//! both report shapes. The shipped set must pass in full — it is the
//! executable form of the implementation's external contract.
//!
//! Run: cargo test -p printf-rs-harness --test fixture_pipeline_test

use std::path::Path;

use printf_rs_harness::structured_log::{validate_log_line, LogEntry, LogLevel, Outcome};
use printf_rs_harness::{ConformanceReport, FixtureSet, TestRunner, VerificationSummary};

fn shipped_fixture() -> FixtureSet {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/printf_core.v1.json");
    FixtureSet::from_file(&path).expect("shipped fixture loads")
}

#[test]
fn shipped_fixture_set_passes_in_full() {
    let set = shipped_fixture();
    let results = TestRunner::new("pipeline").run(&set);
    let summary = VerificationSummary::from_results(results);
    let failed: Vec<_> = summary
        .results
        .iter()
        .filter(|r| !r.passed)
        .map(|r| (&r.case_name, &r.expected, &r.actual))
        .collect();
    assert!(summary.all_passed(), "failing cases: {failed:?}");
}

#[test]
fn report_renders_both_shapes() {
    let set = shipped_fixture();
    let results = TestRunner::new("pipeline").run(&set);
    let report = ConformanceReport {
        title: format!("printf conformance: {}", set.family),
        campaign: "pipeline".into(),
        summary: VerificationSummary::from_results(results),
    };

    let md = report.to_markdown();
    assert!(md.contains("# printf conformance: printf/core"));
    assert!(md.contains("| positional_reorder |"));

    let json = report.to_json();
    let parsed: serde_json::Value = serde_json::from_str(&json).expect("valid json");
    assert_eq!(parsed["summary"]["failed"], 0);
}

#[test]
fn log_entries_for_a_run_validate() {
    let set = shipped_fixture();
    let results = TestRunner::new("pipeline").run(&set);
    for result in &results {
        let outcome = if result.passed {
            Outcome::Pass
        } else {
            Outcome::Fail
        };
        let entry = LogEntry::new("pipeline", LogLevel::Info, "case_finished")
            .with_case(result.case_name.as_str())
            .with_outcome(outcome);
        let line = entry.to_jsonl().expect("serializes");
        validate_log_line(&line).expect("validates");
    }
}
