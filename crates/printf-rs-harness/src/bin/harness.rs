//! CLI entrypoint for the printf_rust conformance harness.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use printf_rs_harness::structured_log::{LogEmitter, LogEntry, LogLevel, Outcome};
use printf_rs_harness::{ConformanceReport, FixtureSet, TestRunner, VerificationSummary};

/// Conformance tooling for printf_rust.
#[derive(Debug, Parser)]
#[command(name = "printf-rs-harness")]
#[command(about = "Conformance testing harness for printf_rust")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run a fixture set against the implementation.
    Verify {
        /// Fixture JSON file.
        #[arg(long)]
        fixture: PathBuf,
        /// Campaign name recorded in reports and logs.
        #[arg(long, default_value = "local")]
        campaign: String,
        /// Output report path (markdown).
        #[arg(long)]
        report_md: Option<PathBuf>,
        /// Output report path (JSON).
        #[arg(long)]
        report_json: Option<PathBuf>,
        /// Structured JSONL log path (appended).
        #[arg(long)]
        log: Option<PathBuf>,
    },
    /// Render a diff between expected and actual text values.
    Diff {
        /// Expected text payload.
        #[arg(long)]
        expected: String,
        /// Actual text payload.
        #[arg(long)]
        actual: String,
    },
    /// Parse one directive and dump the resulting specifier.
    Explain {
        /// The directive, with or without the leading '%'.
        directive: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match cli.command {
        Command::Verify {
            fixture,
            campaign,
            report_md,
            report_json,
            log,
        } => run_verify(&fixture, &campaign, report_md, report_json, log),
        Command::Diff { expected, actual } => {
            println!("{}", printf_rs_harness::diff::render_diff(&expected, &actual));
            ExitCode::SUCCESS
        }
        Command::Explain { directive } => run_explain(&directive),
    }
}

fn run_verify(
    fixture: &PathBuf,
    campaign: &str,
    report_md: Option<PathBuf>,
    report_json: Option<PathBuf>,
    log: Option<PathBuf>,
) -> ExitCode {
    let set = match FixtureSet::from_file(fixture) {
        Ok(set) => set,
        Err(err) => {
            eprintln!("failed to load fixture {}: {err}", fixture.display());
            return ExitCode::FAILURE;
        }
    };

    let mut emitter = match &log {
        Some(path) => match LogEmitter::file(path) {
            Ok(emitter) => Some(emitter),
            Err(err) => {
                eprintln!("failed to open log {}: {err}", path.display());
                return ExitCode::FAILURE;
            }
        },
        None => None,
    };

    let runner = TestRunner::new(campaign);
    let results = runner.run(&set);

    if let Some(emitter) = &mut emitter {
        for result in &results {
            let outcome = if result.passed {
                Outcome::Pass
            } else {
                Outcome::Fail
            };
            let entry = LogEntry::new(campaign, LogLevel::Info, "case_finished")
                .with_case(result.case_name.as_str())
                .with_outcome(outcome);
            if let Err(err) = emitter.emit(&entry) {
                eprintln!("failed to write log entry: {err}");
                return ExitCode::FAILURE;
            }
        }
    }

    let summary = VerificationSummary::from_results(results);
    let all_passed = summary.all_passed();
    let report = ConformanceReport {
        title: format!("printf conformance: {}", set.family),
        campaign: campaign.to_string(),
        summary,
    };

    println!(
        "{}: {} total, {} passed, {} failed",
        set.family, report.summary.total, report.summary.passed, report.summary.failed
    );

    if let Some(path) = report_md {
        if let Err(err) = std::fs::write(&path, report.to_markdown()) {
            eprintln!("failed to write {}: {err}", path.display());
            return ExitCode::FAILURE;
        }
    }
    if let Some(path) = report_json {
        if let Err(err) = std::fs::write(&path, report.to_json()) {
            eprintln!("failed to write {}: {err}", path.display());
            return ExitCode::FAILURE;
        }
    }

    if all_passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn run_explain(directive: &str) -> ExitCode {
    let body = directive.strip_prefix('%').unwrap_or(directive);
    match printf_rs_core::parse_specifier(body.as_bytes()) {
        Ok(parsed) => {
            println!("directive: {}", parsed.spec);
            println!("warning:   {:?}", parsed.warning);
            println!("{:#?}", parsed.spec);
            ExitCode::SUCCESS
        }
        Err(diag) => {
            eprintln!("parse failed: {diag}");
            ExitCode::FAILURE
        }
    }
}
