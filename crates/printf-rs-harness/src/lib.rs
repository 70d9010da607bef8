//! Conformance testing harness for printf_rust.
//!
//! This crate provides:
//! - Fixture sets: JSON-described printf calls with expected output and
//!   return values
//! - A runner executing fixture cases against `printf-rs-core`
//! - Diff rendering for failed cases
//! - Markdown + JSON conformance reports
//! - JSONL structured logging for harness runs

#![forbid(unsafe_code)]

pub mod diff;
pub mod fixtures;
pub mod report;
pub mod runner;
pub mod structured_log;
pub mod verify;

pub use fixtures::{FixtureArg, FixtureCase, FixtureSet};
pub use report::ConformanceReport;
pub use runner::TestRunner;
pub use verify::{VerificationResult, VerificationSummary};
