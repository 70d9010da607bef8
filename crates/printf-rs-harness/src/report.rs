//! Report generation for conformance results.

use serde::{Deserialize, Serialize};

use crate::verify::VerificationSummary;

/// A conformance report for one harness run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConformanceReport {
    /// Report title.
    pub title: String,
    /// Campaign name the runner was created with.
    pub campaign: String,
    /// Verification summary.
    pub summary: VerificationSummary,
}

impl ConformanceReport {
    /// Render the report as markdown.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("# {}\n\n", self.title));
        out.push_str(&format!("- Campaign: {}\n", self.campaign));
        out.push_str(&format!("- Total: {}\n", self.summary.total));
        out.push_str(&format!("- Passed: {}\n", self.summary.passed));
        out.push_str(&format!("- Failed: {}\n\n", self.summary.failed));

        out.push_str("| Case | Spec | Status |\n");
        out.push_str("|------|------|--------|\n");
        for r in &self.summary.results {
            let status = if r.passed { "PASS" } else { "FAIL" };
            out.push_str(&format!(
                "| {} | {} | {} |\n",
                r.case_name, r.spec_section, status
            ));
        }

        let failures: Vec<_> = self.summary.results.iter().filter(|r| !r.passed).collect();
        if !failures.is_empty() {
            out.push_str("\n## Failures\n");
            for r in failures {
                out.push_str(&format!("\n### {}\n\n", r.case_name));
                out.push_str(&format!("- expected: `{}`\n", r.expected));
                out.push_str(&format!("- actual: `{}`\n", r.actual));
                if let Some(diff) = &r.diff {
                    out.push_str(&format!("\n```\n{diff}\n```\n"));
                }
            }
        }
        out
    }

    /// Render the report as JSON.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verify::VerificationResult;

    #[test]
    fn markdown_lists_every_case() {
        let report = ConformanceReport {
            title: "printf conformance".into(),
            campaign: "smoke".into(),
            summary: VerificationSummary::from_results(vec![
                VerificationResult {
                    case_name: "neg".into(),
                    spec_section: "C99 7.19.6.1".into(),
                    passed: true,
                    expected: "ret=2".into(),
                    actual: "ret=2".into(),
                    diff: None,
                },
                VerificationResult {
                    case_name: "bad".into(),
                    spec_section: "C99 7.19.6.1".into(),
                    passed: false,
                    expected: "ret=2".into(),
                    actual: "ret=-1".into(),
                    diff: Some("-x\n+y".into()),
                },
            ]),
        };
        let md = report.to_markdown();
        assert!(md.contains("| neg |"));
        assert!(md.contains("| bad |"));
        assert!(md.contains("## Failures"));

        let json = report.to_json();
        assert!(json.contains("\"failed\": 1"));
    }
}
