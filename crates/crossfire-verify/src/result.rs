//! Verification results and the security report.

use std::fmt::Write as _;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;

/// Outcome of one verification category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationResult {
    /// Category result name, e.g. "Service Health".
    pub test_name: String,
    /// Whether the category passed.
    pub passed: bool,
    /// Human-readable outcome.
    pub message: String,
    /// Per-check observations.
    pub details: Option<Map<String, Value>>,
}

impl VerificationResult {
    /// Creates a passing result.
    #[must_use]
    pub fn pass(test_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(test_name, true, message)
    }

    /// Creates a failing result.
    #[must_use]
    pub fn fail(test_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(test_name, false, message)
    }

    /// Creates a result with an explicit verdict.
    #[must_use]
    pub fn new(test_name: impl Into<String>, passed: bool, message: impl Into<String>) -> Self {
        Self {
            test_name: test_name.into(),
            passed,
            message: message.into(),
            details: None,
        }
    }

    /// Attaches per-check details.
    #[must_use]
    pub fn with_details(mut self, details: Map<String, Value>) -> Self {
        self.details = Some(details);
        self
    }

    /// Returns the value recorded under `key` in the details.
    #[must_use]
    pub fn detail(&self, key: &str) -> Option<&Value> {
        self.details.as_ref().and_then(|d| d.get(key))
    }
}

/// Pass/fail counts over a result list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Number of results.
    pub total_tests: usize,
    /// Number of passing results.
    pub passed_tests: usize,
    /// Number of failing results.
    pub failed_tests: usize,
}

impl ReportSummary {
    /// Counts the results.
    #[must_use]
    pub fn from_results(results: &[VerificationResult]) -> Self {
        let passed_tests = results.iter().filter(|r| r.passed).count();
        Self {
            total_tests: results.len(),
            passed_tests,
            failed_tests: results.len() - passed_tests,
        }
    }

    /// Returns true if nothing failed.
    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.failed_tests == 0
    }
}

/// Persisted outcome of a verification run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityReport {
    /// Generation time, epoch seconds.
    pub timestamp: f64,
    /// Pass/fail counts.
    pub summary: ReportSummary,
    /// Results in category order.
    pub results: Vec<VerificationResult>,
}

impl SecurityReport {
    /// Builds a report over `results`.
    #[must_use]
    pub fn new(timestamp: f64, results: Vec<VerificationResult>) -> Self {
        Self {
            timestamp,
            summary: ReportSummary::from_results(&results),
            results,
        }
    }

    /// Writes the report as indented JSON.
    ///
    /// # Errors
    /// Returns an error if the file cannot be written.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        crossfire_core::write_json_report(path, self)?;
        Ok(())
    }
}

/// Renders the end-of-run summary.
#[must_use]
pub fn render_summary(results: &[VerificationResult]) -> String {
    let summary = ReportSummary::from_results(results);
    let rule = "=".repeat(60);
    let mut out = String::new();

    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "📊 VERIFICATION SUMMARY");
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(
        out,
        "Tests Passed: {}/{}",
        summary.passed_tests, summary.total_tests
    );
    let _ = writeln!(out);

    for result in results {
        let status = if result.passed { "✅ PASS" } else { "❌ FAIL" };
        let _ = writeln!(out, "{status} {}", result.test_name);
        let _ = writeln!(out, "    {}", result.message);
        if let Some(details) = &result.details {
            for (key, value) in details {
                let _ = writeln!(out, "    {key}: {}", display_value(value));
            }
        }
        let _ = writeln!(out);
    }

    if summary.all_passed() {
        let _ = writeln!(out, "🎉 All security verifications passed! The system is secure.");
    } else {
        let _ = writeln!(
            out,
            "⚠️  Some security verifications failed. Please review the issues above."
        );
    }
    out
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
