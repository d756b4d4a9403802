//! Verification suite runner.
//!
//! Runs every [`Category`] in order against one [`Transport`]. A category
//! failing, or erroring, never stops the run; the overall verdict is the
//! logical AND of all category results.

use std::path::Path;
use std::sync::Arc;

use crossfire_core::{Clock, VerificationConfig};
use tracing::{error, info};

use crate::checks::Category;
use crate::error::{Result, VerifyError};
use crate::result::{ReportSummary, SecurityReport, VerificationResult, render_summary};
use crate::transport::{NetworkTransport, Transport};

/// Results of a completed run.
#[derive(Debug, Clone, PartialEq)]
pub struct SuiteOutcome {
    /// One result per category, in execution order.
    pub results: Vec<VerificationResult>,
}

impl SuiteOutcome {
    /// Returns true if every category passed.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.results.iter().all(|r| r.passed)
    }

    /// Returns the pass/fail counts.
    #[must_use]
    pub fn summary(&self) -> ReportSummary {
        ReportSummary::from_results(&self.results)
    }

    /// Renders the human-readable summary.
    #[must_use]
    pub fn render(&self) -> String {
        render_summary(&self.results)
    }

    /// Builds the persisted report.
    #[must_use]
    pub fn report(&self, timestamp: f64) -> SecurityReport {
        SecurityReport::new(timestamp, self.results.clone())
    }

    /// Returns the result recorded for `category`.
    #[must_use]
    pub fn result(&self, category: Category) -> Option<&VerificationResult> {
        self.results
            .iter()
            .find(|r| r.test_name == category.result_name())
    }
}

/// Security and connectivity verification across both clusters.
pub struct VerificationSuite {
    config: VerificationConfig,
    transport: Arc<dyn Transport>,
    clock: Clock,
}

impl std::fmt::Debug for VerificationSuite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerificationSuite")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl VerificationSuite {
    /// Creates a suite probing through `transport`.
    #[must_use]
    pub fn new(config: VerificationConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            config,
            transport,
            clock: Clock::new(),
        }
    }

    /// Loads `path` and creates a suite using the real network.
    ///
    /// # Errors
    /// Returns an error if the configuration is missing or invalid, or the
    /// HTTP client cannot be built.
    pub fn from_config_path(path: impl AsRef<Path>) -> Result<Self> {
        let config = VerificationConfig::load(path)?;
        let transport =
            NetworkTransport::new().map_err(|e| VerifyError::Transport(e.to_string()))?;
        Ok(Self::new(config, Arc::new(transport)))
    }

    /// Returns the loaded configuration.
    #[must_use]
    pub const fn config(&self) -> &VerificationConfig {
        &self.config
    }

    /// Runs one category, converting a probe error into a failed result.
    pub async fn run_category(&self, category: Category) -> VerificationResult {
        info!(category = %category, "running verification category");
        match category.run(self.transport.as_ref(), &self.config).await {
            Ok(result) => {
                info!(
                    category = %category,
                    passed = result.passed,
                    message = %result.message,
                    "category finished"
                );
                result
            }
            Err(e) => {
                error!(category = %category, error = %e, "category errored");
                VerificationResult::fail(category.result_name(), format!("Error: {e}"))
            }
        }
    }

    /// Runs every category in order.
    pub async fn run_all(&self) -> SuiteOutcome {
        info!("starting cross-cluster security verification");
        let mut results = Vec::with_capacity(Category::ALL.len());
        for category in Category::ALL {
            results.push(self.run_category(category).await);
        }
        let outcome = SuiteOutcome { results };
        let summary = outcome.summary();
        info!(
            passed = summary.passed_tests,
            total = summary.total_tests,
            "verification finished"
        );
        outcome
    }

    /// Builds a report for `outcome` stamped with the current time.
    #[must_use]
    pub fn report(&self, outcome: &SuiteOutcome) -> SecurityReport {
        outcome.report(self.clock.now())
    }
}
