// Iron Lotus: Allow unwrap/expect in tests for clear failure messages
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

//! # crossfire-verify
//!
//! Security and connectivity verification for a two-cluster deployment.
//!
//! Six categories run in a fixed order:
//!
//! | Category | Probes |
//! |----------|--------|
//! | Network Connectivity | TCP connect C1→C2 and C2→C1 |
//! | Public Access Verification | HTTPS GET on public endpoints must be refused |
//! | Cross-Cluster Communication | owners on C1, then visits on C2 |
//! | Security Controls | WAF payloads, rate-limit burst, payload filtering |
//! | Service Health | `/actuator/health` reports `UP` |
//! | Load Balancer Configuration | simulated inspections |
//!
//! ## Example
//!
//! ```rust,no_run
//! use crossfire_verify::VerificationSuite;
//!
//! # async fn demo() -> crossfire_verify::Result<()> {
//! let suite = VerificationSuite::from_config_path("config.json")?;
//! let outcome = suite.run_all().await;
//! print!("{}", outcome.render());
//! suite.report(&outcome).write_to("security_report.json")?;
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod checks;
pub mod error;
pub mod result;
pub mod suite;
pub mod transport;
#[cfg(test)]
pub mod tests;

pub use checks::{Category, HealthProbe, probe_health};
pub use error::{ProbeError, ProbeResult, Result, VerifyError};
pub use result::{ReportSummary, SecurityReport, VerificationResult, render_summary};
pub use suite::{SuiteOutcome, VerificationSuite};
pub use transport::{HttpResponse, NetworkTransport, Transport};
