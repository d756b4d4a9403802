//! Crossfire: fault injection and cross-cluster security verification.
//!
//! Facade over the workspace crates.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use crossfire::prelude::*;
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let manager = FaultLifecycleManager::simulated();
//! manager.inject(FaultKind::NetworkPartition, 60).await?;
//!
//! let suite = VerificationSuite::from_config_path("config.json")?;
//! let outcome = suite.run_all().await;
//! println!("all passed: {}", outcome.passed());
//! # Ok(())
//! # }
//! ```

pub use crossfire_core as core;
pub use crossfire_fault as fault;
pub use crossfire_verify as verify;

/// Prelude module for common imports.
pub mod prelude {
    pub use crossfire_core::{ClusterEndpoints, ProbeSettings, VerificationConfig};
    pub use crossfire_fault::{
        ActiveFault, FaultKind, FaultLifecycleManager, FaultRecord, FaultReport, FaultStatus,
    };
    pub use crossfire_verify::{
        Category, SecurityReport, SuiteOutcome, VerificationResult, VerificationSuite,
    };
}
