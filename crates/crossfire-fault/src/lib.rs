// Iron Lotus: Allow unwrap/expect in tests for clear failure messages
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

//! # crossfire-fault
//!
//! Timed fault injection for a two-cluster deployment.
//!
//! - [`FaultKind`] closed catalog of simulated failure modes
//! - [`FaultLifecycleManager`] activates faults, expires them on background
//!   timers, and supports early and bulk removal
//! - [`ControlPlane`] seam for the infrastructure side effects, with
//!   [`SimulatedControlPlane`] logging what it would change
//! - [`FaultReport`] registry snapshot for persistence
//!
//! ## Example
//!
//! ```rust,no_run
//! use crossfire_fault::{FaultKind, FaultLifecycleManager};
//!
//! # async fn demo() -> crossfire_fault::Result<()> {
//! let manager = FaultLifecycleManager::simulated();
//! manager.inject(FaultKind::LatencyInjection, 300).await?;
//! for fault in manager.list_active() {
//!     println!("{}: {:.0}s remaining", fault.kind, fault.remaining_secs);
//! }
//! manager.remove_all().await;
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod control;
pub mod error;
pub mod kind;
pub mod manager;
pub mod record;
pub mod report;
#[cfg(test)]
pub mod tests;

pub use control::{ControlPlane, ControlPlaneError, ControlPlaneResult, SimulatedControlPlane};
pub use error::{FaultError, Result};
pub use kind::{CatalogEntry, FaultKind, FaultPlan, FaultTarget, catalog};
pub use manager::{FaultLifecycleManager, RemovalSummary};
pub use record::{ActiveFault, FaultId, FaultRecord, FaultStatus};
pub use report::FaultReport;
