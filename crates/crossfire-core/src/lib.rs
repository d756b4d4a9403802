// Iron Lotus: Allow unwrap/expect in tests for clear failure messages
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

//! # crossfire-core
//!
//! Shared primitives for the Crossfire fault-injection and verification tools.
//!
//! - [`VerificationConfig`] for the two-cluster endpoint layout and probe tuning
//! - [`Clock`] for report timestamps that agree with tokio timers
//! - [`write_json_report`] for persisting structured reports
//! - [`logging::init`] for the tracing subscriber used by the binaries
//!
//! ## Iron Lotus Framework
//!
//! - **Jidoka**: Explicit error handling, no panics
//! - **Poka-Yoke**: Configuration validated at load time

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;
pub mod report;

pub use clock::Clock;
pub use config::{
    ClusterEndpoints, DEFAULT_FAULT_CONFIG, DEFAULT_VERIFY_CONFIG, ProbeSettings,
    VerificationConfig,
};
pub use error::{CoreError, Result};
pub use report::write_json_report;
