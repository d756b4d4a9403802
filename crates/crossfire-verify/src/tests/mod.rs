//! Scenario tests for the verification suite.
//!
//! | Module | Covers |
//! |--------|--------|
//! | categories | per-category verdicts against a scripted transport |
//! | suite | ordering, aggregation, error containment |
//! | network | the real transport against local listeners |

pub mod categories;
pub mod suite;

pub use mocks::MockTransport;

use crossfire_core::{ClusterEndpoints, VerificationConfig};

/// Two-cluster layout used by the scenarios.
pub fn test_config() -> VerificationConfig {
    VerificationConfig::new(
        ClusterEndpoints::new("c1.example:8080", "public-c1.example", "customers.c1"),
        ClusterEndpoints::new("c2.example:8080", "public-c2.example", "visits.c2"),
    )
}
