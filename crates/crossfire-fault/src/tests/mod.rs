//! Scenario tests for the fault lifecycle.
//!
//! | Module | Covers |
//! |--------|--------|
//! | lifecycle | inject, expiry, removal, reporting |
//! | concurrency | racing removals, duplicate kinds, cancellation |
//! | invariants | property tests over arbitrary operation sequences |

pub mod invariants;

pub use mocks::MockControlPlane;
