//! Fault records and their lifecycle state.
//!
//! State transitions follow a strict state machine:
//! ```text
//! Active → Removed
//! ```
//! A record leaves `Active` exactly once and never returns.

use serde::{Deserialize, Serialize};

use crate::kind::FaultKind;

/// Unique identifier for one injected fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FaultId(uuid::Uuid);

impl FaultId {
    /// Creates a new random fault ID.
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Returns the inner UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }
}

impl Default for FaultId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for FaultId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle status of a fault record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FaultStatus {
    /// Fault is switched on.
    Active,
    /// Fault has been switched off.
    Removed,
}

/// One tracked instance of an injected fault.
///
/// `end_time` is present iff `status` is [`FaultStatus::Removed`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaultRecord {
    /// Record identity.
    pub id: FaultId,
    /// Fault kind.
    #[serde(rename = "type")]
    pub kind: FaultKind,
    /// Injection time, epoch seconds.
    pub start_time: f64,
    /// Removal time, epoch seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<f64>,
    /// Requested lifetime in seconds.
    pub duration: u64,
    /// Lifecycle status.
    pub status: FaultStatus,
}

impl FaultRecord {
    /// Creates an active record started at `start_time`.
    #[must_use]
    pub fn active(kind: FaultKind, start_time: f64, duration: u64) -> Self {
        Self {
            id: FaultId::new(),
            kind,
            start_time,
            end_time: None,
            duration,
            status: FaultStatus::Active,
        }
    }

    /// Returns true if the fault is still switched on.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == FaultStatus::Active
    }

    /// Seconds left before expiry at `now`; negative once overdue.
    #[must_use]
    pub fn remaining_secs(&self, now: f64) -> f64 {
        self.duration as f64 - (now - self.start_time)
    }

    /// Transitions the record to removed at `now`.
    ///
    /// Returns false, leaving the record untouched, if it was already removed.
    pub fn mark_removed(&mut self, now: f64) -> bool {
        if !self.is_active() {
            return false;
        }
        self.status = FaultStatus::Removed;
        self.end_time = Some(now);
        true
    }
}

/// An active fault as shown to operators.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveFault {
    /// Record identity.
    pub id: FaultId,
    /// Fault kind.
    pub kind: FaultKind,
    /// Seconds until expiry; negative if the expiry task is late.
    pub remaining_secs: f64,
}
