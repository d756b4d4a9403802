//! Fault lifecycle error types.

use crossfire_core::CoreError;

use crate::kind::FaultKind;

/// Result type alias for fault operations.
pub type Result<T> = std::result::Result<T, FaultError>;

/// Errors raised by the fault lifecycle manager.
///
/// Failures inside one fault are contained to that fault: a
/// [`FaultError::DeactivationFailed`] during `remove_all` does not abort
/// the remaining removals.
#[derive(Debug, thiserror::Error)]
pub enum FaultError {
    /// Name does not match any catalog entry.
    #[error("unknown fault type: {0}")]
    UnknownFaultKind(String),

    /// Requested lifetime must be at least one second.
    #[error("fault duration must be greater than 0 seconds")]
    InvalidDuration,

    /// Control plane could not switch the fault on.
    #[error("failed to inject fault '{kind}': {reason}")]
    ActivationFailed {
        /// Fault kind.
        kind: FaultKind,
        /// Failure description from the control plane.
        reason: String,
    },

    /// Control plane could not switch the fault off.
    #[error("failed to remove fault '{kind}': {reason}")]
    DeactivationFailed {
        /// Fault kind.
        kind: FaultKind,
        /// Failure description from the control plane.
        reason: String,
    },

    /// Report could not be persisted.
    #[error("report error: {0}")]
    Report(#[from] CoreError),
}

impl FaultError {
    /// Creates an activation failure.
    #[must_use]
    pub fn activation_failed(kind: FaultKind, reason: impl Into<String>) -> Self {
        Self::ActivationFailed {
            kind,
            reason: reason.into(),
        }
    }

    /// Creates a deactivation failure.
    #[must_use]
    pub fn deactivation_failed(kind: FaultKind, reason: impl Into<String>) -> Self {
        Self::DeactivationFailed {
            kind,
            reason: reason.into(),
        }
    }

    /// Returns the fault kind involved, if any.
    #[must_use]
    pub const fn kind(&self) -> Option<FaultKind> {
        match self {
            Self::ActivationFailed { kind, .. } | Self::DeactivationFailed { kind, .. } => {
                Some(*kind)
            }
            Self::UnknownFaultKind(_) | Self::InvalidDuration | Self::Report(_) => None,
        }
    }
}
