//! Infrastructure control plane abstraction.
//!
//! # Toyota Way: Standardized Work (標準作業)
//! Every control plane follows the same contract: switch one fault kind
//! on or off, and report failure explicitly.

use async_trait::async_trait;

use crate::kind::{FaultKind, FaultPlan};

/// Error type for control plane operations.
#[derive(Debug, thiserror::Error)]
pub enum ControlPlaneError {
    /// Control plane could not be reached.
    #[error("control plane unavailable: {0}")]
    Unavailable(String),

    /// Control plane refused the change.
    #[error("change rejected for {kind}: {reason}")]
    Rejected {
        /// Fault kind.
        kind: FaultKind,
        /// Rejection reason.
        reason: String,
    },
}

impl ControlPlaneError {
    /// Creates an unavailable error.
    #[must_use]
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Creates a rejected error.
    #[must_use]
    pub fn rejected(kind: FaultKind, reason: impl Into<String>) -> Self {
        Self::Rejected {
            kind,
            reason: reason.into(),
        }
    }
}

/// Result type for control plane operations.
pub type ControlPlaneResult<T> = std::result::Result<T, ControlPlaneError>;

/// Applies fault side effects to the deployment.
#[async_trait]
pub trait ControlPlane: Send + Sync {
    /// Returns the control plane name for logs.
    fn name(&self) -> &'static str;

    /// Switches `kind` on.
    async fn activate(&self, kind: FaultKind) -> ControlPlaneResult<()>;

    /// Switches `kind` off.
    async fn deactivate(&self, kind: FaultKind) -> ControlPlaneResult<()>;
}

/// Control plane that only logs the changes it would make.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedControlPlane;

impl SimulatedControlPlane {
    /// Creates a simulated control plane.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn apply(kind: FaultKind, plan: &FaultPlan) {
        tracing::info!(fault = %kind, target = %kind.target(), "{}", plan.summary);
        for (key, value) in plan.config_updates {
            tracing::info!(fault = %kind, key, value, "updating chaos monkey config");
        }
        for step in plan.steps {
            tracing::info!(fault = %kind, "{step}");
        }
    }
}

#[async_trait]
impl ControlPlane for SimulatedControlPlane {
    fn name(&self) -> &'static str {
        "simulated"
    }

    async fn activate(&self, kind: FaultKind) -> ControlPlaneResult<()> {
        Self::apply(kind, &kind.activation_plan());
        Ok(())
    }

    async fn deactivate(&self, kind: FaultKind) -> ControlPlaneResult<()> {
        Self::apply(kind, &kind.restoration_plan());
        Ok(())
    }
}
