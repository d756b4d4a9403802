//! Verification error types.
//!
//! A [`ProbeError`] is contained to the category that raised it: the suite
//! records it as a failed result and keeps going.

use std::time::Duration;

use crossfire_core::CoreError;

/// Result type alias for probe operations.
pub type ProbeResult<T> = std::result::Result<T, ProbeError>;

/// Result type alias for suite-level operations.
pub type Result<T> = std::result::Result<T, VerifyError>;

/// Failure of a single network probe.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProbeError {
    /// Connection could not be established.
    #[error("connection failed: {0}")]
    Connect(String),

    /// Probe did not complete in time.
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// HTTP exchange failed after connecting.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Response body was not what the check expects.
    #[error("unexpected response: {0}")]
    Decode(String),

    /// Configured endpoint cannot be addressed.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

impl ProbeError {
    /// Creates a decode error.
    #[must_use]
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Returns true if the target could not be reached at all.
    ///
    /// Access-control checks count these as "blocked".
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Connect(_) | Self::Timeout(_) | Self::Http(_))
    }
}

/// Suite-level errors.
#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    /// Configuration or report persistence failed.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// HTTP client could not be constructed.
    #[error("transport setup failed: {0}")]
    Transport(String),
}

impl VerifyError {
    /// Returns true if the configuration file is missing.
    #[must_use]
    pub const fn is_config_not_found(&self) -> bool {
        matches!(self, Self::Core(CoreError::ConfigNotFound(_)))
    }
}
