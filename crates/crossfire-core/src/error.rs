//! Error types for crossfire-core.
//!
//! Per Iron Lotus Framework: All errors are explicit, no panics allowed.

use std::path::PathBuf;

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised while loading configuration or persisting reports.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Configuration file does not exist.
    #[error("configuration file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    /// Configuration could not be parsed or failed validation.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl CoreError {
    /// Creates a configuration error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a serialization error.
    #[must_use]
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// Returns true if the error means the configuration file is missing.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::ConfigNotFound(_))
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
