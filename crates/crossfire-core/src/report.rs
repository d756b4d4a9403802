//! Structured report persistence.

use std::path::Path;

use serde::Serialize;

use crate::error::Result;

/// Writes `report` to `path` as indented JSON.
///
/// # Errors
/// Returns an error if serialization or the file write fails.
pub fn write_json_report<T: Serialize>(path: impl AsRef<Path>, report: &T) -> Result<()> {
    let path = path.as_ref();
    let mut body = serde_json::to_string_pretty(report)?;
    body.push('\n');
    std::fs::write(path, body)?;
    tracing::info!(path = %path.display(), "report written");
    Ok(())
}
