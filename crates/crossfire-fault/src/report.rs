//! Fault injection report.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::record::FaultRecord;

/// Point-in-time snapshot of the fault registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaultReport {
    /// Snapshot time, epoch seconds.
    pub timestamp: f64,
    /// Number of records ever injected.
    pub total_faults: usize,
    /// Number of records still active.
    pub active_faults: usize,
    /// Every record, in injection order.
    pub faults: Vec<FaultRecord>,
}

impl FaultReport {
    /// Builds a report from a registry snapshot.
    #[must_use]
    pub fn new(timestamp: f64, faults: Vec<FaultRecord>) -> Self {
        let active_faults = faults.iter().filter(|f| f.is_active()).count();
        Self {
            timestamp,
            total_faults: faults.len(),
            active_faults,
            faults,
        }
    }

    /// Writes the report as indented JSON.
    ///
    /// # Errors
    /// Returns an error if the file cannot be written.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        crossfire_core::write_json_report(path, self)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::FaultKind;

    #[test]
    fn test_counts() {
        let mut removed = FaultRecord::active(FaultKind::MemoryPressure, 10.0, 30);
        removed.mark_removed(40.0);
        let faults = vec![
            FaultRecord::active(FaultKind::LatencyInjection, 20.0, 300),
            removed,
            FaultRecord::active(FaultKind::LatencyInjection, 25.0, 300),
        ];

        let report = FaultReport::new(50.0, faults);
        assert_eq!(report.total_faults, 3);
        assert_eq!(report.active_faults, 2);
    }

    #[test]
    fn test_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fault_report.json");
        let report = FaultReport::new(
            1_700_000_000.0,
            vec![FaultRecord::active(FaultKind::CrossClusterTimeout, 1_699_999_990.0, 300)],
        );

        report.write_to(&path).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["total_faults"], 1);
        assert_eq!(json["active_faults"], 1);
        assert_eq!(json["faults"][0]["type"], "cross_cluster_timeout");
        assert_eq!(json["faults"][0]["status"], "active");
    }

    #[test]
    fn test_empty_report() {
        let report = FaultReport::new(1.0, Vec::new());
        assert_eq!(report.total_faults, 0);
        assert_eq!(report.active_faults, 0);
        assert!(report.faults.is_empty());
    }
}
