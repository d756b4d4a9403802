//! Fault catalog.
//!
//! The set of fault kinds is closed: every kind-specific behavior is an
//! exhaustive `match`, so adding a kind is a compile-time-checked change.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FaultError;

/// A simulated failure mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultKind {
    /// Added response latency in the customers service.
    LatencyInjection,
    /// Thrown exceptions in the visits service.
    ExceptionInjection,
    /// Memory pressure on the services.
    MemoryPressure,
    /// Traffic between the clusters is blocked.
    NetworkPartition,
    /// CPU and resource contention.
    ServiceDegradation,
    /// Cross-cluster calls time out.
    CrossClusterTimeout,
}

impl FaultKind {
    /// Every kind, in catalog display order.
    pub const ALL: [Self; 6] = [
        Self::LatencyInjection,
        Self::ExceptionInjection,
        Self::MemoryPressure,
        Self::NetworkPartition,
        Self::ServiceDegradation,
        Self::CrossClusterTimeout,
    ];

    /// Returns the identifier used on the command line and in reports.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::LatencyInjection => "latency_injection",
            Self::ExceptionInjection => "exception_injection",
            Self::MemoryPressure => "memory_pressure",
            Self::NetworkPartition => "network_partition",
            Self::ServiceDegradation => "service_degradation",
            Self::CrossClusterTimeout => "cross_cluster_timeout",
        }
    }

    /// Returns the human-readable catalog description.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::LatencyInjection => "Inject latency into C1 customers service",
            Self::ExceptionInjection => "Inject exceptions into C2 visits service",
            Self::MemoryPressure => "Create memory pressure on services",
            Self::NetworkPartition => "Simulate network partition between clusters",
            Self::ServiceDegradation => "Degrade service performance",
            Self::CrossClusterTimeout => "Simulate cross-cluster communication timeout",
        }
    }

    /// Returns what the fault is applied to.
    #[must_use]
    pub const fn target(&self) -> FaultTarget {
        match self {
            Self::LatencyInjection => FaultTarget::CustomersService,
            Self::ExceptionInjection => FaultTarget::VisitsService,
            Self::MemoryPressure | Self::ServiceDegradation => FaultTarget::AllServices,
            Self::NetworkPartition | Self::CrossClusterTimeout => FaultTarget::CrossCluster,
        }
    }

    /// Returns the changes that switch this fault on.
    #[must_use]
    pub const fn activation_plan(&self) -> FaultPlan {
        match self {
            Self::LatencyInjection => FaultPlan {
                summary: "Injecting latency into customers service",
                config_updates: &[
                    ("chaos.monkey.assaults.latency.active", "true"),
                    ("chaos.monkey.assaults.latency.latency-range-start", "2000"),
                    ("chaos.monkey.assaults.latency.latency-range-end", "5000"),
                ],
                steps: &[],
            },
            Self::ExceptionInjection => FaultPlan {
                summary: "Injecting exceptions into visits service",
                config_updates: &[
                    ("chaos.monkey.assaults.exceptions.active", "true"),
                    ("chaos.monkey.assaults.exceptions.level", "5"),
                ],
                steps: &[],
            },
            Self::MemoryPressure => FaultPlan {
                summary: "Creating memory pressure",
                config_updates: &[],
                steps: &["Scaling down memory limits", "Injecting memory allocation"],
            },
            Self::NetworkPartition => FaultPlan {
                summary: "Simulating network partition",
                config_updates: &[],
                steps: &["Blocking cross-cluster traffic", "Updating network policies"],
            },
            Self::ServiceDegradation => FaultPlan {
                summary: "Degrading service performance",
                config_updates: &[],
                steps: &["Increasing CPU usage", "Reducing available resources"],
            },
            Self::CrossClusterTimeout => FaultPlan {
                summary: "Simulating cross-cluster timeout",
                config_updates: &[],
                steps: &["Increasing network latency", "Reducing connection timeouts"],
            },
        }
    }

    /// Returns the changes that switch this fault off.
    #[must_use]
    pub const fn restoration_plan(&self) -> FaultPlan {
        match self {
            Self::LatencyInjection => FaultPlan {
                summary: "Restoring latency config",
                config_updates: &[("chaos.monkey.assaults.latency.active", "false")],
                steps: &[],
            },
            Self::ExceptionInjection => FaultPlan {
                summary: "Restoring exception config",
                config_updates: &[("chaos.monkey.assaults.exceptions.active", "false")],
                steps: &[],
            },
            Self::MemoryPressure => FaultPlan {
                summary: "Restoring memory limits",
                config_updates: &[],
                steps: &[],
            },
            Self::NetworkPartition => FaultPlan {
                summary: "Restoring cross-cluster connectivity",
                config_updates: &[],
                steps: &[],
            },
            Self::ServiceDegradation => FaultPlan {
                summary: "Restoring service performance",
                config_updates: &[],
                steps: &[],
            },
            Self::CrossClusterTimeout => FaultPlan {
                summary: "Restoring network timeouts",
                config_updates: &[],
                steps: &[],
            },
        }
    }
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FaultKind {
    type Err = FaultError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| FaultError::UnknownFaultKind(s.to_string()))
    }
}

/// What a fault is applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultTarget {
    /// Customers service in cluster C1.
    CustomersService,
    /// Visits service in cluster C2.
    VisitsService,
    /// Services in both clusters.
    AllServices,
    /// The link between the clusters.
    CrossCluster,
}

impl fmt::Display for FaultTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::CustomersService => "C1 customers service",
            Self::VisitsService => "C2 visits service",
            Self::AllServices => "all services",
            Self::CrossCluster => "cross-cluster link",
        };
        f.write_str(name)
    }
}

/// Infrastructure changes for switching a fault on or off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaultPlan {
    /// One-line description of the change.
    pub summary: &'static str,
    /// Chaos configuration keys to set.
    pub config_updates: &'static [(&'static str, &'static str)],
    /// Additional operational steps.
    pub steps: &'static [&'static str],
}

/// One catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Fault kind.
    pub kind: FaultKind,
    /// Human-readable description.
    pub description: &'static str,
}

/// Returns the fault catalog in display order.
#[must_use]
pub fn catalog() -> Vec<CatalogEntry> {
    FaultKind::ALL
        .into_iter()
        .map(|kind| CatalogEntry {
            kind,
            description: kind.description(),
        })
        .collect()
}
