//! Fault Lifecycle Manager - owns injected faults and their expiry timers.
//!
//! # Toyota Way: Jidoka (自働化)
//! Every injected fault removes itself when its lifetime ends; nobody has
//! to remember to clean up.
//!
//! # Concurrency
//! The registry is mutated by callers (`inject`, `remove`, `remove_all`)
//! and by expiry tasks running on the tokio runtime. Every mutation happens
//! under one lock and a record only transitions if it is still active, so a
//! racing explicit removal and expiry never both write `end_time`. Locks are
//! never held across an `.await`.

use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crossfire_core::Clock;

use crate::control::{ControlPlane, SimulatedControlPlane};
use crate::error::{FaultError, Result};
use crate::kind::{CatalogEntry, FaultKind, catalog};
use crate::record::{ActiveFault, FaultId, FaultRecord};
use crate::report::FaultReport;

// =============================================================================
// RemovalSummary
// =============================================================================

/// Outcome of [`FaultLifecycleManager::remove_all`].
#[derive(Debug, Default)]
pub struct RemovalSummary {
    /// Number of faults that were active when the batch started.
    pub attempted: usize,
    /// Faults transitioned to removed by this batch.
    pub removed: Vec<FaultId>,
    /// Per-fault failures; the batch continues past each one.
    pub failures: Vec<FaultError>,
}

impl RemovalSummary {
    /// Returns true if every removal succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

// =============================================================================
// FaultLifecycleManager
// =============================================================================

/// Which record a removal transitions.
#[derive(Debug, Clone, Copy)]
enum Selector {
    /// First active record of the kind, in injection order.
    FirstActive,
    /// One specific record.
    Record(FaultId),
}

/// Who asked for the removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    Caller,
    Expiry,
}

/// Manages the lifecycle of injected faults.
///
/// Constructed once per process and shared by reference. Dropping the
/// manager aborts every pending expiry task; fault state is not persisted.
pub struct FaultLifecycleManager {
    inner: Arc<Inner>,
}

struct Inner {
    control_plane: Arc<dyn ControlPlane>,
    clock: Clock,
    /// Append-only, injection order.
    registry: Mutex<Vec<FaultRecord>>,
    /// Pending expiry task per active record.
    timers: Mutex<HashMap<FaultId, JoinHandle<()>>>,
    /// Number of active records.
    active: watch::Sender<usize>,
}

impl FaultLifecycleManager {
    /// Creates a manager driving the given control plane.
    #[must_use]
    pub fn new(control_plane: Arc<dyn ControlPlane>) -> Self {
        Self::with_clock(control_plane, Clock::new())
    }

    /// Creates a manager with an explicit clock.
    #[must_use]
    pub fn with_clock(control_plane: Arc<dyn ControlPlane>, clock: Clock) -> Self {
        let (active, _) = watch::channel(0);
        Self {
            inner: Arc::new(Inner {
                control_plane,
                clock,
                registry: Mutex::new(Vec::new()),
                timers: Mutex::new(HashMap::new()),
                active,
            }),
        }
    }

    /// Creates a manager backed by the logging-only control plane.
    #[must_use]
    pub fn simulated() -> Self {
        Self::new(Arc::new(SimulatedControlPlane::new()))
    }

    /// Returns the fault catalog in display order.
    #[must_use]
    pub fn list_available_faults(&self) -> Vec<CatalogEntry> {
        catalog()
    }

    /// Injects a fault by name.
    ///
    /// # Errors
    /// Returns [`FaultError::UnknownFaultKind`] if `name` is not in the
    /// catalog, otherwise as [`Self::inject`].
    pub async fn inject_named(&self, name: &str, duration_secs: u64) -> Result<FaultId> {
        let kind = name.parse::<FaultKind>().inspect_err(|_| {
            tracing::error!(fault = name, "unknown fault type");
        })?;
        self.inject(kind, duration_secs).await
    }

    /// Activates `kind` and schedules its removal after `duration_secs`.
    ///
    /// Returns as soon as the fault is active; expiry runs in the background.
    ///
    /// # Errors
    /// Returns [`FaultError::InvalidDuration`] for a zero duration and
    /// [`FaultError::ActivationFailed`] if the control plane refuses. No
    /// record is added in either case.
    pub async fn inject(&self, kind: FaultKind, duration_secs: u64) -> Result<FaultId> {
        if duration_secs == 0 {
            return Err(FaultError::InvalidDuration);
        }

        tracing::info!(
            fault = %kind,
            duration_secs,
            control_plane = self.inner.control_plane.name(),
            "injecting fault"
        );

        if let Err(e) = self.inner.control_plane.activate(kind).await {
            tracing::error!(fault = %kind, error = %e, "failed to inject fault");
            return Err(FaultError::activation_failed(kind, e.to_string()));
        }

        let record = FaultRecord::active(kind, self.inner.clock.now(), duration_secs);
        let id = record.id;
        self.inner.registry.lock().push(record);
        self.inner.publish_active();
        self.schedule_expiry(id, kind, Duration::from_secs(duration_secs));

        tracing::info!(fault = %kind, %id, "fault injected successfully");
        Ok(id)
    }

    /// Deactivates `kind` and marks its oldest active record removed.
    ///
    /// The deactivation runs even when no record is active; that case is a
    /// no-op for the registry and returns `Ok(None)`. The removed record's
    /// pending expiry task is cancelled.
    ///
    /// # Errors
    /// Returns [`FaultError::DeactivationFailed`] if the control plane
    /// refuses; the record stays active.
    pub async fn remove(&self, kind: FaultKind) -> Result<Option<FaultId>> {
        self.inner
            .remove_matching(kind, Selector::FirstActive, Origin::Caller)
            .await
    }

    /// Removes a fault by name.
    ///
    /// # Errors
    /// Returns [`FaultError::UnknownFaultKind`] if `name` is not in the
    /// catalog, otherwise as [`Self::remove`].
    pub async fn remove_named(&self, name: &str) -> Result<Option<FaultId>> {
        let kind = name.parse::<FaultKind>()?;
        self.remove(kind).await
    }

    /// Removes every fault that is active when the call starts.
    ///
    /// Each snapshotted record is removed individually; a failure is
    /// recorded and the batch moves on.
    pub async fn remove_all(&self) -> RemovalSummary {
        let snapshot: Vec<(FaultId, FaultKind)> = self
            .inner
            .registry
            .lock()
            .iter()
            .filter(|r| r.is_active())
            .map(|r| (r.id, r.kind))
            .collect();

        tracing::info!(count = snapshot.len(), "removing active faults");

        let mut summary = RemovalSummary {
            attempted: snapshot.len(),
            ..RemovalSummary::default()
        };
        for (id, kind) in snapshot {
            match self
                .inner
                .remove_matching(kind, Selector::Record(id), Origin::Caller)
                .await
            {
                Ok(Some(removed)) => summary.removed.push(removed),
                Ok(None) => {}
                Err(e) => summary.failures.push(e),
            }
        }
        summary
    }

    /// Returns active faults with their remaining lifetime, in injection order.
    #[must_use]
    pub fn list_active(&self) -> Vec<ActiveFault> {
        let now = self.inner.clock.now();
        self.inner
            .registry
            .lock()
            .iter()
            .filter(|r| r.is_active())
            .map(|r| ActiveFault {
                id: r.id,
                kind: r.kind,
                remaining_secs: r.remaining_secs(now),
            })
            .collect()
    }

    /// Returns a copy of every record, in injection order.
    #[must_use]
    pub fn records(&self) -> Vec<FaultRecord> {
        self.inner.registry.lock().clone()
    }

    /// Returns the number of active records.
    #[must_use]
    pub fn active_count(&self) -> usize {
        *self.inner.active.borrow()
    }

    /// Returns the number of pending expiry tasks.
    #[must_use]
    pub fn pending_expiries(&self) -> usize {
        self.inner
            .timers
            .lock()
            .values()
            .filter(|handle| !handle.is_finished())
            .count()
    }

    /// Snapshots the registry into a report.
    #[must_use]
    pub fn generate_report(&self) -> FaultReport {
        let faults = self.records();
        FaultReport::new(self.inner.clock.now(), faults)
    }

    /// Waits until no fault is active.
    pub async fn wait_until_idle(&self) {
        let mut rx = self.inner.active.subscribe();
        // The sender lives as long as `self`, so this cannot observe a close.
        let _ = rx.wait_for(|active| *active == 0).await;
    }

    fn schedule_expiry(&self, id: FaultId, kind: FaultKind, lifetime: Duration) {
        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        let mut timers = self.inner.timers.lock();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(lifetime).await;
            if let Some(inner) = weak.upgrade() {
                inner.expire(id, kind).await;
            }
        });
        timers.insert(id, handle);
        tracing::debug!(fault = %kind, %id, ?lifetime, "expiry scheduled");
    }
}

impl Drop for FaultLifecycleManager {
    fn drop(&mut self) {
        for (_, handle) in self.inner.timers.lock().drain() {
            handle.abort();
        }
    }
}

impl Inner {
    async fn expire(&self, id: FaultId, kind: FaultKind) {
        let still_active = self
            .registry
            .lock()
            .iter()
            .any(|r| r.id == id && r.is_active());
        if !still_active {
            self.timers.lock().remove(&id);
            tracing::debug!(fault = %kind, %id, "expiry skipped, fault already removed");
            return;
        }

        tracing::info!(fault = %kind, %id, "auto-removing fault");
        // Failure is logged inside; the record stays active and visible.
        let _ = self
            .remove_matching(kind, Selector::Record(id), Origin::Expiry)
            .await;
    }

    async fn remove_matching(
        &self,
        kind: FaultKind,
        selector: Selector,
        origin: Origin,
    ) -> Result<Option<FaultId>> {
        tracing::info!(fault = %kind, ?origin, "removing fault");

        if let Err(e) = self.control_plane.deactivate(kind).await {
            tracing::error!(fault = %kind, error = %e, "failed to remove fault");
            return Err(FaultError::deactivation_failed(kind, e.to_string()));
        }

        let now = self.clock.now();
        let removed = {
            let mut registry = self.registry.lock();
            let record = match selector {
                Selector::FirstActive => registry
                    .iter_mut()
                    .find(|r| r.kind == kind && r.is_active()),
                Selector::Record(id) => registry.iter_mut().find(|r| r.id == id && r.is_active()),
            };
            record.and_then(|r| r.mark_removed(now).then_some(r.id))
        };

        let Some(id) = removed else {
            tracing::debug!(fault = %kind, "no active record matched, registry unchanged");
            return Ok(None);
        };

        if let Some(handle) = self.timers.lock().remove(&id) {
            // An expiry task removing its own record must not abort itself.
            if origin == Origin::Caller {
                handle.abort();
            }
        }
        self.publish_active();

        tracing::info!(fault = %kind, %id, "fault removed successfully");
        Ok(Some(id))
    }

    fn publish_active(&self) {
        let count = self.registry.lock().iter().filter(|r| r.is_active()).count();
        self.active.send_replace(count);
    }
}
