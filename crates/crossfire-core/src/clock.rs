//! Wall-clock timestamps anchored to the tokio clock.
//!
//! Reports carry epoch seconds, while expiry timers run on
//! [`tokio::time`]. Anchoring both to one origin keeps them consistent,
//! including under a paused test runtime where only tokio time advances.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio::time::Instant;

/// Monotonic clock that reports wall-clock epoch seconds.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    epoch_origin: f64,
    instant_origin: Instant,
}

impl Clock {
    /// Creates a clock anchored at the current time.
    ///
    /// Must be called inside a tokio runtime when the runtime clock is paused.
    #[must_use]
    pub fn new() -> Self {
        let epoch_origin = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs_f64();
        Self {
            epoch_origin,
            instant_origin: Instant::now(),
        }
    }

    /// Returns the current time as epoch seconds.
    #[must_use]
    pub fn now(&self) -> f64 {
        self.epoch_origin + self.instant_origin.elapsed().as_secs_f64()
    }

    /// Returns the time elapsed since `epoch_secs`.
    ///
    /// Saturates at zero for timestamps in the future.
    #[must_use]
    pub fn since(&self, epoch_secs: f64) -> Duration {
        Duration::try_from_secs_f64(self.now() - epoch_secs).unwrap_or_default()
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}
