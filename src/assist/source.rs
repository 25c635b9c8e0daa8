//! Injected Capabilities
//!
//! The controller never touches ambient state. Time comes from a [`Clock`]
//! and the current pointer position from a [`PositionSource`]; the write side
//! of the pointer is the value returned by each tick.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::geometry::Vector2;

/// Monotonic time source
pub trait Clock {
    /// Time elapsed since the clock's epoch
    fn now(&self) -> Duration;
}

/// Reads the current pointer position
#[cfg_attr(test, mockall::automock)]
pub trait PositionSource {
    /// Current pointer position in screen space
    fn read(&self) -> Vector2;
}

/// Wall clock backed by [`Instant`]
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    epoch: Instant,
}

impl SystemClock {
    /// Create a clock whose epoch is now
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.epoch.elapsed()
    }
}

/// Externally driven clock for replay and tests
///
/// Clones share the same time, so a caller can keep a handle and advance
/// the clock owned by a controller.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    nanos: Arc<AtomicU64>,
}

impl ManualClock {
    /// Create a clock at time zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward by `by`
    pub fn advance(&self, by: Duration) {
        self.nanos
            .fetch_add(saturating_nanos(by), Ordering::Relaxed);
    }

    /// Jump to absolute time `at`; ignored if `at` is in the past
    pub fn set(&self, at: Duration) {
        self.nanos
            .fetch_max(saturating_nanos(at), Ordering::Relaxed);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.nanos.load(Ordering::Relaxed))
    }
}

fn saturating_nanos(d: Duration) -> u64 {
    u64::try_from(d.as_nanos()).unwrap_or(u64::MAX)
}
