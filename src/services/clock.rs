//! Clock sources the engine reads its "now" from

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::time::Instant;

/// A monotonic millisecond clock
pub trait Clock: Send + Sync {
    /// Milliseconds elapsed since the clock's own origin
    fn now_ms(&self) -> u64;
}

/// Production clock backed by tokio's `Instant`
///
/// Each engine owns its own instance. Under a paused tokio runtime the
/// clock follows `tokio::time::advance`, which is what the handle tests rely on.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Hand-driven clock for deterministic tests and simulations
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self { now: AtomicU64::new(start_ms) }
    }

    pub fn set(&self, now_ms: u64) {
        self.now.store(now_ms, Ordering::SeqCst);
    }

    pub fn advance_ms(&self, delta_ms: u64) {
        self.now.fetch_add(delta_ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Whole seconds left until `target_ms`, rounded up and never negative
pub fn remaining_secs(target_ms: u64, now_ms: u64) -> u64 {
    target_ms.saturating_sub(now_ms).div_ceil(1000)
}
