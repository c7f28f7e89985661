/*!
 * Run Coordination
 *
 * Control block shared by all workers of a single run: a ready count for the
 * start barrier, a start flag that publishes the measurement window, and a
 * stop flag that bounds it.
 */

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::time::Duration;

/// Shared start/stop control for one run.
///
/// # Ordering
///
/// `publish_start` stores the window duration before the release-store of
/// `start`, so any worker that observes `start` with acquire also observes
/// the duration. `raise_stop` is a release-store; a worker's acquire-load of
/// `stop` orders all main-thread writes before the worker's exit.
pub struct SharedTiming {
    ready: AtomicU32,
    start: AtomicBool,
    stop: AtomicBool,
    duration_bits: AtomicU64,
}

impl SharedTiming {
    pub fn new() -> Self {
        Self {
            ready: AtomicU32::new(0),
            start: AtomicBool::new(false),
            stop: AtomicBool::new(false),
            duration_bits: AtomicU64::new(0f64.to_bits()),
        }
    }

    /// A worker announces it reached the start barrier.
    #[inline]
    pub fn worker_ready(&self) {
        self.ready.fetch_add(1, Ordering::AcqRel);
    }

    #[inline]
    pub fn ready_count(&self) -> u32 {
        self.ready.load(Ordering::Acquire)
    }

    /// Broadcast the window and open the barrier.
    pub fn publish_start(&self, duration: Duration) {
        self.duration_bits
            .store(duration.as_secs_f64().to_bits(), Ordering::Relaxed);
        self.start.store(true, Ordering::Release);
    }

    #[inline]
    pub fn started(&self) -> bool {
        self.start.load(Ordering::Acquire)
    }

    pub fn raise_stop(&self) {
        self.stop.store(true, Ordering::Release);
    }

    #[inline]
    pub fn stopped(&self) -> bool {
        self.stop.load(Ordering::Acquire)
    }

    /// The broadcast window; meaningful once `started()` returns true.
    pub fn duration_secs(&self) -> f64 {
        f64::from_bits(self.duration_bits.load(Ordering::Relaxed))
    }
}

impl Default for SharedTiming {
    fn default() -> Self {
        Self::new()
    }
}
