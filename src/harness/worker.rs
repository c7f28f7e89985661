/*!
 * Measurement Worker
 *
 * The per-thread measurement loop and its result slot. A worker counts
 * completed two-phase rounds into a register-resident local and publishes it
 * exactly once, at exit, into a cache-line-padded slot.
 */

use super::affinity;
use super::timing::SharedTiming;
use crate::sync::RawLock;
use crate::task::Task;
use std::hint::spin_loop;
use std::sync::atomic::{AtomicU64, Ordering};

#[cfg(debug_assertions)]
use std::sync::atomic::AtomicBool;

/// Stop polls are amortized over this many rounds, which caps overshoot at
/// one critical section plus 64 parallel phases per worker.
const STOP_POLL_MASK: u64 = 63;

/// One worker's completed-round count, padded to a full cache line so
/// adjacent slots never share one.
#[repr(align(64))]
pub struct ResultSlot {
    count: AtomicU64,
    #[cfg(debug_assertions)]
    written: AtomicBool,
}

impl ResultSlot {
    pub fn new() -> Self {
        Self {
            count: AtomicU64::new(0),
            #[cfg(debug_assertions)]
            written: AtomicBool::new(false),
        }
    }

    /// Single write, by the owning worker, on loop exit.
    pub fn publish(&self, count: u64) {
        #[cfg(debug_assertions)]
        debug_assert!(
            !self.written.swap(true, Ordering::AcqRel),
            "result slot published twice"
        );
        self.count.store(count, Ordering::Release);
    }

    /// Read after the owner has been joined.
    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Acquire)
    }
}

impl Default for ResultSlot {
    fn default() -> Self {
        Self::new()
    }
}

/// Body of one measurement worker.
pub fn worker_loop(
    worker_id: usize,
    lock: &dyn RawLock,
    task: &dyn Task,
    timing: &SharedTiming,
    slot: &ResultSlot,
) {
    affinity::pin_worker(worker_id);

    timing.worker_ready();
    while !timing.started() {
        spin_loop();
    }

    let mut local: u64 = 0;
    loop {
        if local & STOP_POLL_MASK == 0 && timing.stopped() {
            break;
        }
        task.parallel();
        lock.acquire();
        task.locked();
        lock.release();
        local += 1;
    }

    slot.publish(local);
}
