/*!
 * Measurement Engine
 *
 * Drives N workers through the two-phase loop for a fixed wall-clock window:
 * spawn, pin, synchronized start, bounded stop, per-worker counts.
 *
 * # Timing
 *
 * The stop signal comes from the single main thread sleeping on the
 * monotonic clock, so workers never read a clock of their own and per-core
 * timer skew cannot leak into the window.
 */

pub mod affinity;
pub mod clock;
pub mod timing;
pub mod worker;

pub use clock::Timer;
pub use timing::SharedTiming;
pub use worker::ResultSlot;

use crate::core::errors::{ConfigError, HarnessError};
use crate::sync::RawLock;
use crate::task::Task;
use log::debug;
use std::hint::spin_loop;
use std::thread;
use std::time::Duration;

/// Run one measurement cell and return the total completed rounds across all
/// workers.
pub fn run(
    lock: &dyn RawLock,
    task: &dyn Task,
    n_threads: usize,
    duration: Duration,
) -> Result<u64, HarnessError> {
    run_per_worker(lock, task, n_threads, duration).map(|counts| counts.iter().sum())
}

/// Like [`run`], but returns each worker's count. Useful for starvation
/// checks; the sum equals what [`run`] reports.
pub fn run_per_worker(
    lock: &dyn RawLock,
    task: &dyn Task,
    n_threads: usize,
    duration: Duration,
) -> Result<Vec<u64>, HarnessError> {
    if n_threads == 0 {
        return Err(ConfigError::ZeroThreads.into());
    }
    if duration.is_zero() {
        return Err(ConfigError::NonPositiveDuration.into());
    }

    debug!(
        "run: lock={} task={} threads={} window={:?}",
        lock.name(),
        task.name(),
        n_threads,
        duration
    );

    task.reset();

    let timing = SharedTiming::new();
    let slots: Vec<ResultSlot> = (0..n_threads).map(|_| ResultSlot::new()).collect();
    let timer = Timer::start();

    thread::scope(|scope| -> Result<(), HarnessError> {
        for (worker_id, slot) in slots.iter().enumerate() {
            let timing = &timing;
            let spawned = thread::Builder::new()
                .name(format!("lockbench-worker-{worker_id}"))
                .spawn_scoped(scope, move || {
                    worker::worker_loop(worker_id, lock, task, timing, slot)
                });

            if let Err(err) = spawned {
                // Raise stop before opening the barrier so already-spawned
                // workers pass it, see the stop flag on their first poll, and
                // exit; the scope then joins them cleanly.
                timing.raise_stop();
                timing.publish_start(duration);
                return Err(HarnessError::Spawn(err));
            }
        }

        // Hold the start until every worker is parked at the barrier.
        let mut spins = 0u32;
        while timing.ready_count() < n_threads as u32 {
            if spins % 64 == 0 {
                thread::yield_now();
            }
            spin_loop();
            spins = spins.wrapping_add(1);
        }

        timing.publish_start(duration);
        thread::sleep(duration);
        timing.raise_stop();
        Ok(())
    })?;

    // Workers are joined when the scope closes, so every slot holds its
    // owner's final count.
    let counts: Vec<u64> = slots.iter().map(ResultSlot::count).collect();
    debug!(
        "run: lock={} total={} wall={:.3}s per-worker={:?}",
        lock.name(),
        counts.iter().sum::<u64>(),
        timer.elapsed_secs(),
        counts
    );
    Ok(counts)
}
