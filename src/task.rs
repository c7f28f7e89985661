/*!
 * Two-Phase Workloads
 *
 * One round = `parallel()` outside the lock, then `locked()` inside it.
 * Neither phase touches shared memory, so the lock under test is the only
 * cross-thread traffic a task generates.
 */

use crate::core::errors::ConfigError;
use std::fmt;
use std::hint::black_box;
use std::str::FromStr;
use std::sync::Arc;

/// A two-phase unit of work driven by the measurement loop.
pub trait Task: Send + Sync {
    /// Called once by the harness before workers spawn.
    fn reset(&self);

    /// The unsynchronized majority of a round.
    fn parallel(&self);

    /// The critical section, always executed under the lock.
    fn locked(&self);

    /// Printable name, as emitted in CSV rows and logs.
    fn name(&self) -> &'static str;
}

/// Both phases empty; isolates pure lock overhead.
pub struct DoNothingTask;

impl Task for DoNothingTask {
    fn reset(&self) {}

    #[inline(always)]
    fn parallel(&self) {}

    #[inline(always)]
    fn locked(&self) {}

    fn name(&self) -> &'static str {
        "do_nothing"
    }
}

const SCRAMBLE_SEED: u64 = 0x9e37_79b9_7f4a_7c15;

/// CPU-bound arithmetic on a call-local word.
///
/// Runs a fixed number of xorshift mixing steps (13, 7, 17) per phase. The
/// word is pinned with `black_box` on both ends so the optimizer cannot
/// elide the loop.
pub struct CpuBurnTask {
    parallel_iters: u32,
    locked_iters: u32,
}

impl CpuBurnTask {
    pub fn new(parallel_iters: u32, locked_iters: u32) -> Self {
        Self {
            parallel_iters,
            locked_iters,
        }
    }

    #[inline]
    fn scramble(iters: u32) {
        let mut x = black_box(SCRAMBLE_SEED);
        for _ in 0..iters {
            x ^= x << 13;
            x ^= x >> 7;
            x ^= x << 17;
        }
        black_box(x);
    }
}

impl Task for CpuBurnTask {
    fn reset(&self) {}

    #[inline]
    fn parallel(&self) {
        Self::scramble(self.parallel_iters);
    }

    #[inline]
    fn locked(&self) {
        Self::scramble(self.locked_iters);
    }

    fn name(&self) -> &'static str {
        "cpu_burn"
    }
}

/// Task selection for the driver layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    DoNothing,
    CpuBurn,
}

impl TaskKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::DoNothing => "do_nothing",
            TaskKind::CpuBurn => "cpu_burn",
        }
    }

    /// Build the task for one cell. The iteration counts only apply to
    /// `cpu_burn`; `do_nothing` ignores them (and reports them as zero).
    pub fn instantiate(&self, parallel_iters: u32, locked_iters: u32) -> Arc<dyn Task> {
        match self {
            TaskKind::DoNothing => Arc::new(DoNothingTask),
            TaskKind::CpuBurn => Arc::new(CpuBurnTask::new(parallel_iters, locked_iters)),
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "do_nothing" => Ok(TaskKind::DoNothing),
            "cpu_burn" => Ok(TaskKind::CpuBurn),
            other => Err(ConfigError::UnknownTask(other.to_string())),
        }
    }
}
