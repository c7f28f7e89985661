/*!
 * lockbench Library
 * Lock-contention measurement core exposed as a library
 */

pub mod cli;
pub mod core;
pub mod harness;
pub mod report;
pub mod sync;
pub mod task;

pub use crate::core::errors::{ConfigError, HarnessError};
pub use harness::{run, run_per_worker, Timer};
pub use report::{mean_ops, CellRecord, CSV_HEADER};
pub use sync::{LockKind, RawLock};
pub use task::{Task, TaskKind};
