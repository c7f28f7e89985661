/*!
 * Error Types
 * Centralized error handling with thiserror
 */

use thiserror::Error;

/// Configuration errors, all raised before any worker thread starts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown lock kind: {0}")]
    UnknownLock(String),

    #[error("unknown task: {0}")]
    UnknownTask(String),

    #[error("thread set is empty")]
    EmptyThreadSet,

    #[error("invalid thread spec `{spec}`: {reason}")]
    InvalidThreadSpec { spec: String, reason: String },

    #[error("thread count must be positive")]
    ZeroThreads,

    #[error("duration must be positive")]
    NonPositiveDuration,
}

/// Resource errors that abort the current measurement cell.
///
/// Pin refusal is deliberately absent: pinning is best-effort and a refusal
/// is logged, not propagated.
#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
