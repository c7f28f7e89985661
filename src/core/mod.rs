/*!
 * Core Module
 * Cache layout and error types shared across the crate
 */

pub mod errors;
pub mod layout;

// Re-export for convenience
pub use errors::{ConfigError, HarnessError};
pub use layout::{CacheAligned, CACHE_LINE_SIZE};
