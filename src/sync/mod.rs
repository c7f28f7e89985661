/*!
 * Mutual-Exclusion Primitives
 *
 * The measured lock family behind one acquire/release contract:
 * - Blocking baselines (platform mutex, parking_lot)
 * - Test-and-set spinlocks, with and without a read-before-write gate
 * - FIFO ticket locks, with backoff and preload refinements
 * - MCS queue lock with cache-local spinning
 *
 * # Memory ordering
 *
 * Every variant guarantees the same edge: `acquire` synchronizes-with the
 * previous `release` on the same lock. Fairness differs per variant and is
 * documented on each type.
 */

mod config;
mod mcs;
mod mutex;
mod tas;
mod ticket;
mod traits;

pub use config::LockKind;
pub use traits::RawLock;

// Re-export concrete locks for direct use in tests and benches
pub use mcs::McsLock;
pub use mutex::{ParkingLotLock, StdMutexLock};
pub use tas::{CasLock, TasLock, TasPreloadLock};
pub use ticket::{TicketBackoffLock, TicketLock, TicketPreloadLock};
