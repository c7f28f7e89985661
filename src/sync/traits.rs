/*!
 * Lock Contract
 * The acquire/release surface every measured primitive implements
 */

/// A process-local mutual-exclusion primitive with a split acquire/release
/// surface.
///
/// # Contract
///
/// - At most one thread holds the lock at any moment.
/// - `release` may only be invoked by the current holder.
/// - `acquire` synchronizes-with the previous `release` on the same lock, so
///   writes made inside a critical section are visible to the next critical
///   section on the same lock.
/// - Re-entry is not supported.
///
/// Lock operations do not fail and do not time out. They do not allocate
/// after construction, except that the MCS variant may allocate per-thread
/// node state on a thread's first acquire.
pub trait RawLock: Send + Sync {
    /// Block the calling thread until it is the unique holder.
    fn acquire(&self);

    /// Hand the lock to a designated successor or the next arriving
    /// acquirer. Must only be called by the current holder.
    fn release(&self);

    /// Printable name, as emitted in CSV rows and logs.
    fn name(&self) -> &'static str;
}
