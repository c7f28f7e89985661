/*!
 * Blocking Mutex Baselines
 *
 * Two "hand it to the OS" reference points: the platform mutex behind
 * `std::sync::Mutex`, and parking_lot's futex-backed raw mutex. Fairness is
 * whatever the platform provides; waiters may be descheduled.
 */

use super::traits::RawLock;
use lock_api::RawMutex as _;
use std::cell::UnsafeCell;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// The platform blocking mutex.
///
/// `std::sync::Mutex` only exposes a scoped guard, so the guard is
/// lifetime-extended and parked inside the lock object between `acquire` and
/// `release`. The cell is only ever touched by the unique holder, which is
/// exactly the exclusion the mutex itself provides.
pub struct StdMutexLock {
    inner: Mutex<()>,
    guard: UnsafeCell<Option<MutexGuard<'static, ()>>>,
}

impl StdMutexLock {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(()),
            guard: UnsafeCell::new(None),
        }
    }
}

impl Default for StdMutexLock {
    fn default() -> Self {
        Self::new()
    }
}

// SAFETY: `guard` is written in `acquire` and cleared in `release`, both of
// which run only on the thread currently holding `inner`. The mutex serializes
// every access to the cell.
unsafe impl Send for StdMutexLock {}
unsafe impl Sync for StdMutexLock {}

impl RawLock for StdMutexLock {
    fn acquire(&self) {
        // A panicking worker aborts the whole measurement, so poison carries
        // no information here.
        let guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);

        // SAFETY: We're extending the guard lifetime to 'static because the
        // lock object outlives every stored guard: workers are joined before
        // the lock is dropped, and `release` clears the cell.
        let guard: MutexGuard<'static, ()> = unsafe { std::mem::transmute(guard) };
        unsafe { *self.guard.get() = Some(guard) };
    }

    fn release(&self) {
        // Only the holder reaches this point, per the RawLock contract.
        unsafe { (*self.guard.get()).take() };
    }

    fn name(&self) -> &'static str {
        "mutex"
    }
}

/// parking_lot's raw mutex, which natively exposes the split lock/unlock
/// surface this harness measures. Spins briefly, then parks in the kernel.
pub struct ParkingLotLock {
    raw: parking_lot::RawMutex,
}

impl ParkingLotLock {
    pub fn new() -> Self {
        Self {
            raw: parking_lot::RawMutex::INIT,
        }
    }
}

impl Default for ParkingLotLock {
    fn default() -> Self {
        Self::new()
    }
}

impl RawLock for ParkingLotLock {
    #[inline]
    fn acquire(&self) {
        self.raw.lock();
    }

    #[inline]
    fn release(&self) {
        // SAFETY: the RawLock contract guarantees the caller holds the lock.
        unsafe { self.raw.unlock() };
    }

    fn name(&self) -> &'static str {
        "parking_lot"
    }
}
