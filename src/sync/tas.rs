/*!
 * Unfair Spinlocks
 *
 * Test-and-set variants built on a single atomic flag. All three are
 * lock-free (some thread always makes progress) but not starvation-free: a
 * just-released waiter can lose to a fresh arriver indefinitely.
 */

use super::traits::RawLock;
use std::hint::spin_loop;
use std::sync::atomic::{AtomicBool, Ordering};

/// Plain test-and-set spinlock. One atomic flag: false = free, true = held.
///
/// Every failed attempt is a read-modify-write, so waiters generate
/// invalidation traffic on the line the whole time the lock is held.
pub struct TasLock {
    held: AtomicBool,
}

impl TasLock {
    pub fn new() -> Self {
        Self {
            held: AtomicBool::new(false),
        }
    }
}

impl Default for TasLock {
    fn default() -> Self {
        Self::new()
    }
}

impl RawLock for TasLock {
    #[inline]
    fn acquire(&self) {
        while self.held.swap(true, Ordering::Acquire) {
            spin_loop();
        }
    }

    #[inline]
    fn release(&self) {
        self.held.store(false, Ordering::Release);
    }

    fn name(&self) -> &'static str {
        "tas"
    }
}

/// Test-and-test-and-set: a relaxed read gates the read-modify-write, so
/// waiters spin on a shared cache line instead of invalidating it.
pub struct TasPreloadLock {
    held: AtomicBool,
}

impl TasPreloadLock {
    pub fn new() -> Self {
        Self {
            held: AtomicBool::new(false),
        }
    }
}

impl Default for TasPreloadLock {
    fn default() -> Self {
        Self::new()
    }
}

impl RawLock for TasPreloadLock {
    #[inline]
    fn acquire(&self) {
        loop {
            if !self.held.load(Ordering::Relaxed) && !self.held.swap(true, Ordering::Acquire) {
                return;
            }
            spin_loop();
        }
    }

    #[inline]
    fn release(&self) {
        self.held.store(false, Ordering::Release);
    }

    fn name(&self) -> &'static str {
        "tas_preload"
    }
}

/// Observe-then-claim spinlock: the flag is only written through a CAS that
/// fires after a relaxed read sees the lock free.
///
/// No queue, no fairness. It measures exactly one thing: the cost profile of
/// never writing to the line while the lock is contended.
pub struct CasLock {
    held: AtomicBool,
}

impl CasLock {
    pub fn new() -> Self {
        Self {
            held: AtomicBool::new(false),
        }
    }
}

impl Default for CasLock {
    fn default() -> Self {
        Self::new()
    }
}

impl RawLock for CasLock {
    #[inline]
    fn acquire(&self) {
        loop {
            if !self.held.load(Ordering::Relaxed)
                && self
                    .held
                    .compare_exchange_weak(false, true, Ordering::Acquire, Ordering::Relaxed)
                    .is_ok()
            {
                return;
            }
            spin_loop();
        }
    }

    #[inline]
    fn release(&self) {
        self.held.store(false, Ordering::Release);
    }

    fn name(&self) -> &'static str {
        "cas"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::traits::RawLock;
    use std::sync::Arc;
    use std::thread;

    fn exercise(lock: Arc<dyn RawLock>) {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let lock = lock.clone();
                thread::spawn(move || {
                    for _ in 0..10_000 {
                        lock.acquire();
                        lock.release();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
    }

    #[test]
    fn tas_survives_contention() {
        exercise(Arc::new(TasLock::new()));
    }

    #[test]
    fn tas_preload_survives_contention() {
        exercise(Arc::new(TasPreloadLock::new()));
    }

    #[test]
    fn cas_survives_contention() {
        exercise(Arc::new(CasLock::new()));
    }
}
