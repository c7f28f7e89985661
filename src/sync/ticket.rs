/*!
 * Ticket Locks
 *
 * Fair FIFO spinlocks built on two cache-line-isolated counters. An acquirer
 * draws a ticket from `next` and spins until `serving` reaches it; release
 * advances `serving`.
 *
 * Counters are 32-bit and wrap; the arithmetic stays correct as long as the
 * simultaneous queue never exceeds 2^31 waiters.
 */

use super::traits::RawLock;
use crate::core::layout::CacheAligned;
use std::hint::spin_loop;
use std::sync::atomic::{AtomicU32, Ordering};
use std::thread;

/// Strict FIFO ticket lock.
///
/// Both counters start at zero; the ticket is the pre-increment value
/// returned by the fetch-add, and the holder is whoever drew ticket number
/// `serving`.
pub struct TicketLock {
    next: CacheAligned<AtomicU32>,
    serving: CacheAligned<AtomicU32>,
}

impl TicketLock {
    pub fn new() -> Self {
        Self {
            next: CacheAligned::new(AtomicU32::new(0)),
            serving: CacheAligned::new(AtomicU32::new(0)),
        }
    }
}

impl Default for TicketLock {
    fn default() -> Self {
        Self::new()
    }
}

impl RawLock for TicketLock {
    #[inline]
    fn acquire(&self) {
        let my = self.next.fetch_add(1, Ordering::Relaxed);
        while self.serving.load(Ordering::Acquire) != my {
            spin_loop();
        }
    }

    #[inline]
    fn release(&self) {
        self.serving.fetch_add(1, Ordering::Release);
    }

    fn name(&self) -> &'static str {
        "ticket"
    }
}

/// Waiters further back pause proportionally longer, and far-away waiters
/// yield to the scheduler instead of burning a core.
const YIELD_DISTANCE: u32 = 20;

/// Ticket lock with distance-proportional backoff.
///
/// Same FIFO discipline as [`TicketLock`]; only the waiting behavior differs.
pub struct TicketBackoffLock {
    next: CacheAligned<AtomicU32>,
    serving: CacheAligned<AtomicU32>,
}

impl TicketBackoffLock {
    pub fn new() -> Self {
        Self {
            next: CacheAligned::new(AtomicU32::new(0)),
            serving: CacheAligned::new(AtomicU32::new(0)),
        }
    }
}

impl Default for TicketBackoffLock {
    fn default() -> Self {
        Self::new()
    }
}

impl RawLock for TicketBackoffLock {
    #[inline]
    fn acquire(&self) {
        let my = self.next.fetch_add(1, Ordering::Relaxed);
        loop {
            let current = self.serving.load(Ordering::Acquire);
            if current == my {
                return;
            }
            let distance = my.wrapping_sub(current);
            if distance > YIELD_DISTANCE {
                thread::yield_now();
            } else {
                for _ in 0..distance {
                    spin_loop();
                }
            }
        }
    }

    #[inline]
    fn release(&self) {
        self.serving.fetch_add(1, Ordering::Release);
    }

    fn name(&self) -> &'static str {
        "ticket_backoff"
    }
}

/// Observe-then-draw ticket lock: only attempts the ticket increment after
/// seeing `serving == next`, trading strict FIFO for fewer writes to `next`
/// while the lock is held.
pub struct TicketPreloadLock {
    next: CacheAligned<AtomicU32>,
    serving: CacheAligned<AtomicU32>,
}

impl TicketPreloadLock {
    pub fn new() -> Self {
        Self {
            next: CacheAligned::new(AtomicU32::new(0)),
            serving: CacheAligned::new(AtomicU32::new(0)),
        }
    }
}

impl Default for TicketPreloadLock {
    fn default() -> Self {
        Self::new()
    }
}

impl RawLock for TicketPreloadLock {
    #[inline]
    fn acquire(&self) {
        loop {
            let serving = self.serving.load(Ordering::Relaxed);
            let next = self.next.load(Ordering::Relaxed);
            if serving != next {
                spin_loop();
                continue;
            }
            if self
                .next
                .compare_exchange_weak(
                    next,
                    next.wrapping_add(1),
                    Ordering::AcqRel,
                    Ordering::Relaxed,
                )
                .is_ok()
            {
                // Our ticket is `next`; usually we are served immediately.
                while self.serving.load(Ordering::Acquire) != next {
                    spin_loop();
                }
                return;
            }
        }
    }

    #[inline]
    fn release(&self) {
        self.serving.fetch_add(1, Ordering::Release);
    }

    fn name(&self) -> &'static str {
        "ticket_preload"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn ticket_orders_waiters() {
        let lock = TicketLock::new();
        lock.acquire();
        assert_eq!(lock.next.load(Ordering::Relaxed), 1);
        assert_eq!(lock.serving.load(Ordering::Relaxed), 0);
        lock.release();
        assert_eq!(lock.serving.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn ticket_counters_wrap() {
        let lock = TicketLock::new();
        lock.next.store(u32::MAX, Ordering::Relaxed);
        lock.serving.store(u32::MAX, Ordering::Relaxed);
        lock.acquire();
        lock.release();
        // Both counters wrapped through zero without losing the pairing.
        assert_eq!(lock.next.load(Ordering::Relaxed), 0);
        assert_eq!(lock.serving.load(Ordering::Relaxed), 0);
        lock.acquire();
        lock.release();
    }

    #[test]
    fn backoff_survives_contention() {
        let lock = Arc::new(TicketBackoffLock::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let lock = lock.clone();
                std::thread::spawn(move || {
                    for _ in 0..5_000 {
                        lock.acquire();
                        lock.release();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(lock.serving.load(Ordering::Relaxed), 40_000);
    }

    #[test]
    fn preload_survives_contention() {
        let lock = Arc::new(TicketPreloadLock::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let lock = lock.clone();
                std::thread::spawn(move || {
                    for _ in 0..5_000 {
                        lock.acquire();
                        lock.release();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(lock.serving.load(Ordering::Relaxed), 40_000);
    }
}
