/*!
 * MCS Queue Lock
 *
 * Scalable FIFO spinlock. Each waiter enqueues a node it owns and spins on
 * that node's `locked` flag, so waiting traffic stays on a cache line local
 * to the waiter instead of hammering a shared word.
 *
 * # Invariants
 *
 * - The chain reached by following `next` from the holder's node lists all
 *   current waiters in arrival (tail-swap) order.
 * - A waiter's `locked` flag is cleared exactly once, by its predecessor, or
 *   by the waiter itself when it arrived on an empty queue.
 * - A node is never freed while a pointer to it may still be dereferenced:
 *   nodes live in a per-thread map and outlive every critical section of
 *   their owning thread.
 */

use super::traits::RawLock;
use ahash::RandomState;
use std::cell::RefCell;
use std::collections::HashMap;
use std::hint::spin_loop;
use std::ptr;
use std::sync::atomic::{AtomicBool, AtomicPtr, Ordering};

#[repr(align(64))]
struct McsNode {
    next: AtomicPtr<McsNode>,
    locked: AtomicBool,
}

impl McsNode {
    fn new() -> Self {
        Self {
            next: AtomicPtr::new(ptr::null_mut()),
            locked: AtomicBool::new(false),
        }
    }
}

thread_local! {
    // One node per (lock, thread), keyed by lock address. Entries for dead
    // locks are unreachable through the live API; if an address recurs for a
    // new lock the node is reinitialized on the next acquire, so stale
    // entries are harmless.
    static NODES: RefCell<HashMap<usize, Box<McsNode>, RandomState>> =
        RefCell::new(HashMap::with_hasher(RandomState::new()));
}

/// MCS queue lock with per-thread node storage.
pub struct McsLock {
    tail: AtomicPtr<McsNode>,
}

impl McsLock {
    pub fn new() -> Self {
        Self {
            tail: AtomicPtr::new(ptr::null_mut()),
        }
    }

    /// The calling thread's node for this lock. Boxed so the address stays
    /// stable while the node sits in the queue.
    fn node(&self) -> *mut McsNode {
        let key = self as *const Self as usize;
        NODES.with(|nodes| {
            let mut nodes = nodes.borrow_mut();
            let node = nodes.entry(key).or_insert_with(|| Box::new(McsNode::new()));
            &mut **node as *mut McsNode
        })
    }
}

impl Default for McsLock {
    fn default() -> Self {
        Self::new()
    }
}

impl RawLock for McsLock {
    fn acquire(&self) {
        let me = self.node();

        // SAFETY: `me` points into this thread's node map and no other thread
        // can reach it until the tail swap below publishes it.
        unsafe {
            (*me).next.store(ptr::null_mut(), Ordering::Relaxed);
            (*me).locked.store(true, Ordering::Relaxed);
        }

        let prev = self.tail.swap(me, Ordering::AcqRel);
        if prev.is_null() {
            // Queue was empty; we hold the lock outright.
            // SAFETY: still unpublished to any predecessor.
            unsafe { (*me).locked.store(false, Ordering::Relaxed) };
            return;
        }

        // SAFETY: `prev` was the tail an instant ago and its owner cannot
        // retire it before handing the lock past us; linking ourselves in is
        // the release that lets the predecessor find us.
        unsafe { (*prev).next.store(me, Ordering::Release) };

        // SAFETY: `me` stays valid for this thread; only the predecessor
        // writes `locked`, exactly once.
        while unsafe { (*me).locked.load(Ordering::Acquire) } {
            spin_loop();
        }
    }

    fn release(&self) {
        let me = self.node();

        // SAFETY: we are the holder, so `me` is the head node of the queue.
        let mut successor = unsafe { (*me).next.load(Ordering::Acquire) };
        if successor.is_null() {
            // No known successor; try to close the queue.
            if self
                .tail
                .compare_exchange(me, ptr::null_mut(), Ordering::AcqRel, Ordering::Relaxed)
                .is_ok()
            {
                return;
            }
            // A successor is mid-link between its tail swap and the `next`
            // store; wait for it to appear.
            loop {
                successor = unsafe { (*me).next.load(Ordering::Acquire) };
                if !successor.is_null() {
                    break;
                }
                spin_loop();
            }
        }

        // SAFETY: the successor is parked on its own `locked` flag and stays
        // alive at least until it observes this store.
        unsafe {
            (*successor).locked.store(false, Ordering::Release);
            (*me).next.store(ptr::null_mut(), Ordering::Relaxed);
        }
    }

    fn name(&self) -> &'static str {
        "mcs"
    }
}
