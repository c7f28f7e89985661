/*!
 * Mutual Exclusion Integration Tests
 *
 * Every lock kind guards a plain, non-atomic counter. If exclusion or the
 * release-to-acquire ordering edge ever breaks, increments get lost and the
 * final count comes up short.
 */

use lockbench::sync::LockKind;
use std::cell::UnsafeCell;
use std::thread;

struct RacyCounter {
    value: UnsafeCell<u64>,
}

// SAFETY: every access happens inside a critical section of the lock under
// test; that exclusion is exactly what these tests verify.
unsafe impl Sync for RacyCounter {}

fn hammer(kind: LockKind, threads: usize, rounds: u64) {
    let lock = kind.instantiate();
    let counter = RacyCounter {
        value: UnsafeCell::new(0),
    };

    thread::scope(|scope| {
        for _ in 0..threads {
            let lock = &lock;
            let counter = &counter;
            scope.spawn(move || {
                for _ in 0..rounds {
                    lock.acquire();
                    // SAFETY: we hold the lock.
                    unsafe { *counter.value.get() += 1 };
                    lock.release();
                }
            });
        }
    });

    lock.acquire();
    // SAFETY: all workers joined; we hold the lock.
    let total = unsafe { *counter.value.get() };
    lock.release();

    assert_eq!(
        total,
        threads as u64 * rounds,
        "{} lost increments with {} workers",
        kind,
        threads
    );
}

#[test]
fn exclusion_two_workers() {
    for kind in LockKind::ALL {
        hammer(kind, 2, 100_000);
    }
}

#[test]
fn exclusion_eight_workers() {
    for kind in LockKind::ALL {
        hammer(kind, 8, 100_000);
    }
}

// Oversubscription soak; run with --ignored on a quiet many-core box.
#[test]
#[ignore]
fn exclusion_thirty_two_workers() {
    for kind in [
        LockKind::Mutex,
        LockKind::Tas,
        LockKind::Ticket,
        LockKind::Mcs,
    ] {
        hammer(kind, 32, 100_000);
    }
}

/// A writer publishes successive values under the lock; a reader acquiring
/// the same lock must observe them monotonically. Catches a missing
/// release-to-acquire edge even when exclusion itself holds.
fn publication_round_trip(kind: LockKind) {
    const FINAL: u64 = 50_000;

    let lock = kind.instantiate();
    let cell = RacyCounter {
        value: UnsafeCell::new(0),
    };

    thread::scope(|scope| {
        let writer_lock = &lock;
        let writer_cell = &cell;
        scope.spawn(move || {
            for next in 1..=FINAL {
                writer_lock.acquire();
                // SAFETY: we hold the lock.
                unsafe { *writer_cell.value.get() = next };
                writer_lock.release();
            }
        });

        let reader_lock = &lock;
        let reader_cell = &cell;
        scope.spawn(move || {
            let mut last = 0u64;
            loop {
                reader_lock.acquire();
                // SAFETY: we hold the lock.
                let seen = unsafe { *reader_cell.value.get() };
                reader_lock.release();

                assert!(
                    seen >= last,
                    "{} reader saw {} after {}",
                    kind,
                    seen,
                    last
                );
                last = seen;
                if seen == FINAL {
                    break;
                }
            }
        });
    });
}

#[test]
fn publication_round_trip_all_kinds() {
    for kind in LockKind::ALL {
        publication_round_trip(kind);
    }
}
