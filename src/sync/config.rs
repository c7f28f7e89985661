/*!
 * Lock Selection
 * Lock kind enumeration, parsing, and the per-cell factory
 */

use super::mcs::McsLock;
use super::mutex::{ParkingLotLock, StdMutexLock};
use super::tas::{CasLock, TasLock, TasPreloadLock};
use super::ticket::{TicketBackoffLock, TicketLock, TicketPreloadLock};
use super::traits::RawLock;
use crate::core::errors::ConfigError;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Every lock kind the harness can measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LockKind {
    /// Platform blocking mutex (`std::sync::Mutex`)
    Mutex,
    /// parking_lot raw mutex (futex-backed, brief adaptive spin)
    ParkingLot,
    /// Test-and-set spinlock
    Tas,
    /// Test-and-test-and-set spinlock
    TasPreload,
    /// FIFO ticket lock
    Ticket,
    /// Ticket lock with distance-proportional backoff
    TicketBackoff,
    /// Observe-then-draw ticket lock
    TicketPreload,
    /// MCS queue lock
    Mcs,
    /// Observe-then-claim CAS spinlock
    Cas,
}

impl LockKind {
    pub const ALL: [LockKind; 9] = [
        LockKind::Mutex,
        LockKind::ParkingLot,
        LockKind::Tas,
        LockKind::TasPreload,
        LockKind::Ticket,
        LockKind::TicketBackoff,
        LockKind::TicketPreload,
        LockKind::Mcs,
        LockKind::Cas,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LockKind::Mutex => "mutex",
            LockKind::ParkingLot => "parking_lot",
            LockKind::Tas => "tas",
            LockKind::TasPreload => "tas_preload",
            LockKind::Ticket => "ticket",
            LockKind::TicketBackoff => "ticket_backoff",
            LockKind::TicketPreload => "ticket_preload",
            LockKind::Mcs => "mcs",
            LockKind::Cas => "cas",
        }
    }

    /// Build a fresh lock instance for one measurement cell.
    ///
    /// The single vtable indirection per acquire is shared by every kind, so
    /// it cancels out of cross-kind comparisons.
    pub fn instantiate(&self) -> Arc<dyn RawLock> {
        match self {
            LockKind::Mutex => Arc::new(StdMutexLock::new()),
            LockKind::ParkingLot => Arc::new(ParkingLotLock::new()),
            LockKind::Tas => Arc::new(TasLock::new()),
            LockKind::TasPreload => Arc::new(TasPreloadLock::new()),
            LockKind::Ticket => Arc::new(TicketLock::new()),
            LockKind::TicketBackoff => Arc::new(TicketBackoffLock::new()),
            LockKind::TicketPreload => Arc::new(TicketPreloadLock::new()),
            LockKind::Mcs => Arc::new(McsLock::new()),
            LockKind::Cas => Arc::new(CasLock::new()),
        }
    }
}

impl fmt::Display for LockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LockKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LockKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownLock(s.to_string()))
    }
}
