//! Per-resource request sequencing
//!
//! Every read takes a ticket before it is issued. When the response arrives
//! it is applied only if no newer ticket was taken for the same resource
//! in the meantime.

use std::sync::atomic::{AtomicU64, Ordering};

/// Server collections that are fetched independently
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Projects,
    Tasks,
    TaskDetail,
    Notifications,
    Deadlines,
    CalendarDay,
    CalendarWeek,
    Recommendations,
}

impl Resource {
    const COUNT: usize = 8;

    fn slot(self) -> usize {
        self as usize
    }
}

/// Proof that a request was issued as number `seq` for `resource`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub resource: Resource,
    pub seq: u64,
}

/// Issues tickets and tells whether a ticket is still the latest one
#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: [AtomicU64; Resource::COUNT],
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the next ticket for `resource`
    pub fn issue(&self, resource: Resource) -> Ticket {
        let seq = self.latest[resource.slot()].fetch_add(1, Ordering::SeqCst) + 1;
        Ticket { resource, seq }
    }

    /// Whether no newer request was issued for the ticket's resource
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest[ticket.resource.slot()].load(Ordering::SeqCst) == ticket.seq
    }
}
