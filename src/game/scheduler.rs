//! Single-slot tick scheduling.
//!
//! The loop never holds more than one pending tick. Scheduling replaces the
//! slot, cancelling clears it, and a ticket that no longer matches the slot
//! is ignored when its deadline passes.

use std::time::Duration;
use tokio::time::{Instant, sleep_until};

/// Handle for one scheduled tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickTicket {
    id: u64,
    deadline: Instant,
}

impl TickTicket {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }
}

#[derive(Debug, Default)]
pub struct TickScheduler {
    issued: u64,
    pending: Option<TickTicket>,
}

impl TickScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a tick `delay` from now, replacing any pending one
    pub fn schedule(&mut self, delay: Duration) -> TickTicket {
        self.schedule_at(Instant::now() + delay)
    }

    pub fn schedule_at(&mut self, deadline: Instant) -> TickTicket {
        self.issued += 1;
        let ticket = TickTicket {
            id: self.issued,
            deadline,
        };
        self.pending = Some(ticket);
        ticket
    }

    pub fn cancel(&mut self) -> Option<TickTicket> {
        self.pending.take()
    }

    pub fn pending(&self) -> Option<TickTicket> {
        self.pending
    }

    /// Consume `ticket` if it is the pending one
    pub fn claim(&mut self, ticket: TickTicket) -> bool {
        if self.pending == Some(ticket) {
            self.pending = None;
            true
        } else {
            false
        }
    }
}

/// Resolve once `ticket`'s deadline has passed. Never resolves for `None`,
/// which lets an idle or paused loop sit in `select!` without spinning.
pub async fn wait_for(ticket: Option<TickTicket>) -> TickTicket {
    match ticket {
        Some(ticket) => {
            sleep_until(ticket.deadline).await;
            ticket
        }
        None => std::future::pending().await,
    }
}
