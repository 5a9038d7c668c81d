//! SLA deadline engine
//!
//! Pure mapping from (open instant, priority) to the deadline instant. No
//! caching: "now" moves, so risk computations must call this fresh on every
//! read.

use chrono::{DateTime, Duration, Utc};

use crate::labels::TicketPriority;

/// Compute the SLA deadline for a ticket opened at `opened_at`.
///
/// Rule table: Critical +2h, High +8h, Medium +24h, Low +2 days. An
/// unrecognized priority falls back to the 24-hour rule.
#[must_use]
pub fn sla_deadline(opened_at: DateTime<Utc>, priority: TicketPriority) -> DateTime<Utc> {
    let offset = match priority {
        TicketPriority::Critical => Duration::hours(2),
        TicketPriority::High => Duration::hours(8),
        TicketPriority::Medium | TicketPriority::Unrecognized => Duration::hours(24),
        TicketPriority::Low => Duration::days(2),
    };
    opened_at + offset
}

/// Label-based convenience wrapper: parses the priority variant first.
#[must_use]
pub fn sla_deadline_for_label(opened_at: DateTime<Utc>, priority: &str) -> DateTime<Utc> {
    sla_deadline(opened_at, TicketPriority::parse(priority))
}
