//! Ticket aggregate and its owned pieces

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::labels::{TicketPriority, TicketStatus};
use crate::sla;

/// A single comment in a ticket's history.
///
/// Owned by exactly one ticket. The engine keeps history sorted by
/// `occurred_at` descending regardless of the order the transport delivered
/// it in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryItem {
    pub author: String,
    pub comment: String,
    pub occurred_at: DateTime<Utc>,
}

/// Metadata of a file attached to a ticket. The bytes live server-side and
/// are fetched on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: i64,
    pub file_name: String,
    pub content_type: String,
}

/// A helpdesk ticket as the engine sees it.
///
/// `status` and `priority` are the canonical forms, normalized once at the
/// transport boundary; the raw backend labels are kept alongside so the
/// wire representation can be reproduced exactly.
///
/// Soft invariant (not enforced by the transport format, defended in
/// display logic): `closed_at` is present only for terminal statuses, and
/// `assigned_to` is absent while the ticket is still unassigned/open.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: i64,
    pub number: String,
    pub requester: String,
    pub description: String,
    pub category: String,
    pub priority: TicketPriority,
    pub priority_label: String,
    pub status: TicketStatus,
    pub status_label: String,
    pub opened_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    pub assigned_to: Option<String>,
    pub solution: Option<String>,
    pub history: Vec<HistoryItem>,
    pub reopened: bool,
    pub attachments: Vec<Attachment>,
}

impl Ticket {
    /// SLA deadline derived from priority and open instant. Never stored;
    /// recomputed on every read because risk classification compares it
    /// against the current instant.
    #[must_use]
    pub fn sla_deadline(&self) -> DateTime<Utc> {
        sla::sla_deadline(self.opened_at, self.priority)
    }
}

/// Payload for creating a ticket, including any binary attachments.
#[derive(Debug, Clone)]
pub struct NewTicket {
    pub description: String,
    pub category: String,
    pub priority: String,
    pub attachments: Vec<AttachmentUpload>,
}

/// An attachment to upload with a new ticket.
#[derive(Debug, Clone)]
pub struct AttachmentUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}
