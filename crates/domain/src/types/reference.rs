//! Reference entities cached for the process lifetime
//!
//! Categories and priorities are created by administrative operations and
//! otherwise immutable; technicians are the assignable-user list.

use serde::{Deserialize, Serialize};

/// Ticket category reference entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// Ticket priority reference entry (the label catalog, not the canonical
/// level — see [`crate::labels::TicketPriority`] for that).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Priority {
    pub id: i64,
    pub name: String,
}

/// A technician tickets can be assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Technician {
    pub id: i64,
    pub name: String,
}
