//! # Helpdesk Domain
//!
//! Business domain types and rules for the helpdesk client engine.
//!
//! This crate contains:
//! - Domain data types (Ticket, HistoryItem, Identity, reference data)
//! - Domain error types and Result definitions
//! - Label normalization for status/priority/role variants
//! - The SLA deadline engine
//!
//! ## Architecture
//! - No dependencies on other helpdesk crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod errors;
pub mod labels;
pub mod sla;
pub mod types;

// Re-export commonly used items
pub use errors::*;
pub use labels::{normalize_label, TicketPriority, TicketStatus};
pub use sla::{sla_deadline, sla_deadline_for_label};
pub use types::*;
