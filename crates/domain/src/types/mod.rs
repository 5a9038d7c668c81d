//! Domain data types

pub mod identity;
pub mod reference;
pub mod reports;
pub mod stats;
pub mod ticket;

pub use identity::{Identity, Role};
pub use reference::{Category, Priority, Technician};
pub use reports::{CategoryResolution, MonthlyCount, SlaPerformance};
pub use stats::{AnalystLoad, DashboardStats};
pub use ticket::{Attachment, AttachmentUpload, HistoryItem, NewTicket, Ticket};
