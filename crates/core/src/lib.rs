//! # Helpdesk Core
//!
//! Stateful ticket repository, pure report projections and the [`Engine`]
//! context that wires session, transport and repository together.
//!
//! The repository follows a resync-after-mutation discipline: every write
//! ends with a full refetch so interleaved mutations converge to the
//! server's authoritative state instead of a locally reconciled one.

pub mod config;
pub mod context;
pub mod reports;
pub mod repository;

pub use config::EngineConfig;
pub use context::Engine;
pub use repository::{SyncStatus, TicketRepository};
