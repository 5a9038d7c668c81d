//! Server-owned dashboard aggregates, mirrored read-only

use serde::{Deserialize, Serialize};

use super::ticket::Ticket;

/// Number of tickets currently assigned to one analyst.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalystLoad {
    pub analyst: String,
    pub total: u64,
}

/// Aggregate snapshot computed by the server. The engine never derives
/// these numbers itself; it only mirrors them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub queue_size: u64,
    pub per_analyst: Vec<AnalystLoad>,
    pub sla_violated: Vec<Ticket>,
}
