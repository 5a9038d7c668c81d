//! Report row types produced by the aggregator

use serde::{Deserialize, Serialize};

/// Average resolution time for one category, over resolved tickets that
/// have both timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryResolution {
    pub category: String,
    pub avg_hours: f64,
}

/// Tickets opened in one month of the selected year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyCount {
    pub month: u32,
    pub total: u64,
}

/// SLA compliance over the closed/resolved ticket population.
///
/// `compliance_rate` is a percentage, defined as 0 when `total` is 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlaPerformance {
    pub total: u64,
    pub within: u64,
    pub outside: u64,
    pub compliance_rate: f64,
}
