//! Canonical status and priority labels
//!
//! The backend stores status and priority as free-form Portuguese labels and
//! is not consistent about casing ("Aberto" vs "ABERTO") or gender
//! ("Alta"/"Alto"). All comparisons in the engine go through the
//! normalization in this module exactly once, at the data-ingestion boundary;
//! downstream code only ever sees the canonical enums.

use serde::{Deserialize, Serialize};

/// Lower-case a label and fold the accented characters that occur in the
/// backend's label set, so "Crítica" and "CRITICA" normalize identically.
#[must_use]
pub fn normalize_label(label: &str) -> String {
    label
        .chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            other => other,
        })
        .collect()
}

/// Canonical ticket status buckets.
///
/// `Resolved`, `Closed`, `Cancelled` and `Ended` are terminal. A label that
/// matches no known status maps to `Unknown` and belongs to none of the
/// open/in-progress/closed buckets; such tickets stay visible in the raw
/// collection but are dropped from the classified views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TicketStatus {
    Open,
    InProgress,
    Resolved,
    Closed,
    Cancelled,
    Ended,
    Unknown,
}

impl TicketStatus {
    /// Parse a raw backend label into a canonical status.
    #[must_use]
    pub fn parse(label: &str) -> Self {
        match normalize_label(label).as_str() {
            "aberto" => Self::Open,
            "em andamento" => Self::InProgress,
            "resolvido" => Self::Resolved,
            "fechado" => Self::Closed,
            "cancelado" => Self::Cancelled,
            "encerrado" => Self::Ended,
            _ => Self::Unknown,
        }
    }

    /// Terminal statuses: the ticket is no longer being worked.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Resolved | Self::Closed | Self::Cancelled | Self::Ended)
    }

    /// Statuses that still count against the SLA clock.
    #[must_use]
    pub fn is_active(self) -> bool {
        matches!(self, Self::Open | Self::InProgress)
    }
}

/// Canonical ticket priority levels.
///
/// The backend mixes "Crítica" and "URGENTE" for the top level and both
/// gendered spellings of the others; anything else falls back to
/// `Unrecognized`, which the SLA engine treats as the 24-hour rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TicketPriority {
    Critical,
    High,
    Medium,
    Low,
    Unrecognized,
}

impl TicketPriority {
    /// Parse a raw backend label into a canonical priority.
    #[must_use]
    pub fn parse(label: &str) -> Self {
        match normalize_label(label).as_str() {
            "critica" | "urgente" => Self::Critical,
            "alta" | "alto" => Self::High,
            "media" | "medio" => Self::Medium,
            "baixa" | "baixo" => Self::Low,
            _ => Self::Unrecognized,
        }
    }
}
