//! Authenticated principal types
//!
//! The identity is ephemeral: derived by decoding the access token on login
//! (or on startup when a valid token is already held) and destroyed on
//! logout or irrecoverable refresh failure.

use serde::{Deserialize, Serialize};

/// Role claimed by the access token, normalized to lower case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
    Technician,
    Manager,
}

impl Role {
    /// Parse a role claim value case-insensitively. Returns `None` for a
    /// value outside the closed set; callers at the trust boundary treat
    /// that as a malformed token rather than guessing.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "admin" => Some(Self::Admin),
            "user" => Some(Self::User),
            "technician" => Some(Self::Technician),
            "manager" => Some(Self::Manager),
            _ => None,
        }
    }

    /// Canonical lower-case form of the role.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
            Self::Technician => "technician",
            Self::Manager => "manager",
        }
    }
}

/// The authenticated principal: display name, email and role, all derived
/// from access-token claims. An unauthenticated session simply has no
/// identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub name: String,
    pub email: String,
    pub role: Role,
}
