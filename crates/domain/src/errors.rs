//! Error types used throughout the engine

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for the helpdesk engine
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "detail")]
pub enum HelpdeskError {
    /// Bad credentials, or the refresh protocol was exhausted. The session
    /// has been destroyed; the caller must re-authenticate.
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// The access token could not be decoded into the expected claim shape.
    /// Fatal to the login attempt.
    #[error("Malformed access token: {0}")]
    MalformedToken(String),

    /// Generic non-2xx response after the retry protocol was exhausted.
    #[error("Transport error: status {status}")]
    Transport { status: u16, body: String },

    /// The server answered 429. Non-fatal; the caller should back off and
    /// may retry later using the supplied hint.
    #[error("Rate limited: {message}")]
    RateLimited { retry_after_secs: Option<u64>, message: String },

    /// A response body could not be decoded into the expected shape.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Connection-level failure before any HTTP status was produced.
    #[error("Network error: {0}")]
    Network(String),

    /// Invalid engine or client configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl HelpdeskError {
    /// Whether the error means the caller holds no usable session anymore.
    #[must_use]
    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication(_) | Self::MalformedToken(_))
    }

    /// Whether a caller may reasonably retry the same operation later.
    ///
    /// Rate limiting and connection failures are transient; everything else
    /// needs intervention (new credentials, a code change, or a different
    /// request).
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::RateLimited { .. } | Self::Network(_))
    }
}

/// Result type alias for helpdesk operations
pub type Result<T> = std::result::Result<T, HelpdeskError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authentication_classification() {
        assert!(HelpdeskError::Authentication("bad login".into()).is_authentication());
        assert!(HelpdeskError::MalformedToken("not a jwt".into()).is_authentication());
        assert!(!HelpdeskError::Network("refused".into()).is_authentication());
    }

    #[test]
    fn transient_classification() {
        let limited = HelpdeskError::RateLimited {
            retry_after_secs: Some(60),
            message: "slow down".into(),
        };
        assert!(limited.is_transient());
        assert!(HelpdeskError::Network("reset".into()).is_transient());
        assert!(!HelpdeskError::Transport { status: 500, body: String::new() }.is_transient());
    }

    #[test]
    fn rate_limited_display_carries_message() {
        let err = HelpdeskError::RateLimited {
            retry_after_secs: None,
            message: "Muitas tentativas. Aguarde 1 minuto.".into(),
        };
        assert!(err.to_string().contains("Muitas tentativas"));
    }
}
