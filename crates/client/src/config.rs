//! Client configuration

use std::time::Duration;

/// Configuration for the API and auth clients.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the helpdesk API (e.g. "http://localhost:8080").
    pub base_url: String,
    /// Timeout applied to every request.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self { base_url: "http://localhost:8080".to_string(), timeout: Duration::from_secs(30) }
    }
}

impl ClientConfig {
    /// Configuration pointing at the given base URL with default timeouts.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), ..Self::default() }
    }
}
