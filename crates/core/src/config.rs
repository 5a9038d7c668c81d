//! Engine configuration

use std::time::Duration;

use helpdesk_client::ClientConfig;

/// Configuration for a full engine instance.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Transport settings (base URL, request timeout).
    pub client: ClientConfig,
    /// Page size requested from the ticket list endpoint.
    pub page_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { client: ClientConfig::default(), page_size: 1000 }
    }
}

impl EngineConfig {
    /// Configuration pointing at the given base URL with defaults elsewhere.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { client: ClientConfig::new(base_url), ..Self::default() }
    }

    /// Override the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client.timeout = timeout;
        self
    }

    /// Override the ticket list page size.
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }
}
