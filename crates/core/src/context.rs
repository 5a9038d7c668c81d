//! Engine context
//!
//! One constructible object bundling session, transport and repository.
//! There is no process-wide singleton: tests and embedders build as many
//! independent engines as they need.

use std::sync::Arc;

use helpdesk_client::{ApiClient, CredentialStore, SessionManager};
use helpdesk_domain::{Identity, Result};
use tracing::info;

use crate::config::EngineConfig;
use crate::repository::TicketRepository;

/// A fully wired helpdesk engine instance.
pub struct Engine {
    session: Arc<SessionManager>,
    tickets: TicketRepository,
}

impl Engine {
    /// Wire up an engine against the configured API with the given
    /// credential storage backend.
    ///
    /// # Errors
    /// Returns a configuration error when the HTTP clients cannot be built.
    pub fn new(config: &EngineConfig, store: Arc<dyn CredentialStore>) -> Result<Self> {
        let session = Arc::new(SessionManager::new(&config.client, store)?);
        let api = Arc::new(ApiClient::new(&config.client, session.clone())?);
        let tickets = TicketRepository::new(api, config.page_size);
        Ok(Self { session, tickets })
    }

    /// The session manager (login state, identity, refresh protocol).
    #[must_use]
    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    /// The ticket repository.
    #[must_use]
    pub fn tickets(&self) -> &TicketRepository {
        &self.tickets
    }

    /// Authenticate and perform the initial data load: full ticket sync plus
    /// reference data.
    ///
    /// # Errors
    /// Authentication failures propagate; the follow-up loads are
    /// best-effort per the repository's read policy.
    pub async fn login(&self, email: &str, password: &str) -> Result<Identity> {
        let identity = self.session.login(email, password).await?;
        self.tickets.fetch_all().await;
        self.tickets.fetch_reference_data().await;
        Ok(identity)
    }

    /// Restore a persisted session and, when one exists, perform the same
    /// initial load as [`Self::login`].
    ///
    /// # Errors
    /// Propagates credential decoding failures.
    pub async fn restore(&self) -> Result<Option<Identity>> {
        let Some(identity) = self.session.restore().await? else {
            return Ok(None);
        };
        self.tickets.fetch_all().await;
        self.tickets.fetch_reference_data().await;
        Ok(Some(identity))
    }

    /// End the session and drop all cached ticket state.
    pub async fn logout(&self) {
        self.session.logout().await;
        self.tickets.clear().await;
        info!("engine state cleared");
    }
}
