//! Session lifecycle: login, logout, restore and token refresh
//!
//! The [`SessionManager`] owns the authenticated identity and the token pair
//! (behind a [`CredentialStore`]). Refreshing is coalesced: when several
//! in-flight requests hit a 401 at the same time, exactly one of them runs
//! the refresh and the rest reuse its outcome. The coalescing is driven by a
//! session epoch that increments on every token change.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use helpdesk_domain::{HelpdeskError, Identity, Result};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::credentials::{CredentialStore, TokenPair};
use crate::token::decode_identity;
use crate::transport::response_error;
use crate::wire::{LoginRequestDto, RefreshRequestDto, TokenPairDto};

/// Thin client for the unauthenticated auth endpoints.
struct AuthApi {
    http: reqwest::Client,
    base_url: String,
}

impl AuthApi {
    fn new(config: &ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| HelpdeskError::Config(format!("failed to build http client: {err}")))?;
        Ok(Self { http, base_url: config.base_url.trim_end_matches('/').to_string() })
    }

    async fn login(&self, email: &str, password: &str) -> Result<TokenPairDto> {
        let response = self
            .http
            .post(format!("{}/api/auth/login", self.base_url))
            .json(&LoginRequestDto { email, senha: password })
            .send()
            .await
            .map_err(|err| HelpdeskError::Network(err.to_string()))?;

        if !response.status().is_success() {
            return Err(response_error(response).await);
        }
        response.json().await.map_err(|err| HelpdeskError::Decode(err.to_string()))
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenPairDto> {
        let response = self
            .http
            .post(format!("{}/api/auth/refresh", self.base_url))
            .json(&RefreshRequestDto { refresh_token })
            .send()
            .await
            .map_err(|err| HelpdeskError::Network(err.to_string()))?;

        if !response.status().is_success() {
            return Err(response_error(response).await);
        }
        response.json().await.map_err(|err| HelpdeskError::Decode(err.to_string()))
    }

    async fn revoke(&self, refresh_token: &str) -> Result<()> {
        let response = self
            .http
            .post(format!("{}/api/auth/logout", self.base_url))
            .json(&RefreshRequestDto { refresh_token })
            .send()
            .await
            .map_err(|err| HelpdeskError::Network(err.to_string()))?;

        if !response.status().is_success() {
            return Err(response_error(response).await);
        }
        Ok(())
    }
}

/// Owns the session state and the refresh protocol.
pub struct SessionManager {
    auth: AuthApi,
    store: Arc<dyn CredentialStore>,
    identity: RwLock<Option<Identity>>,
    /// Incremented whenever the token pair changes (login, refresh, logout).
    epoch: AtomicU64,
    /// Serializes refresh attempts so concurrent 401s coalesce into one.
    refresh_gate: Mutex<()>,
}

impl SessionManager {
    /// Create a session manager against the given API and credential store.
    ///
    /// # Errors
    /// Returns [`HelpdeskError::Config`] if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig, store: Arc<dyn CredentialStore>) -> Result<Self> {
        Ok(Self {
            auth: AuthApi::new(config)?,
            store,
            identity: RwLock::new(None),
            epoch: AtomicU64::new(0),
            refresh_gate: Mutex::new(()),
        })
    }

    /// Authenticate with email and password.
    ///
    /// On success the token pair is persisted and the decoded identity
    /// becomes the current session identity.
    ///
    /// # Errors
    /// [`HelpdeskError::Authentication`] for rejected credentials,
    /// [`HelpdeskError::MalformedToken`] if the issued token cannot be
    /// decoded, plus the usual transport failures.
    pub async fn login(&self, email: &str, password: &str) -> Result<Identity> {
        let tokens = self.auth.login(email, password).await?;
        let identity = decode_identity(&tokens.access_token)?;

        self.install_pair(TokenPair {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
        })
        .await?;
        *self.identity.write().await = Some(identity.clone());

        info!(email = %identity.email, role = %identity.role.as_str(), "session established");
        Ok(identity)
    }

    /// End the session.
    ///
    /// The refresh token is revoked server-side on a best-effort basis;
    /// local state is cleared even when revocation fails, so the caller is
    /// always logged out afterwards.
    pub async fn logout(&self) {
        if let Ok(Some(pair)) = self.store.load().await {
            if let Err(err) = self.auth.revoke(&pair.refresh_token).await {
                warn!(error = %err, "server-side token revocation failed, clearing locally");
            }
        }
        self.destroy().await;
        info!("session terminated");
    }

    /// Restore a session from previously persisted credentials.
    ///
    /// Returns `Ok(None)` when no credentials are stored. Stored credentials
    /// whose access token no longer decodes are discarded.
    pub async fn restore(&self) -> Result<Option<Identity>> {
        let Some(pair) = self.store.load().await.ok().flatten() else {
            return Ok(None);
        };
        match decode_identity(&pair.access_token) {
            Ok(identity) => {
                *self.identity.write().await = Some(identity.clone());
                debug!(email = %identity.email, "session restored from stored credentials");
                Ok(Some(identity))
            }
            Err(err) => {
                warn!(error = %err, "stored access token is malformed, discarding");
                self.destroy().await;
                Ok(None)
            }
        }
    }

    /// The currently authenticated identity, if any.
    pub async fn identity(&self) -> Option<Identity> {
        self.identity.read().await.clone()
    }

    /// Current access token for the Authorization header.
    ///
    /// # Errors
    /// [`HelpdeskError::Authentication`] when no session is active.
    pub async fn access_token(&self) -> Result<String> {
        match self.store.load().await {
            Ok(Some(pair)) => Ok(pair.access_token),
            Ok(None) => Err(HelpdeskError::Authentication("no active session".into())),
            Err(err) => Err(HelpdeskError::Authentication(format!(
                "credential store unavailable: {err}"
            ))),
        }
    }

    /// Session epoch at this instant. Callers snapshot it before a request
    /// and hand it back to [`Self::refresh_after_unauthorized`] so a refresh
    /// that already happened is not repeated.
    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::Acquire)
    }

    /// Refresh the token pair after a request observed a 401.
    ///
    /// `seen_epoch` is the epoch the failing request was sent under. If the
    /// epoch has already moved on, another caller refreshed in the meantime
    /// and this call returns without touching the tokens. A failed refresh
    /// tears the session down so the caller surfaces a clean
    /// authentication error instead of retrying forever.
    ///
    /// # Errors
    /// [`HelpdeskError::Authentication`] when the session cannot be renewed.
    pub async fn refresh_after_unauthorized(&self, seen_epoch: u64) -> Result<()> {
        let _gate = self.refresh_gate.lock().await;
        if self.epoch() != seen_epoch {
            debug!("token already refreshed by a concurrent request");
            return Ok(());
        }

        let Some(pair) = self.store.load().await.ok().flatten() else {
            self.destroy().await;
            return Err(HelpdeskError::Authentication("no refresh token available".into()));
        };

        debug!("refreshing expired access token");
        match self.auth.refresh(&pair.refresh_token).await {
            Ok(tokens) => {
                let identity = decode_identity(&tokens.access_token)?;
                self.install_pair(TokenPair {
                    access_token: tokens.access_token,
                    refresh_token: tokens.refresh_token,
                })
                .await?;
                *self.identity.write().await = Some(identity);
                debug!("access token refreshed");
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "token refresh rejected, ending session");
                self.destroy().await;
                Err(HelpdeskError::Authentication(format!("session expired: {err}")))
            }
        }
    }

    /// Persist a new token pair and advance the epoch.
    async fn install_pair(&self, pair: TokenPair) -> Result<()> {
        self.store
            .store(&pair)
            .await
            .map_err(|err| HelpdeskError::Config(format!("credential store rejected write: {err}")))?;
        self.epoch.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }

    /// Drop all local session state. Idempotent.
    async fn destroy(&self) {
        if let Err(err) = self.store.clear().await {
            warn!(error = %err, "failed to clear stored credentials");
        }
        *self.identity.write().await = None;
        self.epoch.fetch_add(1, Ordering::AcqRel);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use helpdesk_domain::Role;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::credentials::InMemoryCredentialStore;
    use crate::token::test_support::token_with_payload;

    fn access_token(email: &str, role: &str) -> String {
        token_with_payload(&json!({ "sub": email, "name": "Test User", "role": role }))
    }

    async fn session(server: &MockServer) -> (SessionManager, Arc<InMemoryCredentialStore>) {
        let store = Arc::new(InMemoryCredentialStore::new());
        let config = ClientConfig::new(server.uri());
        let manager = SessionManager::new(&config, store.clone()).unwrap();
        (manager, store)
    }

    #[tokio::test]
    async fn login_stores_tokens_and_decodes_identity() {
        let server = MockServer::start().await;
        let access = access_token("ana@example.com", "admin");
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .and(body_json(json!({ "email": "ana@example.com", "senha": "s3cret" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "accessToken": access,
                "refreshToken": "refresh-1",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let (manager, store) = session(&server).await;
        let identity = manager.login("ana@example.com", "s3cret").await.unwrap();

        assert_eq!(identity.email, "ana@example.com");
        assert_eq!(identity.role, Role::Admin);
        assert_eq!(manager.identity().await, Some(identity));

        let stored = store.load().await.unwrap().unwrap();
        assert_eq!(stored.access_token, access);
        assert_eq!(stored.refresh_token, "refresh-1");
    }

    #[tokio::test]
    async fn rejected_credentials_surface_authentication_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let (manager, _) = session(&server).await;
        let err = manager.login("ana@example.com", "wrong").await.unwrap_err();
        assert!(err.is_authentication());
        assert_eq!(manager.identity().await, None);
    }

    #[tokio::test]
    async fn logout_clears_local_state_even_when_server_fails() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/logout"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let store = Arc::new(InMemoryCredentialStore::with_pair(TokenPair {
            access_token: access_token("ana@example.com", "user"),
            refresh_token: "refresh-1".into(),
        }));
        let config = ClientConfig::new(server.uri());
        let manager = SessionManager::new(&config, store.clone()).unwrap();
        manager.restore().await.unwrap();

        manager.logout().await;

        assert_eq!(manager.identity().await, None);
        assert_eq!(store.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn restore_discards_malformed_stored_token() {
        let server = MockServer::start().await;
        let store = Arc::new(InMemoryCredentialStore::with_pair(TokenPair {
            access_token: "garbage".into(),
            refresh_token: "refresh-1".into(),
        }));
        let config = ClientConfig::new(server.uri());
        let manager = SessionManager::new(&config, store.clone()).unwrap();

        assert_eq!(manager.restore().await.unwrap(), None);
        assert_eq!(store.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn refresh_replaces_token_pair() {
        let server = MockServer::start().await;
        let new_access = access_token("ana@example.com", "user");
        Mock::given(method("POST"))
            .and(path("/api/auth/refresh"))
            .and(body_json(json!({ "refreshToken": "refresh-1" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "accessToken": new_access,
                "refreshToken": "refresh-2",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let store = Arc::new(InMemoryCredentialStore::with_pair(TokenPair {
            access_token: access_token("ana@example.com", "user"),
            refresh_token: "refresh-1".into(),
        }));
        let config = ClientConfig::new(server.uri());
        let manager = SessionManager::new(&config, store.clone()).unwrap();

        let epoch = manager.epoch();
        manager.refresh_after_unauthorized(epoch).await.unwrap();

        let stored = store.load().await.unwrap().unwrap();
        assert_eq!(stored.refresh_token, "refresh-2");
        assert!(manager.epoch() > epoch);
    }

    #[tokio::test]
    async fn refresh_with_stale_epoch_is_a_no_op() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/refresh"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "accessToken": access_token("ana@example.com", "user"),
                "refreshToken": "refresh-2",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let store = Arc::new(InMemoryCredentialStore::with_pair(TokenPair {
            access_token: access_token("ana@example.com", "user"),
            refresh_token: "refresh-1".into(),
        }));
        let config = ClientConfig::new(server.uri());
        let manager = SessionManager::new(&config, store).unwrap();

        let epoch = manager.epoch();
        manager.refresh_after_unauthorized(epoch).await.unwrap();
        // Second caller still holds the pre-refresh epoch; the mock's
        // expect(1) fails the test if a second refresh goes out.
        manager.refresh_after_unauthorized(epoch).await.unwrap();
    }

    #[tokio::test]
    async fn rejected_refresh_tears_down_the_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/refresh"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;

        let store = Arc::new(InMemoryCredentialStore::with_pair(TokenPair {
            access_token: access_token("ana@example.com", "user"),
            refresh_token: "refresh-1".into(),
        }));
        let config = ClientConfig::new(server.uri());
        let manager = SessionManager::new(&config, store.clone()).unwrap();
        manager.restore().await.unwrap();

        let err = manager.refresh_after_unauthorized(manager.epoch()).await.unwrap_err();
        assert!(err.is_authentication());
        assert_eq!(manager.identity().await, None);
        assert_eq!(store.load().await.unwrap(), None);
    }
}
