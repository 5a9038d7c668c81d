//! Credential storage capability
//!
//! The session keeps its token pair behind a small get/set/clear trait so the
//! backing store can be whatever the host environment offers (in-memory,
//! encrypted file, OS keychain). Tests use the in-memory implementation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// Access + refresh token pair issued by the auth endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Trait for credential storage backends.
///
/// Errors are stringly typed on purpose: the session treats a failing load
/// as "not authenticated" and a failing clear as already-cleared, so the
/// backend's error detail only ever feeds diagnostics.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Persist the token pair, replacing any previous one.
    async fn store(&self, pair: &TokenPair) -> Result<(), String>;

    /// Load the stored token pair, if any.
    async fn load(&self) -> Result<Option<TokenPair>, String>;

    /// Remove any stored token pair. Must be idempotent.
    async fn clear(&self) -> Result<(), String>;
}

/// In-memory credential store for tests and short-lived processes.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    inner: RwLock<Option<TokenPair>>,
}

impl InMemoryCredentialStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a token pair, for tests that start
    /// authenticated.
    #[must_use]
    pub fn with_pair(pair: TokenPair) -> Self {
        Self { inner: RwLock::new(Some(pair)) }
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn store(&self, pair: &TokenPair) -> Result<(), String> {
        *self.inner.write().await = Some(pair.clone());
        Ok(())
    }

    async fn load(&self) -> Result<Option<TokenPair>, String> {
        Ok(self.inner.read().await.clone())
    }

    async fn clear(&self) -> Result<(), String> {
        *self.inner.write().await = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair() -> TokenPair {
        TokenPair { access_token: "access".into(), refresh_token: "refresh".into() }
    }

    #[tokio::test]
    async fn store_and_load_roundtrip() {
        let store = InMemoryCredentialStore::new();
        assert_eq!(store.load().await.unwrap(), None);

        store.store(&pair()).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(pair()));
    }

    #[tokio::test]
    async fn clear_is_idempotent() {
        let store = InMemoryCredentialStore::with_pair(pair());
        store.clear().await.unwrap();
        store.clear().await.unwrap();
        assert_eq!(store.load().await.unwrap(), None);
    }
}
