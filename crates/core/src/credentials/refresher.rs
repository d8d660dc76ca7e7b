//! Token refresh and an in-memory store

use std::sync::Arc;

use async_trait::async_trait;
use pinsync_domain::Result;
use tokio::sync::RwLock;
use tracing::{error, info, instrument};

use super::ports::{AccessToken, AccessTokenSource, CredentialStore};

/// Fetches a new bearer token and persists it for the lock client
pub struct TokenRefresher {
    source: Arc<dyn AccessTokenSource>,
    store: Arc<dyn CredentialStore>,
}

impl TokenRefresher {
    pub fn new(source: Arc<dyn AccessTokenSource>, store: Arc<dyn CredentialStore>) -> Self {
        Self { source, store }
    }

    /// Fetch and persist a token.
    ///
    /// # Errors
    /// Propagates token endpoint and store failures; the previously stored
    /// token is left untouched when the fetch fails.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<AccessToken> {
        let token = self.source.fetch_token().await.inspect_err(|err| {
            error!(error = %err, "Token endpoint request failed");
        })?;
        self.store.set_token(&token).await.inspect_err(|err| {
            error!(error = %err, "Failed to persist refreshed token");
        })?;
        info!(expires_in_secs = ?token.expires_in_secs, "Lock platform token refreshed");
        Ok(token)
    }
}

/// Process-local credential store
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    token: RwLock<Option<AccessToken>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: AccessToken) -> Self {
        Self { token: RwLock::new(Some(token)) }
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn get_token(&self) -> Result<Option<AccessToken>> {
        Ok(self.token.read().await.clone())
    }

    async fn set_token(&self, token: &AccessToken) -> Result<()> {
        *self.token.write().await = Some(token.clone());
        Ok(())
    }
}
