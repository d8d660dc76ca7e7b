//! System keychain credential store
use async_trait::async_trait;
use keyring::Entry;
use pinsync_core::{AccessToken, CredentialStore};
use pinsync_domain::{PinSyncError, Result};

use crate::errors::to_domain;

/// Token serialized as JSON into a single keychain entry
#[derive(Debug, Clone)]
pub struct KeyringCredentialStore {
    service: String,
    account: String,
}

impl KeyringCredentialStore {
    pub fn new(service: impl Into<String>, account: impl Into<String>) -> Self {
        Self { service: service.into(), account: account.into() }
    }

    fn entry(&self) -> Result<Entry> {
        Entry::new(&self.service, &self.account).map_err(to_domain)
    }
}

#[async_trait]
impl CredentialStore for KeyringCredentialStore {
    async fn get_token(&self) -> Result<Option<AccessToken>> {
        let entry = self.entry()?;
        let raw = tokio::task::spawn_blocking(move || entry.get_password())
            .await
            .map_err(|err| PinSyncError::Internal(format!("keychain task failed: {err}")))?;

        match raw {
            Ok(json) => serde_json::from_str(&json).map(Some).map_err(to_domain),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(err) => Err(to_domain(err)),
        }
    }

    async fn set_token(&self, token: &AccessToken) -> Result<()> {
        let entry = self.entry()?;
        let json = serde_json::to_string(token).map_err(to_domain)?;
        tokio::task::spawn_blocking(move || entry.set_password(&json))
            .await
            .map_err(|err| PinSyncError::Internal(format!("keychain task failed: {err}")))?
            .map_err(to_domain)
    }
}
