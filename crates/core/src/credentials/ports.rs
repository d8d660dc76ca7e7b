//! Port interfaces for the lock platform bearer token

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pinsync_domain::Result;
use serde::{Deserialize, Serialize};

/// Bearer token for the lock platform.
///
/// `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    #[serde(rename = "access_token")]
    secret: String,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in_secs: Option<u64>,
}

impl AccessToken {
    pub fn new(secret: impl Into<String>, updated_at: DateTime<Utc>) -> Self {
        Self { secret: secret.into(), updated_at, expires_in_secs: None }
    }

    pub fn with_expiry(mut self, expires_in_secs: Option<u64>) -> Self {
        self.expires_in_secs = expires_in_secs;
        self
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("secret", &"<redacted>")
            .field("updated_at", &self.updated_at)
            .field("expires_in_secs", &self.expires_in_secs)
            .finish()
    }
}

/// Issues fresh tokens (client-credentials grant)
#[async_trait]
pub trait AccessTokenSource: Send + Sync {
    async fn fetch_token(&self) -> Result<AccessToken>;
}

/// Persists the current token between runs
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// `Ok(None)` when no token has been stored yet.
    async fn get_token(&self) -> Result<Option<AccessToken>>;

    /// Replace the stored token atomically.
    async fn set_token(&self, token: &AccessToken) -> Result<()>;
}
