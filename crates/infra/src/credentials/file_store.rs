//! JSON file credential store

use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use pinsync_core::{AccessToken, CredentialStore};
use pinsync_domain::{PinSyncError, Result};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::errors::to_domain;

/// Token persisted as `{"access_token": "...", "updated_at": "..."}`.
///
/// Writes go to a temp file in the same directory which is then renamed over
/// the target, so readers never observe a partial file.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn read_token(path: &Path) -> Result<Option<AccessToken>> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(to_domain(err)),
    };
    if raw.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str(&raw).map(Some).map_err(|err| {
        PinSyncError::Storage(format!("corrupt token file {}: {err}", path.display()))
    })
}

fn write_token(path: &Path, token: &AccessToken) -> Result<()> {
    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&parent).map_err(to_domain)?;

    let json = serde_json::to_vec_pretty(token).map_err(to_domain)?;
    let mut tmp = NamedTempFile::new_in(&parent).map_err(to_domain)?;
    tmp.write_all(&json).map_err(to_domain)?;
    tmp.as_file().sync_all().map_err(to_domain)?;
    tmp.persist(path).map_err(|err| to_domain(err.error))?;
    Ok(())
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn get_token(&self) -> Result<Option<AccessToken>> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || read_token(&path))
            .await
            .map_err(|err| PinSyncError::Internal(format!("token read task failed: {err}")))?
    }

    async fn set_token(&self, token: &AccessToken) -> Result<()> {
        let path = self.path.clone();
        let token = token.clone();
        tokio::task::spawn_blocking(move || write_token(&path, &token))
            .await
            .map_err(|err| PinSyncError::Internal(format!("token write task failed: {err}")))??;
        debug!(path = %self.path.display(), "Stored lock platform token");
        Ok(())
    }
}
