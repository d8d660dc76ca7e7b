//! Credential stores for the lock platform token

pub mod file_store;
pub mod keyring_store;

use std::sync::Arc;

pub use file_store::FileCredentialStore;
pub use keyring_store::KeyringCredentialStore;
use pinsync_core::CredentialStore;
use pinsync_domain::{CredentialBackend, CredentialsConfig};

/// Store selected by `credentials.backend`.
pub fn credential_store(config: &CredentialsConfig) -> Arc<dyn CredentialStore> {
    match config.backend {
        CredentialBackend::File => Arc::new(FileCredentialStore::new(config.path.clone())),
        CredentialBackend::Keyring => {
            Arc::new(KeyringCredentialStore::new(config.service.clone(), config.account.clone()))
        }
    }
}
