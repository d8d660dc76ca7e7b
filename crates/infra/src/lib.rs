//! # PinSync Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - HTTP adapters for the scheduling service and the lock platform
//! - OAuth2 token source and credential stores (file, system keychain)
//! - Configuration loading
//! - Cron scheduling of reconciliation and token refresh
//!
//! ## Architecture
//! - Implements traits defined in `pinsync-core`
//! - Depends on `pinsync-domain` and `pinsync-core`
//! - Contains all "impure" code (network, filesystem, keychain)

pub mod config;
pub mod credentials;
pub mod errors;
pub mod http;
pub mod integrations;
pub mod scheduling;

// Re-export commonly used items
pub use credentials::{credential_store, FileCredentialStore, KeyringCredentialStore};
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use integrations::acuity::AcuityClient;
pub use integrations::igloo::{IglooLockClient, IglooTokenSource};
pub use scheduling::{PinSyncScheduler, PinSyncSchedulerConfig, SchedulerError};
