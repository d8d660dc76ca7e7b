//! Lock platform credential refresh

pub mod ports;
pub mod refresher;

pub use ports::{AccessToken, AccessTokenSource, CredentialStore};
pub use refresher::{MemoryCredentialStore, TokenRefresher};
