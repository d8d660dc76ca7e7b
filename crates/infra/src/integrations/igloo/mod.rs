//! Igloo lock platform integration (bridge-proxied PIN jobs)

pub mod lock_client;
pub mod token_source;
pub mod types;

pub use lock_client::IglooLockClient;
pub use token_source::IglooTokenSource;
