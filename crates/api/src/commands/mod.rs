//! Subcommand implementations

pub mod daemon;
pub mod reconcile;
pub mod token;

pub use daemon::run_daemon;
pub use reconcile::{run_once, target_window};
pub use token::refresh_token;
