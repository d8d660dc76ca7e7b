//! # PinSync application
//!
//! Command-line entry points and dependency wiring for the reconciliation
//! service.

pub mod cli;
pub mod commands;
pub mod context;
pub mod utils;

pub use cli::{Cli, Command};
pub use context::AppContext;
