//! Logging setup and helpers

pub mod logging;
