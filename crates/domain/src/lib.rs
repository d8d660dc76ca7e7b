//! # PinSync Domain
//!
//! Business domain types and models for PinSync.
//!
//! This crate contains:
//! - Appointment, group and slot types shared by every layer
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Domain constants and time/label formatting helpers
//!
//! ## Architecture
//! - No dependencies on other PinSync crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
