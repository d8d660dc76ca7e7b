//! Logging helpers shared by the reconciliation services

pub mod redact;

pub use redact::redact_email;
