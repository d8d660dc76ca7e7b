//! # PinSync Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port interfaces for the scheduling service, the lock and token storage
//! - The slot grouping engine and PIN issuance rules
//! - The reconciliation run orchestrator
//!
//! ## Architecture Principles
//! - Only depends on `pinsync-domain`
//! - No HTTP, filesystem or platform code
//! - All external dependencies via traits
//! - Time and timezone are always passed in

pub mod credentials;
pub mod reconciliation;
pub mod utils;

pub use credentials::{
    AccessToken, AccessTokenSource, CredentialStore, MemoryCredentialStore, TokenRefresher,
};
pub use reconciliation::ports::{LockPort, PinGenerator, RandomPinGenerator, SchedulingPort};
pub use reconciliation::{
    AppointmentUpdater, GroupingOptions, GroupingOutcome, IssuanceOptions, IssuanceReport,
    IssuedPins, PinIssuanceCoordinator, ReconciliationOrchestrator, RunState, RunSummary,
    SlotGroupingEngine, UpdateReport,
};
pub use utils::redact_email;
