//! Appointment to lock PIN reconciliation

pub mod grouping;
pub mod issuance;
pub mod orchestrator;
pub mod ports;
pub mod updater;

pub use grouping::{GroupingOptions, GroupingOutcome, SlotGroupingEngine};
pub use issuance::{IssuanceOptions, IssuanceReport, IssuedPins, PinIssuanceCoordinator};
pub use orchestrator::{ReconciliationOrchestrator, RunState, RunSummary};
pub use updater::{AppointmentUpdater, UpdateReport};
