//! Acuity Scheduling integration

pub mod client;
pub mod types;

pub use client::AcuityClient;
pub use types::AcuityAppointment;
