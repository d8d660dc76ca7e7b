//! Domain types and models

pub mod appointment;
pub mod slot;
pub mod window;

pub use appointment::Appointment;
pub use slot::{AccessWindow, AppointmentGroup, PinAssignment, PinCode, PinJob, SlotKey};
pub use window::TargetWindow;
