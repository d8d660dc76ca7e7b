//! Port interfaces for appointment reconciliation
//!
//! These traits define the boundaries between the reconciliation logic and
//! the scheduling service, the lock platform and the PIN source.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use pinsync_domain::{Appointment, PinCode, PinJob, Result};
use rand::Rng;

use pinsync_domain::constants::MAX_PIN_VALUE;

/// Read/write access to booked appointments
#[async_trait]
pub trait SchedulingPort: Send + Sync {
    /// Appointments whose start lies in `[min, max]` (business-local time).
    ///
    /// An empty result is `Ok(vec![])`; transport or decoding failures are
    /// errors.
    async fn fetch_appointments(
        &self,
        min: NaiveDateTime,
        max: NaiveDateTime,
    ) -> Result<Vec<Appointment>>;

    /// Overwrite the notes of one appointment.
    async fn update_notes(&self, appointment_id: u64, notes: &str) -> Result<()>;
}

/// Lock platform job submission
#[async_trait]
pub trait LockPort: Send + Sync {
    /// Submit a time-bounded PIN to the lock (via its bridge).
    async fn create_pin_job(&self, job: &PinJob) -> Result<()>;
}

/// Source of fresh PIN codes
pub trait PinGenerator: Send + Sync {
    fn generate(&self) -> PinCode;
}

/// Uniformly random PINs in `0000..=9999`
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomPinGenerator;

impl PinGenerator for RandomPinGenerator {
    fn generate(&self) -> PinCode {
        PinCode::wrapping(rand::thread_rng().gen_range(0..=MAX_PIN_VALUE))
    }
}
