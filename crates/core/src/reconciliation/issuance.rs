//! PIN issuance - one PIN and one lock job per logical slot

use std::sync::Arc;

use ahash::AHashMap as HashMap;
use chrono::TimeDelta;
use chrono_tz::Tz;
use pinsync_domain::{
    AccessWindow, AppointmentGroup, PinAssignment, PinCode, PinJob, Result, RunConfig, SlotKey,
};
use tracing::{debug, info, warn};

use super::ports::{LockPort, PinGenerator};

/// Upper bound on regenerations when avoiding PIN reuse within a run.
const MAX_PIN_ATTEMPTS: usize = 32;

/// PINs issued during one run, keyed by slot.
///
/// Created empty for every run and dropped when the run ends.
#[derive(Debug, Default, Clone)]
pub struct IssuedPins {
    by_slot: HashMap<SlotKey, PinCode>,
}

impl IssuedPins {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: &SlotKey) -> Option<PinCode> {
        self.by_slot.get(slot).copied()
    }

    pub fn record(&mut self, slot: SlotKey, pin: PinCode) {
        self.by_slot.insert(slot, pin);
    }

    /// Whether `pin` already serves some slot of this run.
    pub fn serves(&self, pin: PinCode) -> bool {
        self.by_slot.values().any(|issued| *issued == pin)
    }

    pub fn len(&self) -> usize {
        self.by_slot.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_slot.is_empty()
    }
}

/// Issuance parameters
#[derive(Debug, Clone, Copy)]
pub struct IssuanceOptions {
    /// Margin added before and after each slot.
    pub buffer: TimeDelta,
    /// Zone the lock timestamps are rendered in.
    pub timezone: Tz,
    /// Regenerate a PIN that already serves another slot in this run.
    pub avoid_collisions_within_run: bool,
}

impl IssuanceOptions {
    /// # Errors
    /// Returns `PinSyncError::Config` for an unknown timezone.
    pub fn from_config(run: &RunConfig) -> Result<Self> {
        Ok(Self {
            buffer: TimeDelta::minutes(i64::from(run.buffer_minutes)),
            timezone: run.timezone()?,
            avoid_collisions_within_run: run.avoid_pin_collisions,
        })
    }
}

/// Outcome of one issuance pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssuanceReport {
    /// One entry per appointment of every processed group.
    pub assignments: Vec<PinAssignment>,
    /// Lock jobs the platform accepted.
    pub jobs_submitted: usize,
    /// Lock jobs that failed; their PINs are still assigned.
    pub jobs_failed: usize,
    /// Groups that reused a PIN from an identical slot.
    pub slots_reused: usize,
}

/// Allocates PINs for appointment groups and pushes them to the lock
pub struct PinIssuanceCoordinator {
    lock: Arc<dyn LockPort>,
    generator: Arc<dyn PinGenerator>,
    options: IssuanceOptions,
}

impl PinIssuanceCoordinator {
    pub fn new(
        lock: Arc<dyn LockPort>,
        generator: Arc<dyn PinGenerator>,
        options: IssuanceOptions,
    ) -> Self {
        Self { lock, generator, options }
    }

    /// Assign a PIN to every appointment in `groups`.
    ///
    /// Groups sharing a [`SlotKey`] (already in `issued` or seen earlier in
    /// `groups`) reuse the same PIN and trigger no lock call. A failed lock
    /// call is logged and counted; the PIN stays recorded for the slot.
    pub async fn issue(&self, groups: &[AppointmentGroup], issued: &mut IssuedPins) -> IssuanceReport {
        let mut report = IssuanceReport::default();

        for group in groups {
            let slot = group.slot_key();

            let pin = if let Some(pin) = issued.get(&slot) {
                debug!(slot = %slot, appointment_id = group.first().id, "Reusing PIN for slot");
                report.slots_reused += 1;
                pin
            } else {
                let pin = self.fresh_pin(issued);
                issued.record(slot, pin);
                let job = self.job_for(group, pin);
                match self.lock.create_pin_job(&job).await {
                    Ok(()) => {
                        report.jobs_submitted += 1;
                        info!(
                            slot = %slot,
                            label = %job.label,
                            starts = %job.window.formatted_start(),
                            ends = %job.window.formatted_end(),
                            "PIN job created on lock"
                        );
                    }
                    Err(err) => {
                        report.jobs_failed += 1;
                        warn!(
                            slot = %slot,
                            label = %job.label,
                            error = %err,
                            error_kind = err.label(),
                            "Lock rejected PIN job; PIN still assigned"
                        );
                    }
                }
                pin
            };

            report.assignments.extend(
                group.members().iter().map(|a| PinAssignment { appointment_id: a.id, pin }),
            );
        }

        report
    }

    fn job_for(&self, group: &AppointmentGroup, pin: PinCode) -> PinJob {
        let window = AccessWindow::for_group(group, self.options.buffer, self.options.timezone);
        PinJob { slot: group.slot_key(), label: window.label.clone(), pin, window }
    }

    fn fresh_pin(&self, issued: &IssuedPins) -> PinCode {
        let mut pin = self.generator.generate();
        if !self.options.avoid_collisions_within_run {
            return pin;
        }
        for _ in 1..MAX_PIN_ATTEMPTS {
            if !issued.serves(pin) {
                return pin;
            }
            pin = self.generator.generate();
        }
        if issued.serves(pin) {
            warn!(attempts = MAX_PIN_ATTEMPTS, "Could not find an unused PIN, accepting duplicate");
        }
        pin
    }
}
