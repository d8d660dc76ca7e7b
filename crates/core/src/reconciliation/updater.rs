//! Appointment updater - writes issued PINs back into appointment notes

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use pinsync_domain::PinAssignment;
use tracing::{debug, error};

use super::ports::SchedulingPort;

/// Aggregated result of one update pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateReport {
    pub succeeded: Vec<u64>,
    /// `(appointment_id, error message)`
    pub failed: Vec<(u64, String)>,
}

impl UpdateReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Persists PIN assignments through the scheduling service
pub struct AppointmentUpdater {
    scheduling: Arc<dyn SchedulingPort>,
    concurrency: usize,
}

impl AppointmentUpdater {
    /// `concurrency` bounds in-flight writes; `1` writes strictly in order.
    pub fn new(scheduling: Arc<dyn SchedulingPort>, concurrency: usize) -> Self {
        Self { scheduling, concurrency: concurrency.max(1) }
    }

    /// Write every assignment. A failure is logged and recorded, never
    /// propagated, and never stops the remaining writes.
    pub async fn apply(&self, assignments: &[PinAssignment]) -> UpdateReport {
        let outcomes: Vec<_> = stream::iter(assignments.iter().copied())
            .map(|assignment| {
                let scheduling = Arc::clone(&self.scheduling);
                async move {
                    let notes = assignment.pin.to_string();
                    let result = scheduling.update_notes(assignment.appointment_id, &notes).await;
                    (assignment.appointment_id, result)
                }
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        let mut report = UpdateReport::default();
        for (appointment_id, result) in outcomes {
            match result {
                Ok(()) => {
                    debug!(appointment_id, "Appointment notes updated");
                    report.succeeded.push(appointment_id);
                }
                Err(err) => {
                    error!(appointment_id, error = %err, "Failed to update appointment notes");
                    report.failed.push((appointment_id, err.to_string()));
                }
            }
        }
        report
    }
}
