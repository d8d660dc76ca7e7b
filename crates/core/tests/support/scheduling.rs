use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDateTime;
use pinsync_core::SchedulingPort;
use pinsync_domain::{Appointment, PinSyncError, Result as DomainResult};

/// In-memory mock for `SchedulingPort`.
///
/// Serves a fixed appointment list (filtered by nominal start), records every
/// requested range and notes write, and can be told to fail the fetch or
/// individual writes.
#[derive(Default, Clone)]
pub struct MockSchedulingPort {
    appointments: Arc<Vec<Appointment>>,
    fetch_error: Option<PinSyncError>,
    failing_updates: Arc<HashSet<u64>>,
    fetches: Arc<Mutex<Vec<(NaiveDateTime, NaiveDateTime)>>>,
    updates: Arc<Mutex<Vec<(u64, String)>>>,
}

impl MockSchedulingPort {
    pub fn new(appointments: Vec<Appointment>) -> Self {
        Self { appointments: Arc::new(appointments), ..Self::default() }
    }

    pub fn failing_fetch(error: PinSyncError) -> Self {
        Self { fetch_error: Some(error), ..Self::default() }
    }

    /// Make writes for these appointment ids fail.
    pub fn with_failing_updates(mut self, ids: impl IntoIterator<Item = u64>) -> Self {
        self.failing_updates = Arc::new(ids.into_iter().collect());
        self
    }

    pub fn fetches(&self) -> Vec<(NaiveDateTime, NaiveDateTime)> {
        self.fetches.lock().unwrap().clone()
    }

    pub fn updates(&self) -> Vec<(u64, String)> {
        self.updates.lock().unwrap().clone()
    }

    pub fn notes_for(&self, id: u64) -> Option<String> {
        self.updates().into_iter().find(|(appt, _)| *appt == id).map(|(_, notes)| notes)
    }
}

#[async_trait]
impl SchedulingPort for MockSchedulingPort {
    async fn fetch_appointments(
        &self,
        min: NaiveDateTime,
        max: NaiveDateTime,
    ) -> DomainResult<Vec<Appointment>> {
        self.fetches.lock().unwrap().push((min, max));
        if let Some(err) = &self.fetch_error {
            return Err(err.clone());
        }
        Ok(self
            .appointments
            .iter()
            .filter(|a| a.nominal_start() >= min && a.nominal_start() <= max)
            .cloned()
            .collect())
    }

    async fn update_notes(&self, appointment_id: u64, notes: &str) -> DomainResult<()> {
        self.updates.lock().unwrap().push((appointment_id, notes.to_string()));
        if self.failing_updates.contains(&appointment_id) {
            return Err(PinSyncError::Network(format!("HTTP 500 for appointment {appointment_id}")));
        }
        Ok(())
    }
}
