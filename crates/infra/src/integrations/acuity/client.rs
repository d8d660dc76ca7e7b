//! Acuity Scheduling API client

use async_trait::async_trait;
use chrono::NaiveDateTime;
use pinsync_core::SchedulingPort;
use pinsync_domain::utils::format_query_timestamp;
use pinsync_domain::{Appointment, PinSyncError, Result, SchedulingConfig};
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use super::types::{AcuityAppointment, NotesUpdate};
use crate::errors::to_domain;
use crate::http::HttpClient;

/// Appointments endpoint client (HTTP Basic auth with user id and API key)
#[derive(Clone)]
pub struct AcuityClient {
    http: HttpClient,
    base_url: String,
    user_id: String,
    api_key: String,
}

impl AcuityClient {
    pub fn new(http: HttpClient, config: &SchedulingConfig) -> Self {
        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            user_id: config.user_id.clone(),
            api_key: config.api_key.clone(),
        }
    }

    fn appointment_url(&self, appointment_id: u64) -> String {
        format!("{}/{}", self.base_url, appointment_id)
    }
}

impl std::fmt::Debug for AcuityClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AcuityClient")
            .field("base_url", &self.base_url)
            .field("user_id", &self.user_id)
            .finish_non_exhaustive()
    }
}

/// Decode the listing body record by record; malformed records are skipped.
fn decode_listing(body: &str) -> Result<Vec<Appointment>> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }

    let records: Vec<Value> = serde_json::from_str(body).map_err(to_domain)?;
    let mut appointments = Vec::with_capacity(records.len());

    for record in records {
        let id = record.get("id").cloned();
        let parsed = serde_json::from_value::<AcuityAppointment>(record)
            .map_err(to_domain)
            .and_then(Appointment::try_from);
        match parsed {
            Ok(appt) => appointments.push(appt),
            Err(err) => warn!(appointment_id = ?id, error = %err, "Skipping malformed appointment"),
        }
    }

    Ok(appointments)
}

#[async_trait]
impl SchedulingPort for AcuityClient {
    #[instrument(skip(self), fields(min = %min, max = %max))]
    async fn fetch_appointments(
        &self,
        min: NaiveDateTime,
        max: NaiveDateTime,
    ) -> Result<Vec<Appointment>> {
        let request = self
            .http
            .request(Method::GET, &self.base_url)
            .basic_auth(&self.user_id, Some(&self.api_key))
            .query(&[("minDate", format_query_timestamp(min)), ("maxDate", format_query_timestamp(max))]);

        let response = self.http.send_checked(request).await?;
        let body = response.text().await.map_err(to_domain)?;
        let appointments = decode_listing(&body)?;

        debug!(count = appointments.len(), "Fetched appointments");
        Ok(appointments)
    }

    #[instrument(skip(self, notes))]
    async fn update_notes(&self, appointment_id: u64, notes: &str) -> Result<()> {
        let request = self
            .http
            .request(Method::PUT, self.appointment_url(appointment_id))
            .basic_auth(&self.user_id, Some(&self.api_key))
            .query(&[("admin", "true")])
            .json(&NotesUpdate { notes });

        let response = self.http.send_checked(request).await.map_err(|err| match err {
            PinSyncError::NotFound(msg) => {
                PinSyncError::NotFound(format!("appointment {appointment_id}: {msg}"))
            }
            other => other,
        })?;

        info!(appointment_id, status = %response.status(), "Appointment notes updated");
        Ok(())
    }
}
