//! Lock job client

use std::sync::Arc;

use async_trait::async_trait;
use pinsync_core::{CredentialStore, LockPort};
use pinsync_domain::{LockConfig, PinJob, PinSyncError, Result};
use reqwest::Method;
use tracing::{debug, info, instrument};

use super::types::CreateJobRequest;
use crate::errors::to_domain;
use crate::http::HttpClient;

/// Submits create-PIN jobs to a lock through its bridge.
///
/// The bearer token is read from the credential store on every call so a
/// concurrent refresh is picked up without restarting.
pub struct IglooLockClient {
    http: HttpClient,
    job_url: String,
    credentials: Arc<dyn CredentialStore>,
}

impl IglooLockClient {
    pub fn new(http: HttpClient, config: &LockConfig, credentials: Arc<dyn CredentialStore>) -> Self {
        Self { http, job_url: config.job_url(), credentials }
    }

    async fn bearer(&self) -> Result<String> {
        match self.credentials.get_token().await? {
            Some(token) => Ok(token.secret().to_string()),
            None => Err(PinSyncError::Auth(
                "no lock platform token stored; run `pinsync refresh-token` first".into(),
            )),
        }
    }
}

#[async_trait]
impl LockPort for IglooLockClient {
    #[instrument(skip(self, job), fields(label = %job.label))]
    async fn create_pin_job(&self, job: &PinJob) -> Result<()> {
        let token = self.bearer().await?;
        let payload = CreateJobRequest::from(job);
        debug!(
            start = %payload.job_data.start_date,
            end = %payload.job_data.end_date,
            "Submitting lock PIN job"
        );

        let request =
            self.http.request(Method::POST, &self.job_url).bearer_auth(token).json(&payload);
        let response = self.http.send_checked(request).await?;
        let status = response.status();
        let body = response.text().await.map_err(to_domain)?;

        debug!(%status, body = %body, "Lock job response");
        info!(slot = %job.slot, "Lock PIN job accepted");
        Ok(())
    }
}
