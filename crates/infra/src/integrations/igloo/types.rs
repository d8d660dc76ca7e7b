//! Request bodies for the lock job API

use pinsync_domain::constants::{LOCK_JOB_TYPE_CUSTOM_PIN, LOCK_PIN_TYPE_DURATION};
use pinsync_domain::PinJob;
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobRequest {
    pub job_type: u8,
    pub job_data: PinJobData,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PinJobData {
    pub access_name: String,
    pub pin: String,
    pub pin_type: u8,
    pub start_date: String,
    pub end_date: String,
}

impl From<&PinJob> for CreateJobRequest {
    fn from(job: &PinJob) -> Self {
        Self {
            job_type: LOCK_JOB_TYPE_CUSTOM_PIN,
            job_data: PinJobData {
                access_name: job.label.clone(),
                pin: job.pin.to_string(),
                pin_type: LOCK_PIN_TYPE_DURATION,
                start_date: job.window.formatted_start(),
                end_date: job.window.formatted_end(),
            },
        }
    }
}
