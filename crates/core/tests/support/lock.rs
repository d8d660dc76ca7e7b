use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pinsync_core::{LockPort, PinGenerator};
use pinsync_domain::{PinCode, PinJob, PinSyncError, Result as DomainResult};

/// In-memory mock for `LockPort`.
///
/// Records every submitted job; optionally rejects all of them.
#[derive(Default, Clone)]
pub struct MockLockPort {
    jobs: Arc<Mutex<Vec<PinJob>>>,
    reject: bool,
}

impl MockLockPort {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rejecting() -> Self {
        Self { reject: true, ..Self::default() }
    }

    pub fn jobs(&self) -> Vec<PinJob> {
        self.jobs.lock().unwrap().clone()
    }
}

#[async_trait]
impl LockPort for MockLockPort {
    async fn create_pin_job(&self, job: &PinJob) -> DomainResult<()> {
        self.jobs.lock().unwrap().push(job.clone());
        if self.reject {
            return Err(PinSyncError::Network("HTTP 503 bridge offline".into()));
        }
        Ok(())
    }
}

/// Deterministic `PinGenerator` yielding a fixed sequence, then repeating the
/// last value.
pub struct SequencePinGenerator {
    pins: Mutex<VecDeque<u16>>,
    last: Mutex<u16>,
}

impl SequencePinGenerator {
    pub fn new(pins: impl IntoIterator<Item = u16>) -> Self {
        Self { pins: Mutex::new(pins.into_iter().collect()), last: Mutex::new(0) }
    }
}

impl PinGenerator for SequencePinGenerator {
    fn generate(&self) -> PinCode {
        let mut last = self.last.lock().unwrap();
        if let Some(next) = self.pins.lock().unwrap().pop_front() {
            *last = next;
        }
        PinCode::new(*last).unwrap()
    }
}
