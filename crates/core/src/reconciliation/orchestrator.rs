//! Reconciliation run orchestrator
//!
//! One run: compute the target window, fetch, group, issue PINs, write notes.
//! Only a failed fetch fails the run; every later fault is localized to its
//! group or appointment and shows up in [`RunSummary`].

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use pinsync_domain::{Result, RunConfig, TargetWindow};
use serde::Serialize;
use tokio::sync::watch;
use tracing::{error, info, instrument};

use super::grouping::{GroupingOptions, SlotGroupingEngine};
use super::issuance::{IssuanceOptions, IssuedPins, PinIssuanceCoordinator};
use super::ports::{LockPort, PinGenerator, SchedulingPort};
use super::updater::AppointmentUpdater;

/// Lifecycle of a single run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Idle,
    Fetching,
    Processing,
    NoAppointments,
    Done,
}

/// What a completed run did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub target: TargetWindow,
    /// `NoAppointments` or `Done`.
    pub state: RunState,
    pub fetched: usize,
    pub already_assigned: usize,
    pub mismatched: usize,
    pub groups: usize,
    pub jobs_submitted: usize,
    pub jobs_failed: usize,
    pub slots_reused: usize,
    pub updates_succeeded: usize,
    pub updates_failed: usize,
}

impl RunSummary {
    fn empty(target: TargetWindow) -> Self {
        Self {
            target,
            state: RunState::NoAppointments,
            fetched: 0,
            already_assigned: 0,
            mismatched: 0,
            groups: 0,
            jobs_submitted: 0,
            jobs_failed: 0,
            slots_reused: 0,
            updates_succeeded: 0,
            updates_failed: 0,
        }
    }
}

/// Puts the state back to `Idle` however the run ends, including when the
/// run future is dropped.
struct IdleOnDrop<'a>(&'a watch::Sender<RunState>);

impl Drop for IdleOnDrop<'_> {
    fn drop(&mut self) {
        self.0.send_replace(RunState::Idle);
    }
}

/// Wires fetcher, grouping engine, issuance coordinator and updater together
pub struct ReconciliationOrchestrator {
    scheduling: Arc<dyn SchedulingPort>,
    engine: SlotGroupingEngine,
    coordinator: PinIssuanceCoordinator,
    updater: AppointmentUpdater,
    run: RunConfig,
    state: watch::Sender<RunState>,
}

impl ReconciliationOrchestrator {
    /// Build an orchestrator from its collaborators and run parameters.
    ///
    /// # Errors
    /// Returns `PinSyncError::Config` for an unknown timezone.
    pub fn new(
        scheduling: Arc<dyn SchedulingPort>,
        lock: Arc<dyn LockPort>,
        generator: Arc<dyn PinGenerator>,
        run: RunConfig,
    ) -> Result<Self> {
        let options = IssuanceOptions::from_config(&run)?;
        let (state, _) = watch::channel(RunState::Idle);
        Ok(Self {
            engine: SlotGroupingEngine::new(GroupingOptions::from(&run)),
            coordinator: PinIssuanceCoordinator::new(lock, generator, options),
            updater: AppointmentUpdater::new(Arc::clone(&scheduling), run.update_concurrency),
            scheduling,
            run,
            state,
        })
    }

    /// Current state of the run in progress (or `Idle`).
    pub fn state(&self) -> RunState {
        *self.state.borrow()
    }

    /// Observe state transitions.
    pub fn subscribe(&self) -> watch::Receiver<RunState> {
        self.state.subscribe()
    }

    /// Target window a run started at `now` would aim at.
    ///
    /// # Errors
    /// Returns `PinSyncError::Config` for an unknown timezone.
    pub fn target_for<Z: TimeZone>(&self, now: &DateTime<Z>) -> Result<TargetWindow> {
        TargetWindow::from_config(now, &self.run)
    }

    /// Execute one reconciliation run as of `now`.
    ///
    /// # Errors
    /// Only a failed appointment fetch is returned as an error.
    #[instrument(skip_all, fields(now = %now))]
    pub async fn run(&self, now: DateTime<Utc>) -> Result<RunSummary> {
        let target = self.target_for(&now)?;
        let _idle = IdleOnDrop(&self.state);
        self.run_for(target).await
    }

    async fn run_for(&self, target: TargetWindow) -> Result<RunSummary> {
        self.state.send_replace(RunState::Fetching);
        let (min, max) = target.fetch_range();
        info!(target = %target, "Fetching appointments");

        let appointments = match self.scheduling.fetch_appointments(min, max).await {
            Ok(appointments) => appointments,
            Err(err) => {
                error!(error = %err, target = %target.label(), "Failed to fetch appointments");
                return Err(err);
            }
        };

        if appointments.is_empty() {
            self.state.send_replace(RunState::NoAppointments);
            info!("No appointments found for time slot: {}", target.label());
            return Ok(RunSummary::empty(target));
        }

        self.state.send_replace(RunState::Processing);
        let fetched = appointments.len();
        let outcome = self.engine.group(appointments, &target);

        let mut issued = IssuedPins::new();
        let issuance = self.coordinator.issue(&outcome.groups, &mut issued).await;
        let updates = self.updater.apply(&issuance.assignments).await;

        let summary = RunSummary {
            target,
            state: RunState::Done,
            fetched,
            already_assigned: outcome.already_assigned.len(),
            mismatched: outcome.mismatched.len(),
            groups: outcome.groups.len(),
            jobs_submitted: issuance.jobs_submitted,
            jobs_failed: issuance.jobs_failed,
            slots_reused: issuance.slots_reused,
            updates_succeeded: updates.succeeded.len(),
            updates_failed: updates.failed.len(),
        };
        self.state.send_replace(RunState::Done);

        info!(
            target = %target.label(),
            fetched = summary.fetched,
            groups = summary.groups,
            pins_issued = issued.len(),
            jobs_submitted = summary.jobs_submitted,
            jobs_failed = summary.jobs_failed,
            updates_succeeded = summary.updates_succeeded,
            updates_failed = summary.updates_failed,
            "Reconciliation run completed"
        );

        Ok(summary)
    }
}
