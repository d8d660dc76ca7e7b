//! Cron scheduler for reconciliation runs and token refresh.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use pinsync_core::{ReconciliationOrchestrator, TokenRefresher};
//! use pinsync_domain::ScheduleConfig;
//! use pinsync_infra::scheduling::{PinSyncScheduler, PinSyncSchedulerConfig, SchedulerResult};
//!
//! # async fn example(
//! #     orchestrator: Arc<ReconciliationOrchestrator>,
//! #     refresher: Arc<TokenRefresher>,
//! # ) -> SchedulerResult<()> {
//! let config = PinSyncSchedulerConfig::from(&ScheduleConfig::default());
//! let mut scheduler = PinSyncScheduler::new(config, orchestrator, refresher);
//!
//! scheduler.start().await?;
//! // ... until shutdown ...
//! scheduler.stop().await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use pinsync_core::{ReconciliationOrchestrator, TokenRefresher};
use pinsync_domain::ScheduleConfig;
use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use crate::scheduling::error::{SchedulerError, SchedulerResult};

/// Scheduler timings and cron expressions (six fields, seconds first, UTC).
#[derive(Debug, Clone)]
pub struct PinSyncSchedulerConfig {
    pub reconcile_cron: String,
    pub token_refresh_cron: String,
    /// Token refresh timeout, and the point after which a reconciliation
    /// run is reported as overrunning. Runs themselves are never cut short.
    pub job_timeout: Duration,
    pub start_timeout: Duration,
    pub stop_timeout: Duration,
}

impl Default for PinSyncSchedulerConfig {
    fn default() -> Self {
        Self::from(&ScheduleConfig::default())
    }
}

impl From<&ScheduleConfig> for PinSyncSchedulerConfig {
    fn from(config: &ScheduleConfig) -> Self {
        Self {
            reconcile_cron: config.reconcile_cron.clone(),
            token_refresh_cron: config.token_refresh_cron.clone(),
            job_timeout: Duration::from_secs(config.job_timeout_secs),
            start_timeout: Duration::from_secs(5),
            stop_timeout: Duration::from_secs(5),
        }
    }
}

/// Result of one scheduled tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Completed,
    Failed,
    /// Only produced by token refresh; reconciliation runs finish.
    TimedOut,
    /// A previous reconciliation run was still in progress.
    Skipped,
}

/// Runs reconciliation and token refresh on cron schedules.
///
/// Reconciliation ticks never overlap inside one process: a tick that finds
/// a run in progress is skipped.
pub struct PinSyncScheduler {
    scheduler: Option<JobScheduler>,
    config: PinSyncSchedulerConfig,
    cancellation: CancellationToken,
    orchestrator: Arc<ReconciliationOrchestrator>,
    refresher: Arc<TokenRefresher>,
    run_guard: Arc<Mutex<()>>,
}

impl PinSyncScheduler {
    pub fn new(
        config: PinSyncSchedulerConfig,
        orchestrator: Arc<ReconciliationOrchestrator>,
        refresher: Arc<TokenRefresher>,
    ) -> Self {
        Self {
            scheduler: None,
            config,
            cancellation: CancellationToken::new(),
            orchestrator,
            refresher,
            run_guard: Arc::new(Mutex::new(())),
        }
    }

    /// Register both jobs and start the underlying scheduler.
    #[instrument(skip(self))]
    pub async fn start(&mut self) -> SchedulerResult<()> {
        if self.is_running() {
            return Err(SchedulerError::AlreadyRunning);
        }

        self.cancellation = CancellationToken::new();

        let mut scheduler = self.build_scheduler().await?;
        let start_timeout = self.config.start_timeout;

        let started = tokio::time::timeout(start_timeout, scheduler.start())
            .await
            .map_err(|_| SchedulerError::Timeout { duration: start_timeout })?;
        if let Err(source) = started {
            let _ = scheduler.shutdown().await;
            return Err(SchedulerError::StartFailed { source });
        }

        self.scheduler = Some(scheduler);

        info!(
            reconcile_cron = %self.config.reconcile_cron,
            token_refresh_cron = %self.config.token_refresh_cron,
            "PinSync scheduler started"
        );
        Ok(())
    }

    /// Shut the scheduler down.
    #[instrument(skip(self))]
    pub async fn stop(&mut self) -> SchedulerResult<()> {
        let Some(mut scheduler) = self.scheduler.take() else {
            return Err(SchedulerError::NotRunning);
        };

        self.cancellation.cancel();

        let stop_timeout = self.config.stop_timeout;
        tokio::time::timeout(stop_timeout, scheduler.shutdown())
            .await
            .map_err(|_| SchedulerError::Timeout { duration: stop_timeout })?
            .map_err(|source| SchedulerError::StopFailed { source })?;

        info!("PinSync scheduler stopped");
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_some()
    }

    async fn build_scheduler(&self) -> SchedulerResult<JobScheduler> {
        let scheduler =
            JobScheduler::new().await.map_err(|source| SchedulerError::CreationFailed { source })?;
        let job_timeout = self.config.job_timeout;

        let orchestrator = Arc::clone(&self.orchestrator);
        let guard = Arc::clone(&self.run_guard);
        let cancel = self.cancellation.clone();
        let reconcile = Job::new_async(self.config.reconcile_cron.as_str(), move |_id, _lock| {
            let orchestrator = Arc::clone(&orchestrator);
            let guard = Arc::clone(&guard);
            let cancel = cancel.clone();
            Box::pin(async move {
                if cancel.is_cancelled() {
                    debug!("Scheduler shutting down; not starting a reconciliation run");
                    return;
                }
                reconcile_tick(orchestrator, &guard, job_timeout).await;
            })
        })
        .map_err(|source| SchedulerError::JobRegistrationFailed { job: "reconcile", source })?;

        let refresher = Arc::clone(&self.refresher);
        let refresh = Job::new_async(self.config.token_refresh_cron.as_str(), move |_id, _lock| {
            let refresher = Arc::clone(&refresher);
            Box::pin(async move {
                refresh_tick(&refresher, job_timeout).await;
            })
        })
        .map_err(|source| SchedulerError::JobRegistrationFailed { job: "token_refresh", source })?;

        for (name, job) in [("reconcile", reconcile), ("token_refresh", refresh)] {
            let job_id = job.guid();
            scheduler
                .add(job)
                .await
                .map_err(|source| SchedulerError::JobRegistrationFailed { job: name, source })?;
            debug!(job = name, job_id = %job_id, "Registered scheduled job");
        }

        Ok(scheduler)
    }
}

/// One reconciliation tick, skipped when a run is already in flight.
///
/// The run executes on its own task and always finishes; `overrun_after`
/// only decides when a warning is logged.
pub async fn reconcile_tick(
    orchestrator: Arc<ReconciliationOrchestrator>,
    guard: &Mutex<()>,
    overrun_after: Duration,
) -> TickOutcome {
    let Ok(_running) = guard.try_lock() else {
        warn!("Previous reconciliation run still in progress; skipping tick");
        return TickOutcome::Skipped;
    };

    let started = Instant::now();
    let mut run = tokio::spawn(async move { orchestrator.run(Utc::now()).await });
    let joined = match tokio::time::timeout(overrun_after, &mut run).await {
        Ok(joined) => joined,
        Err(_) => {
            warn!(
                overrun_secs = overrun_after.as_secs(),
                "Scheduled reconciliation still running; waiting for it to finish"
            );
            run.await
        }
    };

    match joined {
        Ok(Ok(summary)) => {
            debug!(
                elapsed_ms = started.elapsed().as_millis() as u64,
                state = ?summary.state,
                "Scheduled reconciliation finished"
            );
            TickOutcome::Completed
        }
        Ok(Err(err)) => {
            error!(error = %err, "Scheduled reconciliation failed");
            TickOutcome::Failed
        }
        Err(err) => {
            error!(error = %err, "Scheduled reconciliation task aborted");
            TickOutcome::Failed
        }
    }
}

/// One token refresh tick.
pub async fn refresh_tick(refresher: &TokenRefresher, job_timeout: Duration) -> TickOutcome {
    match tokio::time::timeout(job_timeout, refresher.refresh()).await {
        Ok(Ok(_)) => TickOutcome::Completed,
        Ok(Err(err)) => {
            error!(error = %err, "Scheduled token refresh failed");
            TickOutcome::Failed
        }
        Err(_) => {
            warn!(timeout_secs = job_timeout.as_secs(), "Scheduled token refresh timed out");
            TickOutcome::TimedOut
        }
    }
}

impl Drop for PinSyncScheduler {
    fn drop(&mut self) {
        if self.is_running() {
            warn!("PinSyncScheduler dropped while running; cancelling tasks");
            self.cancellation.cancel();
        }
    }
}
