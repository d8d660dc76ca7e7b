use std::time::Instant;

use chrono::{DateTime, Utc};
use pinsync_core::RunSummary;
use pinsync_domain::{Result, TargetWindow};
use tracing::info;

use crate::utils::logging::log_command_execution;
use crate::AppContext;

/// One reconciliation run as of `now` (defaults to the current time).
///
/// # Errors
/// Only a failed appointment fetch is an error; everything else is reported
/// in the summary.
pub async fn run_once(ctx: &AppContext, now: Option<DateTime<Utc>>) -> Result<RunSummary> {
    let started = Instant::now();
    let result = ctx.orchestrator.run(now.unwrap_or_else(Utc::now)).await;
    log_command_execution("run", started.elapsed(), result.as_ref().err());

    if let Ok(summary) = &result {
        info!(
            target_slot = %summary.target,
            groups = summary.groups,
            jobs_submitted = summary.jobs_submitted,
            jobs_failed = summary.jobs_failed,
            updates_failed = summary.updates_failed,
            "Run finished"
        );
    }
    result
}

/// Target window a run at `now` would use.
pub fn target_window(ctx: &AppContext, now: Option<DateTime<Utc>>) -> Result<TargetWindow> {
    ctx.orchestrator.target_for(&now.unwrap_or_else(Utc::now))
}
