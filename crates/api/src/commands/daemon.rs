use std::sync::Arc;

use pinsync_domain::{PinSyncError, Result};
use pinsync_infra::{PinSyncScheduler, PinSyncSchedulerConfig};
use tracing::{info, warn};

use crate::AppContext;

/// Run the cron scheduler until Ctrl-C.
pub async fn run_daemon(ctx: &AppContext) -> Result<()> {
    let mut scheduler = PinSyncScheduler::new(
        PinSyncSchedulerConfig::from(&ctx.config.schedule),
        Arc::clone(&ctx.orchestrator),
        Arc::clone(&ctx.refresher),
    );
    scheduler.start().await?;
    info!("Daemon running; press Ctrl-C to stop");

    let signal = tokio::signal::ctrl_c()
        .await
        .map_err(|err| PinSyncError::Internal(format!("failed to listen for Ctrl-C: {err}")));
    if let Err(err) = &signal {
        warn!(error = %err, "Shutting down without a signal");
    }

    scheduler.stop().await?;
    info!("Daemon stopped");
    signal
}
