use std::time::Instant;

use chrono::{DateTime, Utc};
use pinsync_domain::Result;

use crate::utils::logging::log_command_execution;
use crate::AppContext;

/// Fetch and store a fresh lock platform token; returns when it was issued.
pub async fn refresh_token(ctx: &AppContext) -> Result<DateTime<Utc>> {
    let started = Instant::now();
    let result = ctx.refresher.refresh().await.map(|token| token.updated_at);
    log_command_execution("refresh-token", started.elapsed(), result.as_ref().err());
    result
}
