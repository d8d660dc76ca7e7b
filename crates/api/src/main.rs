//! PinSync - appointment to smart-lock PIN reconciliation
//!
//! Main entry point for the `pinsync` binary.

use anyhow::Context;
use clap::Parser;
use pinsync_lib::commands::{refresh_token, run_daemon, run_once, target_window};
use pinsync_lib::utils::logging::init_logging;
use pinsync_lib::{AppContext, Cli, Command};
use tracing::{debug, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables before configuration is read
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();

    let ctx = AppContext::load(cli.config.clone()).context("failed to load configuration")?;
    let _logging = init_logging(&ctx.config.logging).context("failed to initialise logging")?;
    match dotenv {
        Ok(path) => debug!(path = %path.display(), "Loaded .env"),
        Err(err) => debug!(error = %err, "No .env file loaded"),
    }

    match cli.command {
        Command::Run { now } => {
            let summary = run_once(&ctx, now).await.context("reconciliation run failed")?;
            print_json(&summary)?;
        }
        Command::RefreshToken => {
            let issued_at = refresh_token(&ctx).await.context("token refresh failed")?;
            info!(%issued_at, "Token stored");
        }
        Command::Window { now } => {
            let window = target_window(&ctx, now)?;
            print_json(&window)?;
        }
        Command::Daemon => run_daemon(&ctx).await?,
    }

    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
