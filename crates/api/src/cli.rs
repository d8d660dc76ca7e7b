//! Command-line interface

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};

/// Issue lock PINs for upcoming appointments and write them back.
#[derive(Debug, Parser)]
#[command(name = "pinsync", version, about)]
pub struct Cli {
    /// Configuration file (TOML or JSON). Without it, environment variables
    /// are tried first and then the standard file locations.
    #[arg(long, global = true, env = "PINSYNC_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Run one reconciliation pass.
    Run {
        /// Pretend the run starts at this instant (RFC 3339).
        #[arg(long, value_parser = parse_instant)]
        now: Option<DateTime<Utc>>,
    },
    /// Fetch a new lock platform token and store it.
    RefreshToken,
    /// Print the slot a run would target.
    Window {
        #[arg(long, value_parser = parse_instant)]
        now: Option<DateTime<Utc>>,
    },
    /// Run reconciliation and token refresh on their cron schedules until
    /// interrupted.
    Daemon,
}

fn parse_instant(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|err| format!("expected an RFC 3339 timestamp such as 2026-10-18T12:05:00+08:00: {err}"))
}
