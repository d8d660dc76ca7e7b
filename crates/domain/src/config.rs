//! Configuration management

use std::path::PathBuf;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_BUFFER_MINUTES, DEFAULT_LOOKAHEAD_MINUTES, DEFAULT_OFFSET_HOURS,
    DEFAULT_SLOT_WIDTH_MINUTES, DEFAULT_TIMEZONE, MAX_BUFFER_MINUTES,
};
use crate::errors::{PinSyncError, Result};

pub const DEFAULT_SCHEDULING_URL: &str = "https://acuityscheduling.com/api/v1/appointments";
pub const DEFAULT_LOCK_URL: &str =
    "https://api.igloodeveloper.co/igloohome/devices/{deviceId}/jobs/bridges/{bridgeId}";
pub const DEFAULT_TOKEN_URL: &str = "https://auth.igloohome.co/oauth2/token";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub scheduling: SchedulingConfig,
    pub lock: LockConfig,
    #[serde(default)]
    pub run: RunConfig,
    #[serde(default)]
    pub credentials: CredentialsConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

impl Config {
    /// Check cross-field invariants that serde cannot express.
    ///
    /// # Errors
    /// Returns `PinSyncError::Config` describing the first violated rule.
    pub fn validate(&self) -> Result<()> {
        self.run.timezone()?;

        if self.run.slot_width_minutes == 0 {
            return Err(PinSyncError::Config("run.slot_width_minutes must be positive".into()));
        }
        if self.run.lookahead_minutes < self.run.slot_width_minutes {
            return Err(PinSyncError::Config(format!(
                "run.lookahead_minutes ({}) must cover run.slot_width_minutes ({})",
                self.run.lookahead_minutes, self.run.slot_width_minutes
            )));
        }
        if self.run.buffer_minutes > MAX_BUFFER_MINUTES {
            return Err(PinSyncError::Config(format!(
                "run.buffer_minutes must not exceed {MAX_BUFFER_MINUTES}"
            )));
        }
        if self.run.update_concurrency == 0 {
            return Err(PinSyncError::Config("run.update_concurrency must be at least 1".into()));
        }
        if self.scheduling.base_url.trim().is_empty() {
            return Err(PinSyncError::Config("scheduling.base_url is empty".into()));
        }
        if self.lock.api_url.trim().is_empty() {
            return Err(PinSyncError::Config("lock.api_url is empty".into()));
        }
        Ok(())
    }
}

/// Scheduling service (appointments) credentials and endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulingConfig {
    #[serde(default = "default_scheduling_url")]
    pub base_url: String,
    pub user_id: String,
    #[serde(skip_serializing)]
    pub api_key: String,
}

/// Lock platform endpoints and OAuth client credentials
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LockConfig {
    /// Job endpoint template containing `{deviceId}` and `{bridgeId}`.
    #[serde(default = "default_lock_url")]
    pub api_url: String,
    pub device_id: String,
    pub bridge_id: String,
    #[serde(default = "default_token_url")]
    pub token_url: String,
    pub client_id: String,
    #[serde(skip_serializing)]
    pub client_secret: String,
}

impl LockConfig {
    /// Job endpoint with the device and bridge identifiers substituted.
    pub fn job_url(&self) -> String {
        self.api_url.replace("{deviceId}", &self.device_id).replace("{bridgeId}", &self.bridge_id)
    }
}

/// Reconciliation run parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// IANA timezone the appointments and lock windows are expressed in.
    pub timezone: String,
    /// Hours between "now" (truncated to the hour) and the target slot.
    pub offset_hours: u32,
    pub slot_width_minutes: u32,
    /// Fetch horizon from the target slot start, used to see consecutive
    /// bookings that continue past the slot.
    pub lookahead_minutes: u32,
    pub buffer_minutes: u32,
    pub skip_if_note_non_empty: bool,
    pub target_window_strict: bool,
    /// Regenerate a PIN that already serves another slot in the same run.
    pub avoid_pin_collisions: bool,
    pub update_concurrency: usize,
}

impl RunConfig {
    /// Parse the configured timezone.
    ///
    /// # Errors
    /// Returns `PinSyncError::Config` for an unknown IANA name.
    pub fn timezone(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| PinSyncError::Config(format!("Invalid timezone '{}': {}", self.timezone, e)))
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            timezone: DEFAULT_TIMEZONE.to_string(),
            offset_hours: DEFAULT_OFFSET_HOURS,
            slot_width_minutes: DEFAULT_SLOT_WIDTH_MINUTES,
            lookahead_minutes: DEFAULT_LOOKAHEAD_MINUTES,
            buffer_minutes: DEFAULT_BUFFER_MINUTES,
            skip_if_note_non_empty: true,
            target_window_strict: true,
            avoid_pin_collisions: false,
            update_concurrency: 1,
        }
    }
}

/// Where the lock platform bearer token is persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CredentialBackend {
    #[default]
    File,
    Keyring,
}

/// Credential store settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialsConfig {
    pub backend: CredentialBackend,
    /// Token file used by the `file` backend.
    pub path: PathBuf,
    /// Keyring service name used by the `keyring` backend.
    pub service: String,
    /// Keyring account name used by the `keyring` backend.
    pub account: String,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            backend: CredentialBackend::File,
            path: PathBuf::from("credentials/lock-token.json"),
            service: "com.pinsync.lock".to_string(),
            account: "access_token".to_string(),
        }
    }
}

/// Cron schedule for the daemon mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    pub reconcile_cron: String,
    pub token_refresh_cron: String,
    pub job_timeout_secs: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            reconcile_cron: "0 5 * * * *".to_string(), // hourly, five past
            token_refresh_cron: "0 0 */6 * * *".to_string(),
            job_timeout_secs: 300,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Append-only operational log; `None` logs to stderr only.
    pub file: Option<PathBuf>,
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { file: Some(PathBuf::from("logs/pinsync.log")), level: "info".to_string() }
    }
}

/// Outbound HTTP configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    pub user_agent: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_secs: 30, user_agent: None }
    }
}

fn default_scheduling_url() -> String {
    DEFAULT_SCHEDULING_URL.to_string()
}

fn default_lock_url() -> String {
    DEFAULT_LOCK_URL.to_string()
}

fn default_token_url() -> String {
    DEFAULT_TOKEN_URL.to_string()
}
