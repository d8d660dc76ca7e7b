//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. If every required environment variable is set, loads from the
//!    environment; invalid values are errors, not a reason to fall back
//! 2. If any required variable is missing, loads from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! Whichever source wins, the result goes through [`Config::validate`].
//!
//! ## Environment Variables
//! Required:
//! - `PINSYNC_SCHEDULING_USER_ID`, `PINSYNC_SCHEDULING_API_KEY`
//! - `PINSYNC_LOCK_DEVICE_ID`, `PINSYNC_LOCK_BRIDGE_ID`
//! - `PINSYNC_LOCK_CLIENT_ID`, `PINSYNC_LOCK_CLIENT_SECRET`
//!
//! Optional (defaults from [`Config`]):
//! - `PINSYNC_SCHEDULING_BASE_URL`, `PINSYNC_LOCK_API_URL`, `PINSYNC_LOCK_TOKEN_URL`
//! - `PINSYNC_TIMEZONE`, `PINSYNC_OFFSET_HOURS`, `PINSYNC_BUFFER_MINUTES`
//! - `PINSYNC_SKIP_IF_NOTE_NON_EMPTY`, `PINSYNC_TARGET_WINDOW_STRICT`,
//!   `PINSYNC_AVOID_PIN_COLLISIONS`, `PINSYNC_UPDATE_CONCURRENCY`
//! - `PINSYNC_CREDENTIALS_BACKEND` (`file` or `keyring`), `PINSYNC_CREDENTIALS_PATH`
//! - `PINSYNC_LOG_FILE`, `PINSYNC_LOG_LEVEL`
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./pinsync.toml`, `./pinsync.json`, `./config.toml`, `./config.json`
//! 2. The same names one and two directories up
//! 3. The same names next to the executable

use std::path::{Path, PathBuf};
use std::str::FromStr;

use pinsync_domain::config::{DEFAULT_LOCK_URL, DEFAULT_SCHEDULING_URL, DEFAULT_TOKEN_URL};
use pinsync_domain::{
    Config, CredentialBackend, CredentialsConfig, HttpConfig, LockConfig, LoggingConfig,
    PinSyncError, Result, RunConfig, ScheduleConfig, SchedulingConfig,
};

const CONFIG_FILE_NAMES: &[&str] = &["pinsync.toml", "pinsync.json", "config.toml", "config.json"];

const REQUIRED_ENV_VARS: &[&str] = &[
    "PINSYNC_SCHEDULING_USER_ID",
    "PINSYNC_SCHEDULING_API_KEY",
    "PINSYNC_LOCK_DEVICE_ID",
    "PINSYNC_LOCK_BRIDGE_ID",
    "PINSYNC_LOCK_CLIENT_ID",
    "PINSYNC_LOCK_CLIENT_SECRET",
];

/// Load configuration with automatic fallback strategy
///
/// Loads from environment variables when all required ones are set.
/// Otherwise falls back to loading from a config file.
///
/// # Errors
/// Returns `PinSyncError::Config` if:
/// - An environment variable holds an invalid value
/// - No config file is found when the environment is incomplete
/// - File format is invalid
/// - Required fields are missing or values are out of range
pub fn load() -> Result<Config> {
    let missing = missing_env_vars();
    if !missing.is_empty() {
        tracing::debug!(missing = ?missing, "Environment incomplete, loading config file");
        return load_from_file(None);
    }

    let config = load_from_env()?;
    tracing::info!("Configuration loaded from environment variables");
    Ok(config)
}

/// Required environment variables that are unset.
fn missing_env_vars() -> Vec<&'static str> {
    REQUIRED_ENV_VARS.iter().copied().filter(|key| std::env::var(key).is_err()).collect()
}

/// Load configuration from environment variables
///
/// # Errors
/// Returns `PinSyncError::Config` if required variables are missing
/// or have invalid values.
pub fn load_from_env() -> Result<Config> {
    let run_defaults = RunConfig::default();
    let credential_defaults = CredentialsConfig::default();
    let logging_defaults = LoggingConfig::default();

    let scheduling = SchedulingConfig {
        base_url: env_or("PINSYNC_SCHEDULING_BASE_URL", DEFAULT_SCHEDULING_URL.to_string()),
        user_id: env_var("PINSYNC_SCHEDULING_USER_ID")?,
        api_key: env_var("PINSYNC_SCHEDULING_API_KEY")?,
    };

    let lock = LockConfig {
        api_url: env_or("PINSYNC_LOCK_API_URL", DEFAULT_LOCK_URL.to_string()),
        device_id: env_var("PINSYNC_LOCK_DEVICE_ID")?,
        bridge_id: env_var("PINSYNC_LOCK_BRIDGE_ID")?,
        token_url: env_or("PINSYNC_LOCK_TOKEN_URL", DEFAULT_TOKEN_URL.to_string()),
        client_id: env_var("PINSYNC_LOCK_CLIENT_ID")?,
        client_secret: env_var("PINSYNC_LOCK_CLIENT_SECRET")?,
    };

    let run = RunConfig {
        timezone: env_or("PINSYNC_TIMEZONE", run_defaults.timezone.clone()),
        offset_hours: env_parse("PINSYNC_OFFSET_HOURS", run_defaults.offset_hours)?,
        buffer_minutes: env_parse("PINSYNC_BUFFER_MINUTES", run_defaults.buffer_minutes)?,
        skip_if_note_non_empty: env_bool(
            "PINSYNC_SKIP_IF_NOTE_NON_EMPTY",
            run_defaults.skip_if_note_non_empty,
        ),
        target_window_strict: env_bool(
            "PINSYNC_TARGET_WINDOW_STRICT",
            run_defaults.target_window_strict,
        ),
        avoid_pin_collisions: env_bool(
            "PINSYNC_AVOID_PIN_COLLISIONS",
            run_defaults.avoid_pin_collisions,
        ),
        update_concurrency: env_parse(
            "PINSYNC_UPDATE_CONCURRENCY",
            run_defaults.update_concurrency,
        )?,
        ..run_defaults
    };

    let backend = match std::env::var("PINSYNC_CREDENTIALS_BACKEND").ok() {
        Some(value) => parse_backend(&value)?,
        None => credential_defaults.backend,
    };
    let credentials = CredentialsConfig {
        backend,
        path: std::env::var("PINSYNC_CREDENTIALS_PATH")
            .map(PathBuf::from)
            .unwrap_or(credential_defaults.path.clone()),
        ..credential_defaults
    };

    let logging = LoggingConfig {
        file: std::env::var("PINSYNC_LOG_FILE").map(PathBuf::from).ok().or(logging_defaults.file),
        level: env_or("PINSYNC_LOG_LEVEL", logging_defaults.level),
    };

    let config = Config {
        scheduling,
        lock,
        run,
        credentials,
        schedule: ScheduleConfig::default(),
        logging,
        http: HttpConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `PinSyncError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Required fields are missing or values are out of range
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(PinSyncError::Config(format!("Config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            PinSyncError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| PinSyncError::Config(format!("Failed to read config file: {e}")))?;

    let config = parse_config(&contents, &config_path)?;
    config.validate()?;
    Ok(config)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| PinSyncError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| PinSyncError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(PinSyncError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        roots.extend([cwd.clone(), cwd.join(".."), cwd.join("../..")]);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            roots.push(exe_dir.to_path_buf());
        }
    }

    roots
        .iter()
        .flat_map(|root| CONFIG_FILE_NAMES.iter().map(move |name| root.join(name)))
        .find(|path| path.exists())
}

fn parse_backend(value: &str) -> Result<CredentialBackend> {
    match value.trim().to_ascii_lowercase().as_str() {
        "file" => Ok(CredentialBackend::File),
        "keyring" => Ok(CredentialBackend::Keyring),
        other => Err(PinSyncError::Config(format!("Unknown credentials backend: {other}"))),
    }
}

/// Get required environment variable
fn env_var(key: &str) -> Result<String> {
    std::env::var(key)
        .map_err(|_| PinSyncError::Config(format!("Missing required environment variable: {key}")))
}

fn env_or(key: &str, default: String) -> String {
    std::env::var(key).unwrap_or(default)
}

fn env_parse<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| PinSyncError::Config(format!("Invalid value for {key}: {e}"))),
        Err(_) => Ok(default),
    }
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use once_cell::sync::Lazy;

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    const REQUIRED: [(&str, &str); 6] = [
        ("PINSYNC_SCHEDULING_USER_ID", "1234"),
        ("PINSYNC_SCHEDULING_API_KEY", "api-key"),
        ("PINSYNC_LOCK_DEVICE_ID", "IGK3"),
        ("PINSYNC_LOCK_BRIDGE_ID", "BR1"),
        ("PINSYNC_LOCK_CLIENT_ID", "cid"),
        ("PINSYNC_LOCK_CLIENT_SECRET", "csecret"),
    ];

    const OPTIONAL: &[&str] = &[
        "PINSYNC_BUFFER_MINUTES",
        "PINSYNC_CREDENTIALS_BACKEND",
        "PINSYNC_SKIP_IF_NOTE_NON_EMPTY",
        "PINSYNC_UPDATE_CONCURRENCY",
    ];

    fn set_required() {
        for (key, value) in REQUIRED {
            std::env::set_var(key, value);
        }
    }

    fn clear_all() {
        for (key, _) in REQUIRED {
            std::env::remove_var(key);
        }
        for key in OPTIONAL {
            std::env::remove_var(key);
        }
    }

    const MINIMAL_TOML: &str = r#"
[scheduling]
user_id = "1234"
api_key = "api-key"

[lock]
device_id = "IGK3"
bridge_id = "BR1"
client_id = "cid"
client_secret = "csecret"

[run]
buffer_minutes = 15
"#;

    #[test]
    fn test_env_bool_parsing() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");

        std::env::set_var("TEST_PINSYNC_BOOL_YES", "YES");
        std::env::set_var("TEST_PINSYNC_BOOL_OFF", "off");
        assert!(env_bool("TEST_PINSYNC_BOOL_YES", false));
        assert!(!env_bool("TEST_PINSYNC_BOOL_OFF", true));
        std::env::remove_var("TEST_PINSYNC_BOOL_MISSING");
        assert!(env_bool("TEST_PINSYNC_BOOL_MISSING", true));

        std::env::remove_var("TEST_PINSYNC_BOOL_YES");
        std::env::remove_var("TEST_PINSYNC_BOOL_OFF");
    }

    #[test]
    fn test_load_from_env_all_vars_set() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        set_required();
        std::env::set_var("PINSYNC_BUFFER_MINUTES", "5");
        std::env::set_var("PINSYNC_CREDENTIALS_BACKEND", "Keyring");
        std::env::set_var("PINSYNC_SKIP_IF_NOTE_NON_EMPTY", "false");

        let result = load_from_env();
        clear_all();

        let config = result.expect("config from env");
        assert_eq!(config.scheduling.user_id, "1234");
        assert_eq!(config.scheduling.base_url, "https://acuityscheduling.com/api/v1/appointments");
        assert_eq!(
            config.lock.job_url(),
            "https://api.igloodeveloper.co/igloohome/devices/IGK3/jobs/bridges/BR1"
        );
        assert_eq!(config.run.buffer_minutes, 5);
        assert!(!config.run.skip_if_note_non_empty);
        assert_eq!(config.credentials.backend, CredentialBackend::Keyring);
        assert_eq!(config.run.timezone, "Asia/Singapore");
    }

    #[test]
    fn test_load_from_env_missing_var() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_all();

        let err = load_from_env().unwrap_err();
        assert!(matches!(err, PinSyncError::Config(_)), "Should be a Config error");
    }

    #[test]
    fn test_load_from_env_invalid_number() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        set_required();
        std::env::set_var("PINSYNC_UPDATE_CONCURRENCY", "many");

        let result = load_from_env();
        clear_all();

        match result {
            Err(PinSyncError::Config(msg)) => assert!(msg.contains("PINSYNC_UPDATE_CONCURRENCY")),
            other => panic!("expected config error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_env_vars_lists_unset_keys() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        set_required();
        std::env::remove_var("PINSYNC_LOCK_BRIDGE_ID");

        let missing = missing_env_vars();
        clear_all();

        assert_eq!(missing, vec!["PINSYNC_LOCK_BRIDGE_ID"]);
    }

    #[test]
    fn test_load_propagates_invalid_env_value() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        set_required();
        std::env::set_var("PINSYNC_BUFFER_MINUTES", "soon");

        let result = load();
        clear_all();

        match result {
            Err(PinSyncError::Config(msg)) => assert!(msg.contains("PINSYNC_BUFFER_MINUTES")),
            other => panic!("expected config error, got {other:?}"),
        }
    }

    #[test]
    fn test_load_propagates_env_validation_failure() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        set_required();
        std::env::set_var("PINSYNC_BUFFER_MINUTES", "600");

        let result = load();
        clear_all();

        assert!(matches!(result, Err(PinSyncError::Config(_))));
    }

    #[test]
    fn test_load_from_env_rejects_out_of_range_buffer() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        set_required();
        std::env::set_var("PINSYNC_BUFFER_MINUTES", "600");

        let result = load_from_env();
        clear_all();

        assert!(matches!(result, Err(PinSyncError::Config(_))));
    }

    #[test]
    fn test_load_from_file_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pinsync.toml");
        std::fs::write(&path, MINIMAL_TOML).unwrap();

        let config = load_from_file(Some(path)).expect("config from TOML");
        assert_eq!(config.run.buffer_minutes, 15);
        assert_eq!(config.lock.device_id, "IGK3");
        assert_eq!(config.schedule.reconcile_cron, "0 5 * * * *");
    }

    #[test]
    fn test_load_from_file_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pinsync.json");
        let json = r#"{
            "scheduling": { "user_id": "1", "api_key": "k" },
            "lock": { "device_id": "D", "bridge_id": "B", "client_id": "c", "client_secret": "s" },
            "credentials": { "backend": "keyring" }
        }"#;
        std::fs::write(&path, json).unwrap();

        let config = load_from_file(Some(path)).expect("config from JSON");
        assert_eq!(config.credentials.backend, CredentialBackend::Keyring);
    }

    #[test]
    fn test_load_from_file_not_found() {
        let err = load_from_file(Some(PathBuf::from("/nonexistent/pinsync.toml"))).unwrap_err();
        assert!(matches!(err, PinSyncError::Config(_)));
    }

    #[test]
    fn test_load_from_file_invalid_timezone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pinsync.toml");
        std::fs::write(&path, format!("{MINIMAL_TOML}timezone = \"Nowhere/Special\"\n")).unwrap();

        let err = load_from_file(Some(path)).unwrap_err();
        assert!(matches!(err, PinSyncError::Config(_)));
    }

    #[test]
    fn test_parse_config_unsupported_format() {
        let result = parse_config("some content", &PathBuf::from("test.yaml"));
        assert!(result.is_err(), "Should fail with unsupported format");
    }

    #[test]
    fn test_parse_backend_rejects_unknown() {
        assert!(parse_backend("vault").is_err());
        assert_eq!(parse_backend(" FILE ").unwrap(), CredentialBackend::File);
    }
}
