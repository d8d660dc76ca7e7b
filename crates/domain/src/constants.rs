//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Access window
pub const DEFAULT_BUFFER_MINUTES: u32 = 10;
pub const MAX_BUFFER_MINUTES: u32 = 120;

// PIN codes
pub const PIN_DIGITS: usize = 4;
pub const MAX_PIN_VALUE: u16 = 9999;

// Target window defaults
pub const DEFAULT_TIMEZONE: &str = "Asia/Singapore";
pub const DEFAULT_OFFSET_HOURS: u32 = 3;
pub const DEFAULT_SLOT_WIDTH_MINUTES: u32 = 60;
pub const DEFAULT_LOOKAHEAD_MINUTES: u32 = 180;

// Lock platform job payload
pub const LOCK_JOB_TYPE_CUSTOM_PIN: u8 = 4;
pub const LOCK_PIN_TYPE_DURATION: u8 = 4;

// Scheduling service query/timestamp layout (local time, no offset)
pub const SCHEDULING_QUERY_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

// Lock platform timestamp layout (local time with `+HH:MM` offset)
pub const LOCK_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";

// Scopes requested by the lock platform client-credentials grant
pub const LOCK_TOKEN_SCOPES: &[&str] = &[
    "igloohomeapi/algopin-hourly",
    "igloohomeapi/algopin-daily",
    "igloohomeapi/algopin-permanent",
    "igloohomeapi/algopin-onetime",
    "igloohomeapi/create-pin-bridge-proxied-job",
    "igloohomeapi/delete-pin-bridge-proxied-job",
    "igloohomeapi/lock-bridge-proxied-job",
    "igloohomeapi/unlock-bridge-proxied-job",
    "igloohomeapi/get-devices",
    "igloohomeapi/get-job-status",
];
