//! Parsing and formatting of scheduling-service and lock-platform times.
//!
//! The scheduling service reports wall-clock values in human formats
//! (`"October 18, 2026"`, `"3:00pm"`) next to an ISO timestamp with a compact
//! offset (`"2026-10-18T15:00:00+0800"`). Labels shown on the lock drop the
//! minutes and use a 12-hour clock, e.g. `3PM-4PM 18Oct`.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};

use crate::constants::SCHEDULING_QUERY_FORMAT;
use crate::errors::{PinSyncError, Result};

const CLOCK_FORMATS: &[&str] = &["%I:%M%p", "%I:%M %p", "%H:%M", "%H:%M:%S"];
const DATE_FORMATS: &[&str] = &["%B %d, %Y", "%Y-%m-%d"];

/// Parse a clock time such as `3:00pm`, `11:30 AM` or `15:00`.
///
/// # Errors
/// Returns `PinSyncError::InvalidInput` when no known layout matches.
pub fn parse_clock_time(value: &str) -> Result<NaiveTime> {
    let normalized = value.trim().to_ascii_uppercase();
    CLOCK_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(&normalized, fmt).ok())
        .ok_or_else(|| PinSyncError::InvalidInput(format!("unrecognized clock time '{value}'")))
}

/// Parse a calendar date such as `October 18, 2026` or `2026-10-18`.
///
/// # Errors
/// Returns `PinSyncError::InvalidInput` when no known layout matches.
pub fn parse_calendar_date(value: &str) -> Result<NaiveDate> {
    let trimmed = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| PinSyncError::InvalidInput(format!("unrecognized date '{value}'")))
}

/// Parse an absolute timestamp with either a compact (`+0800`) or RFC 3339
/// (`+08:00`) offset.
///
/// # Errors
/// Returns `PinSyncError::InvalidInput` for anything else.
pub fn parse_timestamp(value: &str) -> Result<DateTime<FixedOffset>> {
    let trimmed = value.trim();
    DateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%z")
        .or_else(|_| DateTime::parse_from_rfc3339(trimmed))
        .map_err(|e| PinSyncError::InvalidInput(format!("unrecognized timestamp '{value}': {e}")))
}

/// `15:30` → `3PM`
pub fn hour_label(at: NaiveDateTime) -> String {
    at.format("%-I%p").to_string()
}

/// `2026-10-08` → `08Oct`
pub fn day_month_label(date: NaiveDate) -> String {
    date.format("%d%b").to_string()
}

/// Lock display name for a nominal slot, e.g. `3PM-4PM 18Oct`.
pub fn slot_label(start: NaiveDateTime, end: NaiveDateTime) -> String {
    format!("{}-{} {}", hour_label(start), hour_label(end), day_month_label(start.date()))
}

/// Local timestamp layout used for the scheduling service `minDate`/`maxDate`.
pub fn format_query_timestamp(at: NaiveDateTime) -> String {
    at.format(SCHEDULING_QUERY_FORMAT).to_string()
}
