//! The time slot a reconciliation run is aimed at

use std::fmt;

use chrono::{DateTime, NaiveDateTime, TimeDelta, Timelike};
use chrono_tz::Tz;
use serde::Serialize;

use crate::config::RunConfig;
use crate::errors::Result;
use crate::utils::hour_label;

/// Target slot and fetch horizon of one run, in business-local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TargetWindow {
    pub slot_start: NaiveDateTime,
    pub slot_end: NaiveDateTime,
    pub lookahead_end: NaiveDateTime,
    #[serde(serialize_with = "serialize_tz")]
    pub timezone: Tz,
}

impl TargetWindow {
    /// Truncate `now` to the top of its hour, then move `offset_hours` ahead.
    ///
    /// `now` at 11:07 with a 3 hour offset and a 60 minute slot targets
    /// 14:00-15:00.
    pub fn compute(
        now: DateTime<Tz>,
        offset_hours: u32,
        slot_width_minutes: u32,
        lookahead_minutes: u32,
    ) -> Self {
        let local = now.naive_local();
        let into_hour = TimeDelta::seconds(i64::from(local.minute() * 60 + local.second()))
            + TimeDelta::nanoseconds(i64::from(local.nanosecond()));
        let slot_start = local - into_hour + TimeDelta::hours(i64::from(offset_hours));

        Self {
            slot_start,
            slot_end: slot_start + TimeDelta::minutes(i64::from(slot_width_minutes)),
            lookahead_end: slot_start + TimeDelta::minutes(i64::from(lookahead_minutes)),
            timezone: now.timezone(),
        }
    }

    /// Same as [`TargetWindow::compute`], with parameters and zone taken from
    /// the run configuration. `now` may be in any zone.
    ///
    /// # Errors
    /// Returns `PinSyncError::Config` for an unknown timezone.
    pub fn from_config<Z: chrono::TimeZone>(now: &DateTime<Z>, run: &RunConfig) -> Result<Self> {
        let tz = run.timezone()?;
        Ok(Self::compute(
            now.with_timezone(&tz),
            run.offset_hours,
            run.slot_width_minutes,
            run.lookahead_minutes,
        ))
    }

    /// Whether `start` opens the target slot (strict) or falls inside it.
    pub fn admits(&self, start: NaiveDateTime, strict: bool) -> bool {
        if strict {
            start == self.slot_start
        } else {
            start >= self.slot_start && start < self.slot_end
        }
    }

    /// Range requested from the scheduling service.
    pub fn fetch_range(&self) -> (NaiveDateTime, NaiveDateTime) {
        (self.slot_start, self.lookahead_end)
    }

    /// Hour-only label such as `3PM-4PM`.
    pub fn label(&self) -> String {
        format!("{}-{}", hour_label(self.slot_start), hour_label(self.slot_end))
    }
}

impl fmt::Display for TargetWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} to {}, lookahead until {}, {})",
            self.label(),
            self.slot_start.format("%Y-%m-%d %H:%M"),
            self.slot_end.format("%H:%M"),
            self.lookahead_end.format("%Y-%m-%d %H:%M"),
            self.timezone.name()
        )
    }
}

fn serialize_tz<S: serde::Serializer>(tz: &Tz, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(tz.name())
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};

    use super::*;

    fn singapore() -> Tz {
        "Asia/Singapore".parse().unwrap()
    }

    fn local(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap().and_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn truncates_and_offsets() {
        let now = singapore().with_ymd_and_hms(2026, 10, 18, 11, 7, 42).unwrap();
        let window = TargetWindow::compute(now, 3, 60, 180);
        assert_eq!(window.slot_start, local(14, 0));
        assert_eq!(window.slot_end, local(15, 0));
        assert_eq!(window.lookahead_end, local(17, 0));
        assert_eq!(window.label(), "2PM-3PM");
    }

    #[test]
    fn crosses_midnight() {
        let now = singapore().with_ymd_and_hms(2026, 10, 18, 22, 30, 0).unwrap();
        let window = TargetWindow::compute(now, 3, 60, 180);
        assert_eq!(window.slot_start, local(1, 0) + TimeDelta::days(1));
    }

    #[test]
    fn from_config_converts_zone() {
        let now = Utc.with_ymd_and_hms(2026, 10, 18, 3, 59, 0).unwrap();
        let window = TargetWindow::from_config(&now, &RunConfig::default()).unwrap();
        // 03:59 UTC is 11:59 in Singapore
        assert_eq!(window.slot_start, local(14, 0));
        assert_eq!(window.timezone, singapore());
    }

    #[test]
    fn admits_strict_and_loose() {
        let now = singapore().with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap();
        let window = TargetWindow::compute(now, 3, 60, 180);
        assert!(window.admits(local(15, 0), true));
        assert!(!window.admits(local(15, 30), true));
        assert!(window.admits(local(15, 30), false));
        assert!(!window.admits(local(16, 0), false));
    }
}
