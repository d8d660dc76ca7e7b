//! Appointment snapshot as reported by the scheduling service

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};

/// A single booked appointment.
///
/// Owned by the scheduling service; a run only holds a read-only snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    /// Customer identifier used for grouping.
    pub email: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    /// Absolute start, carrying the offset the service reported.
    pub starts_at: DateTime<FixedOffset>,
    pub duration_minutes: u32,
    /// Free-text notes; holds the issued PIN once reconciled.
    pub notes: String,
}

impl Appointment {
    /// Local wall-clock start of the booked slot.
    pub fn nominal_start(&self) -> NaiveDateTime {
        self.date.and_time(self.start_time)
    }

    /// Local wall-clock end of the booked slot (rolls over midnight).
    pub fn nominal_end(&self) -> NaiveDateTime {
        let end = self.date.and_time(self.end_time);
        if end <= self.nominal_start() {
            end + TimeDelta::days(1)
        } else {
            end
        }
    }

    /// Whether the notes field already carries something (usually a PIN).
    pub fn has_notes(&self) -> bool {
        !self.notes.trim().is_empty()
    }

    /// Display name for log lines.
    pub fn customer_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn appointment(start: (u32, u32), end: (u32, u32)) -> Appointment {
        let date = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        let start_time = NaiveTime::from_hms_opt(start.0, start.1, 0).unwrap();
        let offset = FixedOffset::east_opt(8 * 3600).unwrap();
        Appointment {
            id: 1,
            first_name: "Ada".into(),
            last_name: "Lim".into(),
            email: "ada@example.com".into(),
            date,
            start_time,
            end_time: NaiveTime::from_hms_opt(end.0, end.1, 0).unwrap(),
            starts_at: offset.from_local_datetime(&date.and_time(start_time)).unwrap(),
            duration_minutes: 30,
            notes: String::new(),
        }
    }

    #[test]
    fn nominal_end_same_day() {
        let appt = appointment((15, 0), (15, 30));
        assert_eq!(appt.nominal_end().time(), NaiveTime::from_hms_opt(15, 30, 0).unwrap());
        assert_eq!(appt.nominal_end().date(), appt.date);
    }

    #[test]
    fn nominal_end_rolls_past_midnight() {
        let appt = appointment((23, 30), (0, 0));
        assert_eq!(appt.nominal_end().date(), appt.date.succ_opt().unwrap());
    }

    #[test]
    fn whitespace_notes_count_as_empty() {
        let mut appt = appointment((15, 0), (15, 30));
        appt.notes = "  \n".into();
        assert!(!appt.has_notes());
        appt.notes = "0427".into();
        assert!(appt.has_notes());
    }
}
