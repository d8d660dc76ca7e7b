//! Wire types for the Acuity Scheduling appointments API

use pinsync_domain::utils::{parse_calendar_date, parse_clock_time, parse_timestamp};
use pinsync_domain::{Appointment, PinSyncError};
use serde::{Deserialize, Serialize};

/// Appointment record as returned by `GET /appointments`.
///
/// Only the fields reconciliation needs; everything else is ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcuityAppointment {
    pub id: u64,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    pub date: String,
    pub time: String,
    pub end_time: String,
    pub datetime: String,
    pub duration: DurationField,
    #[serde(default)]
    pub notes: Option<String>,
}

/// `duration` arrives as `"30"` or `30` depending on the account.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DurationField {
    Minutes(u32),
    Text(String),
}

impl DurationField {
    fn minutes(&self) -> Result<u32, PinSyncError> {
        match self {
            Self::Minutes(m) => Ok(*m),
            Self::Text(raw) => raw
                .trim()
                .parse()
                .map_err(|_| PinSyncError::InvalidInput(format!("invalid duration '{raw}'"))),
        }
    }
}

impl TryFrom<AcuityAppointment> for Appointment {
    type Error = PinSyncError;

    fn try_from(raw: AcuityAppointment) -> Result<Self, Self::Error> {
        Ok(Appointment {
            id: raw.id,
            date: parse_calendar_date(&raw.date)?,
            start_time: parse_clock_time(&raw.time)?,
            end_time: parse_clock_time(&raw.end_time)?,
            starts_at: parse_timestamp(&raw.datetime)?,
            duration_minutes: raw.duration.minutes()?,
            first_name: raw.first_name,
            last_name: raw.last_name,
            email: raw.email,
            notes: raw.notes.unwrap_or_default(),
        })
    }
}

/// Body of `PUT /appointments/{id}?admin=true`.
#[derive(Debug, Serialize)]
pub struct NotesUpdate<'a> {
    pub notes: &'a str,
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime};
    use serde_json::json;

    use super::*;

    #[test]
    fn converts_a_full_record() {
        let raw: AcuityAppointment = serde_json::from_value(json!({
            "id": 1043,
            "firstName": "Ada",
            "lastName": "Lim",
            "email": "ada@example.com",
            "phone": "+65 8000 0000",
            "date": "October 18, 2026",
            "time": "3:00pm",
            "endTime": "3:30pm",
            "datetime": "2026-10-18T15:00:00+0800",
            "duration": "30",
            "notes": "",
            "calendarID": 77
        }))
        .unwrap();

        let appt = Appointment::try_from(raw).unwrap();
        assert_eq!(appt.id, 1043);
        assert_eq!(appt.date, NaiveDate::from_ymd_opt(2026, 10, 18).unwrap());
        assert_eq!(appt.start_time, NaiveTime::from_hms_opt(15, 0, 0).unwrap());
        assert_eq!(appt.end_time, NaiveTime::from_hms_opt(15, 30, 0).unwrap());
        assert_eq!(appt.duration_minutes, 30);
        assert!(!appt.has_notes());
    }

    #[test]
    fn numeric_duration_and_missing_notes() {
        let raw: AcuityAppointment = serde_json::from_value(json!({
            "id": 7,
            "email": "b@example.com",
            "date": "October 18, 2026",
            "time": "4:00pm",
            "endTime": "5:00pm",
            "datetime": "2026-10-18T16:00:00+0800",
            "duration": 60
        }))
        .unwrap();

        let appt = Appointment::try_from(raw).unwrap();
        assert_eq!(appt.duration_minutes, 60);
        assert_eq!(appt.notes, "");
    }

    #[test]
    fn bad_time_is_invalid_input() {
        let raw: AcuityAppointment = serde_json::from_value(json!({
            "id": 8,
            "date": "October 18, 2026",
            "time": "teatime",
            "endTime": "5:00pm",
            "datetime": "2026-10-18T16:00:00+0800",
            "duration": "60"
        }))
        .unwrap();

        assert!(matches!(Appointment::try_from(raw), Err(PinSyncError::InvalidInput(_))));
    }
}
