use chrono::{FixedOffset, NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;
use pinsync_domain::{Appointment, RunConfig};

/// Business timezone used by every fixture.
pub fn singapore() -> Tz {
    "Asia/Singapore".parse().unwrap()
}

/// Appointment on 2026-10-18 starting at `hh:mm` Singapore time.
pub fn appointment(id: u64, email: &str, start: (u32, u32), minutes: u32) -> Appointment {
    appointment_on(NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(), id, email, start, minutes)
}

pub fn appointment_on(
    date: NaiveDate,
    id: u64,
    email: &str,
    start: (u32, u32),
    minutes: u32,
) -> Appointment {
    let start_time = NaiveTime::from_hms_opt(start.0, start.1, 0).unwrap();
    let end = date.and_time(start_time) + TimeDelta::minutes(i64::from(minutes));
    let offset = FixedOffset::east_opt(8 * 3600).unwrap();
    Appointment {
        id,
        first_name: "Guest".into(),
        last_name: format!("{id}"),
        email: email.into(),
        date,
        start_time,
        end_time: end.time(),
        starts_at: offset.from_local_datetime(&date.and_time(start_time)).unwrap(),
        duration_minutes: minutes,
        notes: String::new(),
    }
}

pub fn with_notes(mut appointment: Appointment, notes: &str) -> Appointment {
    appointment.notes = notes.into();
    appointment
}

/// `now` such that the default 3 hour offset targets `hour`:00 local.
pub fn now_targeting(hour: u32) -> chrono::DateTime<Utc> {
    singapore().with_ymd_and_hms(2026, 10, 18, hour - 3, 12, 0).unwrap().with_timezone(&Utc)
}

pub fn run_config() -> RunConfig {
    RunConfig::default()
}
