//! Slot-level types: consecutive appointment groups, PINs and lock windows

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeDelta};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use super::appointment::Appointment;
use crate::constants::{LOCK_TIMESTAMP_FORMAT, MAX_PIN_VALUE};
use crate::errors::{PinSyncError, Result};
use crate::utils::slot_label;

/// Identity of a logical time slot.
///
/// Two groups with equal keys share one PIN and one lock job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotKey {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start.format("%Y-%m-%d %H:%M"), self.end.format("%H:%M"))
    }
}

/// Back-to-back appointments of one customer.
///
/// Members are ordered and each starts exactly where the previous one ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGroup")]
pub struct AppointmentGroup {
    members: Vec<Appointment>,
}

/// Unvalidated wire shape of [`AppointmentGroup`].
#[derive(Deserialize)]
struct RawGroup {
    members: Vec<Appointment>,
}

impl TryFrom<RawGroup> for AppointmentGroup {
    type Error = PinSyncError;

    fn try_from(raw: RawGroup) -> Result<Self> {
        Self::from_members(raw.members)
    }
}

impl AppointmentGroup {
    /// Start a group with a single appointment.
    pub fn new(first: Appointment) -> Self {
        Self { members: vec![first] }
    }

    /// Build a group from an ordered list, validating contiguity.
    ///
    /// # Errors
    /// Returns `PinSyncError::InvalidInput` for an empty list, mixed customers
    /// or a gap between members.
    pub fn from_members(members: Vec<Appointment>) -> Result<Self> {
        let mut iter = members.into_iter();
        let first = iter
            .next()
            .ok_or_else(|| PinSyncError::InvalidInput("appointment group cannot be empty".into()))?;
        let mut group = Self::new(first);
        for appt in iter {
            let id = appt.id;
            group.try_push(appt).map_err(|_| {
                PinSyncError::InvalidInput(format!(
                    "appointment {id} does not continue group starting with {}",
                    group.first().id
                ))
            })?;
        }
        Ok(group)
    }

    /// Append `appt` if it belongs to the same customer and starts exactly at
    /// the current group end. Hands the appointment back otherwise.
    pub fn try_push(&mut self, appt: Appointment) -> std::result::Result<(), Appointment> {
        let last = self.last();
        if appt.email == last.email && appt.nominal_start() == last.nominal_end() {
            self.members.push(appt);
            Ok(())
        } else {
            Err(appt)
        }
    }

    pub fn customer(&self) -> &str {
        &self.first().email
    }

    pub fn first(&self) -> &Appointment {
        &self.members[0]
    }

    fn last(&self) -> &Appointment {
        &self.members[self.members.len() - 1]
    }

    pub fn members(&self) -> &[Appointment] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Never true for a constructed group.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn total_duration_minutes(&self) -> u32 {
        self.members.iter().map(|a| a.duration_minutes).sum()
    }

    pub fn nominal_start(&self) -> NaiveDateTime {
        self.first().nominal_start()
    }

    /// Start plus the summed duration of every member.
    pub fn nominal_end(&self) -> NaiveDateTime {
        self.nominal_start() + TimeDelta::minutes(i64::from(self.total_duration_minutes()))
    }

    pub fn starts_at(&self) -> DateTime<FixedOffset> {
        self.first().starts_at
    }

    pub fn slot_key(&self) -> SlotKey {
        SlotKey { start: self.nominal_start(), end: self.nominal_end() }
    }

    pub fn appointment_ids(&self) -> Vec<u64> {
        self.members.iter().map(|a| a.id).collect()
    }
}

/// Four-digit lock PIN, `0000`..=`9999`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct PinCode(u16);

impl PinCode {
    /// # Errors
    /// Returns `PinSyncError::InvalidInput` when `value` exceeds four digits.
    pub fn new(value: u16) -> Result<Self> {
        if value > MAX_PIN_VALUE {
            return Err(PinSyncError::InvalidInput(format!("PIN {value} exceeds four digits")));
        }
        Ok(Self(value))
    }

    /// Reduce an arbitrary value into the four-digit range.
    pub fn wrapping(value: u16) -> Self {
        Self(value % (MAX_PIN_VALUE + 1))
    }

    pub fn value(self) -> u16 {
        self.0
    }
}

impl TryFrom<u16> for PinCode {
    type Error = PinSyncError;

    fn try_from(value: u16) -> Result<Self> {
        Self::new(value)
    }
}

impl From<PinCode> for u16 {
    fn from(pin: PinCode) -> Self {
        pin.0
    }
}

impl fmt::Display for PinCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.0)
    }
}

/// Buffered validity period of a PIN, expressed in the business timezone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessWindow {
    pub starts_at: DateTime<Tz>,
    pub ends_at: DateTime<Tz>,
    pub label: String,
}

impl AccessWindow {
    /// Window for a group: `buffer` before its absolute start until `buffer`
    /// after start plus total duration. The label uses the nominal times.
    pub fn for_group(group: &AppointmentGroup, buffer: TimeDelta, tz: Tz) -> Self {
        let start = group.starts_at().with_timezone(&tz);
        let total = TimeDelta::minutes(i64::from(group.total_duration_minutes()));
        Self {
            starts_at: start - buffer,
            ends_at: start + total + buffer,
            label: slot_label(group.nominal_start(), group.nominal_end()),
        }
    }

    pub fn formatted_start(&self) -> String {
        self.starts_at.format(LOCK_TIMESTAMP_FORMAT).to_string()
    }

    pub fn formatted_end(&self) -> String {
        self.ends_at.format(LOCK_TIMESTAMP_FORMAT).to_string()
    }
}

/// A create-PIN request for the lock platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinJob {
    pub slot: SlotKey,
    pub label: String,
    pub pin: PinCode,
    pub window: AccessWindow,
}

/// PIN to be written into one appointment's notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinAssignment {
    pub appointment_id: u64,
    pub pin: PinCode,
}
