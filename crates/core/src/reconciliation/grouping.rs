//! Slot grouping engine - turns a flat appointment list into per-customer
//! consecutive groups aimed at the target slot
//!
//! # Algorithm
//! 1. Drop appointments whose notes are already filled (optional)
//! 2. Stable sort by nominal start
//! 3. Partition by customer email, customers in first-appearance order
//! 4. Per customer, merge back-to-back appointments (start == previous end)
//! 5. Stable re-order customers by their longest consecutive run, descending
//! 6. Keep groups whose first start matches the target slot
//!
//! The output is fully determined by the input order. Nothing here fails;
//! rejected appointments are reported in [`GroupingOutcome`].

use ahash::AHashMap as HashMap;
use pinsync_domain::{Appointment, AppointmentGroup, RunConfig, TargetWindow};
use tracing::{debug, info};

use crate::utils::redact_email;

/// Filters applied by [`SlotGroupingEngine`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupingOptions {
    /// Skip appointments that already carry notes (usually a PIN).
    pub skip_if_note_non_empty: bool,
    /// Require a group to start exactly at the slot start; otherwise any
    /// start inside `[slot_start, slot_end)` qualifies.
    pub target_window_strict: bool,
}

impl Default for GroupingOptions {
    fn default() -> Self {
        Self { skip_if_note_non_empty: true, target_window_strict: true }
    }
}

impl From<&RunConfig> for GroupingOptions {
    fn from(run: &RunConfig) -> Self {
        Self {
            skip_if_note_non_empty: run.skip_if_note_non_empty,
            target_window_strict: run.target_window_strict,
        }
    }
}

/// Result of one grouping pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupingOutcome {
    /// Groups aimed at the target slot, in processing order.
    pub groups: Vec<AppointmentGroup>,
    /// Appointments skipped because their notes were already filled.
    pub already_assigned: Vec<u64>,
    /// Groups that start outside the target slot.
    pub mismatched: Vec<AppointmentGroup>,
}

/// Per-customer bucket built during partitioning
struct CustomerGroups {
    groups: Vec<AppointmentGroup>,
}

impl CustomerGroups {
    fn longest_run(&self) -> usize {
        self.groups.iter().map(AppointmentGroup::len).max().unwrap_or(0)
    }
}

/// Groups appointments into consecutive per-customer blocks
#[derive(Debug, Clone, Default)]
pub struct SlotGroupingEngine {
    options: GroupingOptions,
}

impl SlotGroupingEngine {
    pub fn new(options: GroupingOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> GroupingOptions {
        self.options
    }

    /// Group `appointments` and keep the groups aimed at `target`.
    pub fn group(&self, appointments: Vec<Appointment>, target: &TargetWindow) -> GroupingOutcome {
        let mut outcome = GroupingOutcome::default();

        let mut pending: Vec<Appointment> = Vec::with_capacity(appointments.len());
        for appt in appointments {
            if self.options.skip_if_note_non_empty && appt.has_notes() {
                debug!(appointment_id = appt.id, "Appointment already has notes, skipping");
                outcome.already_assigned.push(appt.id);
            } else {
                pending.push(appt);
            }
        }

        // sort_by_key is stable: equal starts keep input order
        pending.sort_by_key(Appointment::nominal_start);

        let mut customers = partition_by_customer(pending);
        customers.sort_by_key(|c| std::cmp::Reverse(c.longest_run()));

        for group in customers.into_iter().flat_map(|c| c.groups) {
            if target.admits(group.nominal_start(), self.options.target_window_strict) {
                outcome.groups.push(group);
            } else {
                info!(
                    customer = %redact_email(group.customer()),
                    appointment_id = group.first().id,
                    starts = %group.nominal_start(),
                    target = %target.label(),
                    "Appointment group starts outside target slot, skipping"
                );
                outcome.mismatched.push(group);
            }
        }

        outcome
    }
}

/// Split sorted appointments per customer and merge back-to-back bookings.
fn partition_by_customer(sorted: Vec<Appointment>) -> Vec<CustomerGroups> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut customers: Vec<CustomerGroups> = Vec::new();

    for appt in sorted {
        let existing = index.get(&appt.email).copied();
        match existing {
            Some(slot) => {
                let groups = &mut customers[slot].groups;
                let rejected = match groups.last_mut() {
                    Some(current) => current.try_push(appt).err(),
                    None => Some(appt),
                };
                if let Some(appt) = rejected {
                    groups.push(AppointmentGroup::new(appt));
                }
            }
            None => {
                index.insert(appt.email.clone(), customers.len());
                customers.push(CustomerGroups { groups: vec![AppointmentGroup::new(appt)] });
            }
        }
    }

    customers
}
