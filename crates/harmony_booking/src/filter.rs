// --- File: crates/harmony_booking/src/filter.rs ---
use crate::models::{StaffChoice, StaffTimeSlot, TimeRange};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};

/// What a staff member (or "any staff") can still offer on a date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotAvailability {
    Open(Vec<TimeRange>),
    /// Slots existed but every one of them has already started today.
    NoneRemainingToday,
    /// The server returned no slots at all.
    NoneOffered,
}

impl SlotAvailability {
    pub fn slots(&self) -> &[TimeRange] {
        match self {
            SlotAvailability::Open(slots) => slots,
            _ => &[],
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, SlotAvailability::Open(_))
    }

    /// Text shown in place of the slot list, if any.
    pub fn empty_message(&self) -> Option<&'static str> {
        match self {
            SlotAvailability::Open(_) => None,
            SlotAvailability::NoneRemainingToday => Some("No further availability today."),
            SlotAvailability::NoneOffered => Some("No availability on this date."),
        }
    }
}

/// The moment a slot starts on `date`, at minute precision.
pub fn slot_start(date: NaiveDate, slot: &TimeRange) -> NaiveDateTime {
    let start = NaiveTime::from_hms_opt(slot.start_time.hour(), slot.start_time.minute(), 0)
        .unwrap_or(slot.start_time);
    date.and_time(start)
}

/// Drops slots that have already started when `selected_date` is today.
///
/// `now` is the business-local current time. A slot starting exactly at
/// `now` counts as started. Any date other than `now.date()` is returned
/// unfiltered.
pub fn filter_elapsed(
    slots: &[TimeRange],
    selected_date: NaiveDate,
    now: NaiveDateTime,
) -> Vec<TimeRange> {
    if selected_date != now.date() {
        return slots.to_vec();
    }
    slots
        .iter()
        .filter(|slot| slot_start(selected_date, slot) > now)
        .copied()
        .collect()
}

pub fn staff_availability(
    staff: &StaffTimeSlot,
    selected_date: NaiveDate,
    now: NaiveDateTime,
) -> SlotAvailability {
    if staff.slots.is_empty() {
        return SlotAvailability::NoneOffered;
    }
    let remaining = filter_elapsed(&staff.slots, selected_date, now);
    if remaining.is_empty() {
        SlotAvailability::NoneRemainingToday
    } else {
        SlotAvailability::Open(remaining)
    }
}

/// Resolves a staff choice against the fetched list.
///
/// `Specific` resolves to that member when listed. `Any` resolves to the
/// first member with at least one slot left after filtering.
pub fn resolve_staff<'a>(
    choice: StaffChoice,
    staff: &'a [StaffTimeSlot],
    selected_date: NaiveDate,
    now: NaiveDateTime,
) -> Option<&'a StaffTimeSlot> {
    match choice {
        StaffChoice::Specific(id) => staff.iter().find(|s| s.staff_id == id),
        StaffChoice::Any => staff
            .iter()
            .find(|s| staff_availability(s, selected_date, now).is_open()),
    }
}

/// The slot list to display for a staff choice.
pub fn choice_availability(
    choice: StaffChoice,
    staff: &[StaffTimeSlot],
    selected_date: NaiveDate,
    now: NaiveDateTime,
) -> SlotAvailability {
    match resolve_staff(choice, staff, selected_date, now) {
        Some(member) => staff_availability(member, selected_date, now),
        None if choice == StaffChoice::Any && staff.iter().any(|s| !s.slots.is_empty()) => {
            SlotAvailability::NoneRemainingToday
        }
        None => SlotAvailability::NoneOffered,
    }
}
