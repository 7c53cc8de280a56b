// --- File: crates/harmony_booking/src/selection.rs ---
//! The staff / date / time selection state machine.
//!
//! One machine serves both flow orders. A step is enabled once every
//! earlier step holds a selection, and changing a selection clears every
//! selection after it. Rejected transitions leave the state untouched.

use crate::filter::{filter_elapsed, resolve_staff};
use crate::models::{StaffChoice, StaffTimeSlot, TimeRange};
use chrono::{NaiveDate, NaiveDateTime};
use harmony_common::UserFacing;
use harmony_config::BookingFlow;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    Staff,
    Date,
    Time,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FlowOrder {
    /// staff -> date -> time
    #[default]
    StaffFirst,
    /// date -> staff -> time
    DateFirst,
}

impl FlowOrder {
    pub const fn steps(self) -> [Step; 3] {
        match self {
            FlowOrder::StaffFirst => [Step::Staff, Step::Date, Step::Time],
            FlowOrder::DateFirst => [Step::Date, Step::Staff, Step::Time],
        }
    }

    pub fn first(self) -> Step {
        self.steps()[0]
    }

    pub fn position(self, step: Step) -> usize {
        self.steps()
            .iter()
            .position(|s| *s == step)
            .unwrap_or(0)
    }

    pub fn next(self, step: Step) -> Option<Step> {
        self.steps().get(self.position(step) + 1).copied()
    }

    /// Steps strictly after `step`.
    pub fn after(self, step: Step) -> impl Iterator<Item = Step> {
        let from = self.position(step) + 1;
        self.steps().into_iter().skip(from)
    }

    /// Steps strictly before `step`.
    pub fn before(self, step: Step) -> impl Iterator<Item = Step> {
        let until = self.position(step);
        self.steps().into_iter().take(until)
    }
}

impl From<BookingFlow> for FlowOrder {
    fn from(flow: BookingFlow) -> Self {
        match flow {
            BookingFlow::StaffFirst => FlowOrder::StaffFirst,
            BookingFlow::DateFirst => FlowOrder::DateFirst,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("date {date} is in the past")]
    PastDate { date: NaiveDate },
    #[error("business is closed on {date}")]
    ClosedDate { date: NaiveDate },
    #[error("step {step:?} is not available yet")]
    StepLocked { step: Step },
    #[error("no staff member selected")]
    StaffMissing,
    #[error("no date selected")]
    DateMissing,
    #[error("no staff member has availability")]
    NoStaffAvailable,
    #[error("slot {slot} is not offered")]
    SlotNotOffered { slot: TimeRange },
}

impl UserFacing for SelectionError {
    fn user_message(&self) -> String {
        match self {
            SelectionError::PastDate { .. } => "Please choose today or a later date.".to_string(),
            SelectionError::ClosedDate { .. } => {
                "The business is closed on this day. Please choose another date.".to_string()
            }
            SelectionError::StepLocked { step: Step::Date } => {
                "Please choose a staff member first.".to_string()
            }
            SelectionError::StepLocked { step: Step::Staff } => {
                "Please choose a date first.".to_string()
            }
            SelectionError::StepLocked { step: Step::Time } => {
                "Please choose a staff member and a date first.".to_string()
            }
            SelectionError::StaffMissing => "Please choose a staff member.".to_string(),
            SelectionError::DateMissing => "Please choose a date.".to_string(),
            SelectionError::NoStaffAvailable => {
                "Nobody is available on this date. Please choose another date.".to_string()
            }
            SelectionError::SlotNotOffered { .. } => {
                "This time is no longer available. Please choose another time.".to_string()
            }
        }
    }
}

/// Transient selection state of one booking screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionState {
    order: FlowOrder,
    selected_date: Option<NaiveDate>,
    staff: Option<StaffChoice>,
    time_slot: Option<TimeRange>,
    active_step: Step,
}

impl SelectionState {
    pub fn new(order: FlowOrder) -> Self {
        Self {
            order,
            selected_date: None,
            staff: None,
            time_slot: None,
            active_step: order.first(),
        }
    }

    /// Starts with `date` preselected (the "today" default of some screens).
    ///
    /// Only a flow that opens on the date step can hold a date before
    /// anything else is chosen; any other order starts empty.
    pub fn with_date(order: FlowOrder, date: NaiveDate) -> Self {
        let mut state = Self::new(order);
        if order.first() == Step::Date {
            state.selected_date = Some(date);
        }
        state
    }

    pub fn order(&self) -> FlowOrder {
        self.order
    }

    pub fn selected_date(&self) -> Option<NaiveDate> {
        self.selected_date
    }

    pub fn staff(&self) -> Option<StaffChoice> {
        self.staff
    }

    pub fn time_slot(&self) -> Option<TimeRange> {
        self.time_slot
    }

    pub fn active_step(&self) -> Step {
        self.active_step
    }

    pub fn has_selection(&self, step: Step) -> bool {
        match step {
            Step::Staff => self.staff.is_some(),
            Step::Date => self.selected_date.is_some(),
            Step::Time => self.time_slot.is_some(),
        }
    }

    pub fn is_enabled(&self, step: Step) -> bool {
        self.order.before(step).all(|s| self.has_selection(s))
    }

    /// Date, staff and time are all chosen; submission may proceed.
    pub fn is_complete(&self) -> bool {
        self.staff.is_some() && self.selected_date.is_some() && self.time_slot.is_some()
    }

    /// Tab navigation without changing any selection.
    pub fn activate(&mut self, step: Step) -> Result<(), SelectionError> {
        self.ensure_enabled(step)?;
        self.active_step = step;
        Ok(())
    }

    pub fn select_staff(&mut self, choice: StaffChoice) -> Result<(), SelectionError> {
        self.ensure_enabled(Step::Staff)?;
        if self.staff != Some(choice) {
            self.staff = Some(choice);
            self.clear_after(Step::Staff);
            debug!("staff set to {}", choice);
        }
        self.advance_from(Step::Staff);
        Ok(())
    }

    /// `today` is the business-local current date.
    pub fn select_date(&mut self, date: NaiveDate, today: NaiveDate) -> Result<(), SelectionError> {
        if date < today {
            debug!("rejecting past date {}", date);
            return Err(SelectionError::PastDate { date });
        }
        self.ensure_enabled(Step::Date)?;
        if self.selected_date != Some(date) {
            self.selected_date = Some(date);
            self.clear_after(Step::Date);
            debug!("date set to {}", date);
        }
        self.advance_from(Step::Date);
        Ok(())
    }

    /// Records a time slot from the currently fetched `availability`.
    ///
    /// An `Any` staff choice is resolved only to find the slot list to
    /// check against; the stored choice stays `Any`.
    pub fn select_time_slot(
        &mut self,
        slot: TimeRange,
        availability: &[StaffTimeSlot],
        now: NaiveDateTime,
    ) -> Result<(), SelectionError> {
        let date = self.selected_date.ok_or(SelectionError::DateMissing)?;
        let choice = self.staff.ok_or(SelectionError::StaffMissing)?;
        let member = resolve_staff(choice, availability, date, now)
            .ok_or(SelectionError::NoStaffAvailable)?;
        if !filter_elapsed(&member.slots, date, now).contains(&slot) {
            return Err(SelectionError::SlotNotOffered { slot });
        }
        self.time_slot = Some(slot);
        Ok(())
    }

    /// Clears `step` and everything after it, and shows `step`.
    pub fn clear_from(&mut self, step: Step) {
        self.clear(step);
        self.clear_after(step);
        if self.is_enabled(step) {
            self.active_step = step;
        } else {
            self.active_step = self.order.first();
        }
    }

    fn ensure_enabled(&self, step: Step) -> Result<(), SelectionError> {
        if self.is_enabled(step) {
            Ok(())
        } else {
            Err(SelectionError::StepLocked { step })
        }
    }

    fn advance_from(&mut self, step: Step) {
        if let Some(next) = self.order.next(step) {
            self.active_step = next;
        }
    }

    fn clear_after(&mut self, step: Step) {
        for later in self.order.after(step) {
            self.clear(later);
        }
    }

    fn clear(&mut self, step: Step) {
        match step {
            Step::Staff => self.staff = None,
            Step::Date => self.selected_date = None,
            Step::Time => self.time_slot = None,
        }
    }
}
