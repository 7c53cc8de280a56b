// --- File: crates/harmony_booking/src/submission.rs ---
use chrono::{NaiveDate, NaiveDateTime};
use harmony_common::{BookingId, BusinessId, HarmonyError, ServiceId, StaffId, UserFacing};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::filter::{filter_elapsed, resolve_staff};
use crate::models::{BookingRecord, BookingRequest, StaffChoice, StaffTimeSlot, TimeRange};
use crate::selection::SelectionState;
use crate::service::{BookingApi, BookingServiceError};

/// Identifiers supplied by the page hosting the booking flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingContext {
    pub business_id: BusinessId,
    pub service_id: ServiceId,
    /// Set when an existing booking is being rescheduled.
    pub booking_id: Option<BookingId>,
}

impl BookingContext {
    pub fn new(business_id: BusinessId, service_id: ServiceId) -> Self {
        Self {
            business_id,
            service_id,
            booking_id: None,
        }
    }

    /// Validates raw page ids; zero means missing.
    pub fn from_raw(business_id: u64, service_id: u64) -> Result<Self, ValidationError> {
        let business_id = BusinessId::new(business_id).ok_or(ValidationError::MissingBusiness)?;
        let service_id = ServiceId::new(service_id).ok_or(ValidationError::MissingService)?;
        Ok(Self::new(business_id, service_id))
    }

    pub fn rescheduling(mut self, booking_id: BookingId) -> Self {
        self.booking_id = Some(booking_id);
        self
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("business id is missing")]
    MissingBusiness,
    #[error("service id is missing")]
    MissingService,
    #[error("no date selected")]
    MissingDate,
    #[error("no staff member selected")]
    MissingStaff,
    #[error("no time slot selected")]
    MissingTimeSlot,
    #[error("no staff member has availability on {date}")]
    NoStaffAvailable { date: NaiveDate },
    #[error("staff {staff_id} is not available on {date}")]
    StaffUnavailable { staff_id: StaffId, date: NaiveDate },
    #[error("slot {slot} on {date} is no longer available")]
    SlotUnavailable { slot: TimeRange, date: NaiveDate },
}

impl UserFacing for ValidationError {
    fn user_message(&self) -> String {
        match self {
            ValidationError::MissingBusiness | ValidationError::MissingService => {
                "This service cannot be booked right now.".to_string()
            }
            ValidationError::MissingDate => "Please choose a date.".to_string(),
            ValidationError::MissingStaff => "Please choose a staff member.".to_string(),
            ValidationError::MissingTimeSlot => "Please choose a time.".to_string(),
            ValidationError::NoStaffAvailable { .. } => {
                "Nobody is available on this date. Please choose another date.".to_string()
            }
            ValidationError::StaffUnavailable { .. } => {
                "This staff member is not available on this date.".to_string()
            }
            ValidationError::SlotUnavailable { .. } => {
                "This time is no longer available. Please choose another time.".to_string()
            }
        }
    }
}

impl From<ValidationError> for HarmonyError {
    fn from(err: ValidationError) -> Self {
        HarmonyError::ValidationError(err.user_message())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    #[error("booking is incomplete: {0}")]
    Invalid(#[from] ValidationError),
    #[error("booking request failed: {0}")]
    Failed(#[from] BookingServiceError),
}

impl UserFacing for SubmissionError {
    fn user_message(&self) -> String {
        match self {
            SubmissionError::Invalid(err) => err.user_message(),
            SubmissionError::Failed(err) => match err.server_message() {
                Some(message) => message.to_string(),
                None => "Your booking could not be saved. Please try again.".to_string(),
            },
        }
    }
}

impl From<SubmissionError> for HarmonyError {
    fn from(err: SubmissionError) -> Self {
        match err {
            SubmissionError::Invalid(inner) => inner.into(),
            SubmissionError::Failed(inner) => inner.into(),
        }
    }
}

/// Validates the selection and assembles the outbound request.
///
/// `availability` is the fetched list for the selected date. An `Any`
/// staff choice is resolved here, to the first member with a slot left.
pub fn build_request(
    context: &BookingContext,
    state: &SelectionState,
    availability: &[StaffTimeSlot],
    now: NaiveDateTime,
) -> Result<BookingRequest, ValidationError> {
    let date = state.selected_date().ok_or(ValidationError::MissingDate)?;
    let choice = state.staff().ok_or(ValidationError::MissingStaff)?;
    let slot = state.time_slot().ok_or(ValidationError::MissingTimeSlot)?;

    let member = resolve_staff(choice, availability, date, now).ok_or(match choice {
        StaffChoice::Any => ValidationError::NoStaffAvailable { date },
        StaffChoice::Specific(staff_id) => ValidationError::StaffUnavailable { staff_id, date },
    })?;

    if !filter_elapsed(&member.slots, date, now).contains(&slot) {
        return Err(ValidationError::SlotUnavailable { slot, date });
    }

    Ok(BookingRequest {
        business_id: context.business_id,
        service_id: context.service_id,
        staff_id: member.staff_id,
        booking_date: date,
        start_time: slot.start_time,
        end_time: slot.end_time,
    })
}

/// Sends exactly one create or update call per submission.
#[derive(Clone)]
pub struct BookingSubmitter {
    api: Arc<dyn BookingApi>,
}

impl BookingSubmitter {
    pub fn new(api: Arc<dyn BookingApi>) -> Self {
        Self { api }
    }

    pub async fn submit(
        &self,
        context: &BookingContext,
        request: &BookingRequest,
    ) -> Result<BookingRecord, BookingServiceError> {
        let result = match context.booking_id {
            Some(booking_id) => self.api.update_booking(booking_id, request).await,
            None => self.api.create_booking(request).await,
        };
        match &result {
            Ok(record) => info!(
                "booking {} saved for staff {} on {} {}",
                record.id,
                request.staff_id,
                request.booking_date,
                request.time_range()
            ),
            Err(err) => warn!("booking submission failed: {}", err),
        }
        result
    }
}
