// --- File: crates/harmony_booking/src/lib.rs ---
// Declare modules within this crate
pub mod availability;
pub mod clock;
pub mod filter;
#[cfg(test)]
mod filter_proptest;
pub mod models;
pub mod selection;
#[cfg(test)]
mod selection_proptest;
#[cfg(test)]
mod selection_test;
pub mod service;
pub mod session;
pub mod submission;

pub use availability::{AvailabilityError, AvailabilityFetcher, AvailabilityKey, FetchOutcome};
pub use clock::{Clock, FixedClock, SystemClock};
pub use filter::{filter_elapsed, SlotAvailability};
pub use models::{BookingRecord, BookingRequest, StaffChoice, StaffTimeSlot, TimeRange};
pub use selection::{FlowOrder, SelectionError, SelectionState, Step};
pub use service::{BookingApi, BookingServiceError, HttpBookingApi};
pub use session::{BookingSession, Rejected, SessionError};
pub use submission::{BookingContext, BookingSubmitter, SubmissionError, ValidationError};
