// --- File: crates/harmony_booking/src/session.rs ---
//! One customer's pass through the booking screen.
//!
//! [`BookingSession`] owns the selection state, the slot list on screen
//! and the dates found closed, and drives the shared fetcher.

use chrono::{NaiveDate, NaiveDateTime};
use harmony_common::{HarmonyError, UserFacing};
use harmony_config::BookingConfig;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::availability::{AvailabilityError, AvailabilityFetcher, AvailabilityKey, VisibleAvailability};
use crate::clock::Clock;
use crate::filter::{choice_availability, SlotAvailability};
use crate::models::{BookingRecord, StaffChoice, TimeRange};
use crate::selection::{FlowOrder, SelectionError, SelectionState, Step};
use crate::submission::{build_request, BookingContext, BookingSubmitter, SubmissionError};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error(transparent)]
    Selection(#[from] SelectionError),
    #[error(transparent)]
    Availability(#[from] AvailabilityError),
}

impl UserFacing for SessionError {
    fn user_message(&self) -> String {
        match self {
            SessionError::Selection(err) => err.user_message(),
            SessionError::Availability(err) => err.user_message(),
        }
    }
}

impl From<SessionError> for HarmonyError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Selection(inner) => HarmonyError::ValidationError(inner.user_message()),
            SessionError::Availability(inner) => inner.into(),
        }
    }
}

pub struct BookingSession {
    context: BookingContext,
    state: SelectionState,
    visible: VisibleAvailability,
    closed_dates: BTreeSet<NaiveDate>,
    fetcher: Arc<AvailabilityFetcher>,
    clock: Arc<dyn Clock>,
}

impl BookingSession {
    pub fn new(
        context: BookingContext,
        order: FlowOrder,
        fetcher: Arc<AvailabilityFetcher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self::with_state(context, SelectionState::new(order), fetcher, clock)
    }

    /// Applies `flow_order` and `preselect_today`. A preselected date is
    /// not fetched until [`refresh`](Self::refresh) is called.
    ///
    /// `preselect_today` only takes effect in the date-first flow.
    pub fn from_config(
        context: BookingContext,
        config: &BookingConfig,
        fetcher: Arc<AvailabilityFetcher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let order = FlowOrder::from(config.flow_order);
        let state = if config.preselect_today && order == FlowOrder::DateFirst {
            SelectionState::with_date(order, clock.today())
        } else {
            if config.preselect_today {
                warn!("preselect_today ignored: the date step is locked until staff is chosen");
            }
            SelectionState::new(order)
        };
        Self::with_state(context, state, fetcher, clock)
    }

    fn with_state(
        context: BookingContext,
        state: SelectionState,
        fetcher: Arc<AvailabilityFetcher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            context,
            state,
            visible: VisibleAvailability::new(),
            closed_dates: BTreeSet::new(),
            fetcher,
            clock,
        }
    }

    pub fn context(&self) -> &BookingContext {
        &self.context
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn visible(&self) -> &VisibleAvailability {
        &self.visible
    }

    pub fn closed_dates(&self) -> &BTreeSet<NaiveDate> {
        &self.closed_dates
    }

    pub fn is_closed(&self, date: NaiveDate) -> bool {
        self.closed_dates.contains(&date)
    }

    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    pub fn activate(&mut self, step: Step) -> Result<(), SessionError> {
        Ok(self.state.activate(step)?)
    }

    pub fn select_staff(&mut self, choice: StaffChoice) -> Result<(), SessionError> {
        self.state.select_staff(choice)?;
        if self.state.selected_date().is_none() {
            self.visible.reset();
        }
        Ok(())
    }

    /// Records the date and loads its availability.
    ///
    /// A date the API reports as closed is remembered, and the date
    /// selection is cleared again.
    pub async fn select_date(&mut self, date: NaiveDate) -> Result<(), SessionError> {
        if self.is_closed(date) {
            debug!("rejecting closed date {}", date);
            return Err(SelectionError::ClosedDate { date }.into());
        }
        self.state.select_date(date, self.clock.today())?;
        self.refresh().await
    }

    pub fn select_time_slot(&mut self, slot: TimeRange) -> Result<(), SessionError> {
        let now = self.clock.now();
        self.state
            .select_time_slot(slot, self.visible.staff(), now)?;
        Ok(())
    }

    /// Loads availability for the selected date, or empties the list when
    /// no date is selected.
    pub async fn refresh(&mut self) -> Result<(), SessionError> {
        let Some(key) =
            AvailabilityKey::from_parts(Some(self.context.service_id), self.state.selected_date())
        else {
            self.visible.reset();
            return Ok(());
        };

        self.visible.begin(key);
        let result = self.fetcher.load(key).await;
        self.visible.apply(key, &result);

        match result {
            Ok(_) => Ok(()),
            Err(AvailabilityError::BusinessClosed { date, message }) => {
                info!("{} marked closed", date);
                self.closed_dates.insert(date);
                self.state.clear_from(Step::Date);
                self.visible.reset();
                Err(AvailabilityError::BusinessClosed { date, message }.into())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Slots to show for the current staff choice, once a date and a
    /// staff choice are set and their availability has arrived.
    pub fn visible_slots(&self) -> Option<SlotAvailability> {
        let date = self.state.selected_date()?;
        let choice = self.state.staff()?;
        let key = self.visible.latest_key()?;
        if key.date != date || self.visible.is_loading() || self.visible.error().is_some() {
            return None;
        }
        Some(choice_availability(
            choice,
            self.visible.staff(),
            date,
            self.clock.now(),
        ))
    }

    /// Sends the booking. The session is consumed on success and handed
    /// back inside [`Rejected`] otherwise.
    pub async fn submit(self, submitter: &BookingSubmitter) -> Result<BookingRecord, Rejected> {
        let request = match build_request(
            &self.context,
            &self.state,
            self.visible.staff(),
            self.clock.now(),
        ) {
            Ok(request) => request,
            Err(err) => {
                debug!("submission blocked: {}", err);
                return Err(Rejected::new(self, err.into()));
            }
        };

        match submitter.submit(&self.context, &request).await {
            Ok(record) => {
                self.fetcher
                    .invalidate(AvailabilityKey::new(request.service_id, request.booking_date));
                Ok(record)
            }
            Err(err) => {
                warn!("booking for {} not saved", request.booking_date);
                Err(Rejected::new(self, err.into()))
            }
        }
    }
}

/// A submission that did not go through, with the untouched session.
pub struct Rejected {
    pub session: Box<BookingSession>,
    pub error: SubmissionError,
}

impl Rejected {
    fn new(session: BookingSession, error: SubmissionError) -> Self {
        Self {
            session: Box::new(session),
            error,
        }
    }

    pub fn into_session(self) -> BookingSession {
        *self.session
    }
}

impl fmt::Debug for Rejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rejected")
            .field("state", self.session.state())
            .field("error", &self.error)
            .finish()
    }
}

impl fmt::Display for Rejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.error, f)
    }
}

impl std::error::Error for Rejected {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

impl UserFacing for Rejected {
    fn user_message(&self) -> String {
        self.error.user_message()
    }
}
