// --- File: crates/harmony_booking/src/service.rs ---
//! Access to the remote booking API.
//!
//! [`BookingApi`] is the seam between the booking flow and the network.
//! [`HttpBookingApi`] talks to the real service; [`memory::InMemoryBookingApi`]
//! serves canned data for tests and offline runs.

use async_trait::async_trait;
use chrono::NaiveDate;
use harmony_common::http::error_message;
use harmony_common::{client_for_timeout, ApiPayload, BookingId, HarmonyError, ServiceId};
use harmony_config::ApiConfig;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, info};

use crate::models::{BookingRecord, BookingRequest, StaffTimeSlot, DATE_FORMAT};

#[cfg(test)]
use mockall::automock;

/// Message the API sends when the business does not open on a date.
pub const CLOSED_DAY_MESSAGE: &str = "Business is not operating on this day";

pub const AVAILABILITY_PATH: &str = "/availability";
pub const BOOKINGS_PATH: &str = "/bookings";

/// Errors that can occur when talking to the booking API.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BookingServiceError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("booking API returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error("could not decode response: {0}")]
    Decode(String),
    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl BookingServiceError {
    /// The text the server supplied, if the request got that far.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            BookingServiceError::Api { message, .. } => Some(message),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for BookingServiceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            BookingServiceError::Decode(err.to_string())
        } else {
            BookingServiceError::Transport(err.to_string())
        }
    }
}

impl From<BookingServiceError> for HarmonyError {
    fn from(err: BookingServiceError) -> Self {
        match err {
            BookingServiceError::Transport(message) => HarmonyError::HttpError(message),
            BookingServiceError::Api { status, message } => {
                HarmonyError::from_status("booking", status, message)
            }
            BookingServiceError::Decode(message) => HarmonyError::ParseError(message),
            BookingServiceError::Config(message) => HarmonyError::ConfigError(message),
        }
    }
}

/// Operations the booking flow needs from the remote API.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait BookingApi: Send + Sync {
    /// Open slots per staff member for one service on one date.
    async fn fetch_availability(
        &self,
        service_id: ServiceId,
        date: NaiveDate,
    ) -> Result<Vec<StaffTimeSlot>, BookingServiceError>;

    async fn create_booking(
        &self,
        request: &BookingRequest,
    ) -> Result<BookingRecord, BookingServiceError>;

    async fn update_booking(
        &self,
        booking_id: BookingId,
        request: &BookingRequest,
    ) -> Result<BookingRecord, BookingServiceError>;
}

/// [`BookingApi`] over HTTP with `reqwest`.
#[derive(Clone)]
pub struct HttpBookingApi {
    client: Client,
    base_url: String,
    auth_token: Option<String>,
}

impl HttpBookingApi {
    pub fn new(client: Client, base_url: impl Into<String>, auth_token: Option<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            auth_token: auth_token.filter(|t| !t.is_empty()),
        }
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self, BookingServiceError> {
        if config.base_url.trim().is_empty() {
            return Err(BookingServiceError::Config("api.base_url is empty".to_string()));
        }
        let client = client_for_timeout(config.timeout_secs)
            .map_err(|err| BookingServiceError::Config(err.to_string()))?;
        Ok(Self::new(
            client,
            config.base_url.trim(),
            config.auth_token.clone(),
        ))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.auth_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn read<T: DeserializeOwned>(response: Response) -> Result<T, BookingServiceError> {
        if !response.status().is_success() {
            let (status, message) = error_message(response).await;
            debug!("booking API error {}: {}", status, message);
            return Err(BookingServiceError::Api { status, message });
        }
        let payload: ApiPayload<T> = response.json().await?;
        Ok(payload.into_inner())
    }
}

#[async_trait]
impl BookingApi for HttpBookingApi {
    async fn fetch_availability(
        &self,
        service_id: ServiceId,
        date: NaiveDate,
    ) -> Result<Vec<StaffTimeSlot>, BookingServiceError> {
        let date = date.format(DATE_FORMAT).to_string();
        debug!("GET availability service={} date={}", service_id, date);
        let request = self
            .client
            .get(self.url(AVAILABILITY_PATH))
            .query(&[("serviceId", service_id.to_string()), ("date", date)]);
        let response = self.authorize(request).send().await?;
        Self::read(response).await
    }

    async fn create_booking(
        &self,
        request: &BookingRequest,
    ) -> Result<BookingRecord, BookingServiceError> {
        info!(
            "POST booking service={} staff={} {} {}",
            request.service_id,
            request.staff_id,
            request.booking_date,
            request.time_range()
        );
        let builder = self.client.post(self.url(BOOKINGS_PATH)).json(request);
        let response = self.authorize(builder).send().await?;
        Self::read(response).await
    }

    async fn update_booking(
        &self,
        booking_id: BookingId,
        request: &BookingRequest,
    ) -> Result<BookingRecord, BookingServiceError> {
        info!("PUT booking {}", booking_id);
        let builder = self
            .client
            .put(self.url(&format!("{}/{}", BOOKINGS_PATH, booking_id)))
            .json(request);
        let response = self.authorize(builder).send().await?;
        Self::read(response).await
    }
}

pub mod memory {
    //! In-memory booking API.
    use super::*;
    use crate::models::BookingStatus;
    use std::collections::{HashMap, HashSet};
    use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Canned availability plus a record of every submitted booking.
    #[derive(Default)]
    pub struct InMemoryBookingApi {
        availability: Mutex<HashMap<(ServiceId, NaiveDate), Vec<StaffTimeSlot>>>,
        closed: Mutex<HashSet<NaiveDate>>,
        bookings: Mutex<Vec<(BookingId, BookingRequest)>>,
        fail_next: Mutex<Option<BookingServiceError>>,
        fetches: AtomicUsize,
        next_id: AtomicU64,
    }

    impl InMemoryBookingApi {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn set_availability(
            &self,
            service_id: ServiceId,
            date: NaiveDate,
            staff: Vec<StaffTimeSlot>,
        ) {
            lock(&self.availability).insert((service_id, date), staff);
        }

        /// Availability requests for `date` answer with [`CLOSED_DAY_MESSAGE`].
        pub fn close_date(&self, date: NaiveDate) {
            lock(&self.closed).insert(date);
        }

        /// The next create/update call fails with `error`.
        pub fn fail_next_booking(&self, error: BookingServiceError) {
            *lock(&self.fail_next) = Some(error);
        }

        pub fn fetch_count(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }

        pub fn bookings(&self) -> Vec<(BookingId, BookingRequest)> {
            lock(&self.bookings).clone()
        }

        fn record(id: BookingId) -> BookingRecord {
            let mut extra = serde_json::Map::new();
            extra.insert(
                "reference".to_string(),
                serde_json::Value::String(uuid::Uuid::new_v4().to_string()),
            );
            BookingRecord {
                id,
                status: BookingStatus::Confirmed,
                extra,
            }
        }
    }

    fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
        mutex.lock().unwrap_or_else(|p| p.into_inner())
    }

    #[async_trait]
    impl BookingApi for InMemoryBookingApi {
        async fn fetch_availability(
            &self,
            service_id: ServiceId,
            date: NaiveDate,
        ) -> Result<Vec<StaffTimeSlot>, BookingServiceError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if lock(&self.closed).contains(&date) {
                return Err(BookingServiceError::Api {
                    status: 400,
                    message: CLOSED_DAY_MESSAGE.to_string(),
                });
            }
            Ok(lock(&self.availability)
                .get(&(service_id, date))
                .cloned()
                .unwrap_or_default())
        }

        async fn create_booking(
            &self,
            request: &BookingRequest,
        ) -> Result<BookingRecord, BookingServiceError> {
            if let Some(error) = lock(&self.fail_next).take() {
                return Err(error);
            }
            let id = BookingId(self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
            lock(&self.bookings).push((id, request.clone()));
            Ok(Self::record(id))
        }

        async fn update_booking(
            &self,
            booking_id: BookingId,
            request: &BookingRequest,
        ) -> Result<BookingRecord, BookingServiceError> {
            if let Some(error) = lock(&self.fail_next).take() {
                return Err(error);
            }
            let mut bookings = lock(&self.bookings);
            match bookings.iter_mut().find(|(id, _)| *id == booking_id) {
                Some(entry) => {
                    entry.1 = request.clone();
                    Ok(Self::record(booking_id))
                }
                None => Err(BookingServiceError::Api {
                    status: 404,
                    message: "Booking not found".to_string(),
                }),
            }
        }
    }
}
