// --- File: crates/harmony_booking/src/availability.rs ---
//! Availability fetching with a short-lived cache, and the visible slot
//! list that only accepts the response to the latest request.

use chrono::NaiveDate;
use harmony_common::{HarmonyError, ServiceId, UserFacing};
use harmony_config::BookingConfig;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::models::{parse_date, StaffTimeSlot};
use crate::service::{BookingApi, BookingServiceError};

/// Lower-cased fragment identifying a "closed on this day" answer.
const CLOSED_DAY_MARKER: &str = "not operating";

/// Cache and request identity: one service on one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AvailabilityKey {
    pub service_id: ServiceId,
    pub date: NaiveDate,
}

impl AvailabilityKey {
    pub fn new(service_id: ServiceId, date: NaiveDate) -> Self {
        Self { service_id, date }
    }

    /// `None` when either part is missing; nothing should be fetched then.
    pub fn from_parts(service_id: Option<ServiceId>, date: Option<NaiveDate>) -> Option<Self> {
        Some(Self::new(service_id?, date?))
    }

    /// Raw form as received from a page: zero ids and unparsable dates
    /// count as missing.
    pub fn from_raw(service_id: u64, date: &str) -> Option<Self> {
        Self::from_parts(ServiceId::new(service_id), parse_date(date).ok())
    }
}

impl fmt::Display for AvailabilityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "service {} on {}", self.service_id, self.date)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AvailabilityError {
    #[error("business is not operating on {date}: {message}")]
    BusinessClosed { date: NaiveDate, message: String },
    #[error("availability request failed: {0}")]
    Unavailable(#[source] BookingServiceError),
}

impl AvailabilityError {
    fn classify(key: AvailabilityKey, err: BookingServiceError) -> Self {
        match err.server_message() {
            Some(message) if message.to_lowercase().contains(CLOSED_DAY_MARKER) => {
                AvailabilityError::BusinessClosed {
                    date: key.date,
                    message: message.to_string(),
                }
            }
            _ => AvailabilityError::Unavailable(err),
        }
    }
}

impl UserFacing for AvailabilityError {
    fn user_message(&self) -> String {
        match self {
            AvailabilityError::BusinessClosed { .. } => {
                "The business is closed on this day. Please choose another date.".to_string()
            }
            AvailabilityError::Unavailable(_) => {
                "Could not load availability. Please try again.".to_string()
            }
        }
    }
}

impl From<AvailabilityError> for HarmonyError {
    fn from(err: AvailabilityError) -> Self {
        match err {
            AvailabilityError::BusinessClosed { message, .. } => {
                HarmonyError::ValidationError(message)
            }
            AvailabilityError::Unavailable(inner) => inner.into(),
        }
    }
}

/// A fetched staff list together with the key it answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Availability {
    pub key: AvailabilityKey,
    pub staff: Arc<Vec<StaffTimeSlot>>,
    pub from_cache: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Service id or date missing; no request was made.
    Skipped,
    Loaded(Availability),
}

struct CacheEntry {
    fetched_at: Instant,
    staff: Arc<Vec<StaffTimeSlot>>,
}

/// Fetches availability and caches successful answers per key.
pub struct AvailabilityFetcher {
    api: Arc<dyn BookingApi>,
    ttl: Duration,
    cache: Mutex<HashMap<AvailabilityKey, CacheEntry>>,
}

impl AvailabilityFetcher {
    pub fn new(api: Arc<dyn BookingApi>, ttl: Duration) -> Self {
        Self {
            api,
            ttl,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_config(api: Arc<dyn BookingApi>, config: &BookingConfig) -> Self {
        Self::new(api, Duration::from_secs(config.availability_ttl_secs()))
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Number of entries held, expired ones included until the next insert.
    pub fn cached_len(&self) -> usize {
        self.lock_cache().len()
    }

    /// Fetches when both parts are present, otherwise skips.
    pub async fn fetch(
        &self,
        service_id: Option<ServiceId>,
        date: Option<NaiveDate>,
    ) -> Result<FetchOutcome, AvailabilityError> {
        match AvailabilityKey::from_parts(service_id, date) {
            Some(key) => self.load(key).await.map(FetchOutcome::Loaded),
            None => {
                debug!("availability fetch skipped: service or date missing");
                Ok(FetchOutcome::Skipped)
            }
        }
    }

    /// [`fetch`](Self::fetch) for raw page input (`0` and bad dates skip).
    pub async fn fetch_str(
        &self,
        service_id: u64,
        date: &str,
    ) -> Result<FetchOutcome, AvailabilityError> {
        match AvailabilityKey::from_raw(service_id, date) {
            Some(key) => self.load(key).await.map(FetchOutcome::Loaded),
            None => {
                debug!("availability fetch skipped: service={} date={:?}", service_id, date);
                Ok(FetchOutcome::Skipped)
            }
        }
    }

    /// Returns the cached list while fresh, otherwise asks the API.
    pub async fn load(&self, key: AvailabilityKey) -> Result<Availability, AvailabilityError> {
        if let Some(staff) = self.cached(key) {
            debug!("availability cache hit for {}", key);
            return Ok(Availability {
                key,
                staff,
                from_cache: true,
            });
        }

        debug!("availability cache miss for {}", key);
        let staff = self
            .api
            .fetch_availability(key.service_id, key.date)
            .await
            .map_err(|err| {
                let err = AvailabilityError::classify(key, err);
                warn!("availability for {} failed: {}", key, err);
                err
            })?;

        info!("loaded {} staff entries for {}", staff.len(), key);
        let staff = Arc::new(staff);
        let mut cache = self.lock_cache();
        cache.retain(|_, entry| entry.fetched_at.elapsed() < self.ttl);
        cache.insert(
            key,
            CacheEntry {
                fetched_at: Instant::now(),
                staff: staff.clone(),
            },
        );
        drop(cache);
        Ok(Availability {
            key,
            staff,
            from_cache: false,
        })
    }

    pub fn invalidate(&self, key: AvailabilityKey) {
        self.lock_cache().remove(&key);
    }

    pub fn clear(&self) {
        self.lock_cache().clear();
    }

    fn cached(&self, key: AvailabilityKey) -> Option<Arc<Vec<StaffTimeSlot>>> {
        let mut cache = self.lock_cache();
        match cache.get(&key) {
            Some(entry) if entry.fetched_at.elapsed() < self.ttl => Some(entry.staff.clone()),
            Some(_) => {
                cache.remove(&key);
                None
            }
            None => None,
        }
    }

    fn lock_cache(&self) -> MutexGuard<'_, HashMap<AvailabilityKey, CacheEntry>> {
        self.cache.lock().unwrap_or_else(|p| p.into_inner())
    }
}

/// The slot list currently on screen.
///
/// Requests may resolve out of order; a response is applied only when it
/// answers the most recently issued key.
#[derive(Debug, Clone, Default)]
pub struct VisibleAvailability {
    latest: Option<AvailabilityKey>,
    loading: bool,
    current: Option<Availability>,
    error: Option<String>,
}

impl VisibleAvailability {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `key` as the latest request and shows the loading state.
    pub fn begin(&mut self, key: AvailabilityKey) {
        self.latest = Some(key);
        self.loading = true;
        self.error = None;
    }

    /// Applies a response. Returns `false` when it was superseded.
    pub fn apply(
        &mut self,
        key: AvailabilityKey,
        result: &Result<Availability, AvailabilityError>,
    ) -> bool {
        if self.latest != Some(key) {
            debug!("discarding stale availability for {}", key);
            return false;
        }
        self.loading = false;
        match result {
            Ok(availability) => {
                self.current = Some(availability.clone());
                self.error = None;
            }
            Err(err) => {
                self.current = None;
                self.error = Some(err.user_message());
            }
        }
        true
    }

    /// Nothing requested: empty list, not loading.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn latest_key(&self) -> Option<AvailabilityKey> {
        self.latest
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Staff list answering the latest request; empty while loading or
    /// after a failure.
    pub fn staff(&self) -> &[StaffTimeSlot] {
        match &self.current {
            Some(availability) if Some(availability.key) == self.latest && !self.loading => {
                availability.staff.as_slice()
            }
            _ => &[],
        }
    }
}
