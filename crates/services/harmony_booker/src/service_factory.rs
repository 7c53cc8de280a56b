// --- File: crates/services/harmony_booker/src/service_factory.rs ---
//! Builds the booking services from the loaded configuration.
use harmony_booking::availability::AvailabilityFetcher;
use harmony_booking::clock::{Clock, SystemClock};
use harmony_booking::service::{BookingApi, HttpBookingApi};
use harmony_booking::session::BookingSession;
use harmony_booking::submission::{BookingContext, BookingSubmitter};
use harmony_common::HarmonyError;
use harmony_config::AppConfig;
use std::sync::Arc;
use tracing::info;

/// Everything a booking session needs, created once at startup and
/// shared by every session.
pub struct BookingServices {
    config: Arc<AppConfig>,
    fetcher: Arc<AvailabilityFetcher>,
    submitter: BookingSubmitter,
    clock: Arc<dyn Clock>,
}

impl BookingServices {
    pub fn new(config: Arc<AppConfig>) -> Result<Self, HarmonyError> {
        let api: Arc<dyn BookingApi> = Arc::new(HttpBookingApi::from_config(&config.api)?);
        info!("ℹ️ Booking API at {}", config.api.base_url);
        Ok(Self::with_api(config, api))
    }

    /// Same wiring over any [`BookingApi`].
    pub fn with_api(config: Arc<AppConfig>, api: Arc<dyn BookingApi>) -> Self {
        let clock = SystemClock::from_config(&config.booking);
        info!(
            "ℹ️ Business time zone {}, {:?} flow, availability cached for {}s",
            clock.time_zone(),
            config.booking.flow_order,
            config.booking.availability_ttl_secs()
        );
        Self {
            fetcher: Arc::new(AvailabilityFetcher::from_config(api.clone(), &config.booking)),
            submitter: BookingSubmitter::new(api),
            clock: Arc::new(clock),
            config,
        }
    }

    pub fn session(&self, context: BookingContext) -> BookingSession {
        BookingSession::from_config(
            context,
            &self.config.booking,
            self.fetcher.clone(),
            self.clock.clone(),
        )
    }

    pub fn submitter(&self) -> &BookingSubmitter {
        &self.submitter
    }
}
