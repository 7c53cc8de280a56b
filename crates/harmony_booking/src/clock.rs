//! Wall-clock source for slot filtering and the past-date guard.
//!
//! Everything that needs "now" takes it from a [`Clock`] so the filter and
//! the state machine stay pure and testable.

use chrono::{Duration, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use harmony_config::BookingConfig;
use std::str::FromStr;
use std::sync::Mutex;
use tracing::warn;

pub trait Clock: Send + Sync {
    /// Current local time of the business.
    fn now(&self) -> NaiveDateTime;

    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// Reads the system clock in the business time zone.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    time_zone: Tz,
}

impl SystemClock {
    pub fn new(time_zone: Tz) -> Self {
        Self { time_zone }
    }

    /// Uses `booking.time_zone`; a missing or unknown zone means UTC.
    pub fn from_config(config: &BookingConfig) -> Self {
        let time_zone = match config.time_zone.as_deref() {
            None => Tz::UTC,
            Some(name) => Tz::from_str(name).unwrap_or_else(|_| {
                warn!("unknown time zone {:?}, falling back to UTC", name);
                Tz::UTC
            }),
        };
        Self::new(time_zone)
    }

    pub fn time_zone(&self) -> Tz {
        self.time_zone
    }
}

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.time_zone).naive_local()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<NaiveDateTime>,
}

impl FixedClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn set(&self, now: NaiveDateTime) {
        *self.now.lock().unwrap_or_else(|p| p.into_inner()) = now;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|p| p.into_inner());
        *now += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        *self.now.lock().unwrap_or_else(|p| p.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    #[test]
    fn test_fixed_clock_advances_across_midnight() {
        let clock = FixedClock::new(dt("2025-06-01 23:50"));
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
        clock.advance(Duration::minutes(20));
        assert_eq!(clock.now(), dt("2025-06-02 00:10"));
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2025, 6, 2).unwrap());
    }

    #[test]
    fn test_system_clock_from_config() {
        let config = BookingConfig {
            time_zone: Some("Europe/Zurich".to_string()),
            ..Default::default()
        };
        assert_eq!(SystemClock::from_config(&config).time_zone(), Tz::Europe__Zurich);

        let bad = BookingConfig {
            time_zone: Some("Mars/Olympus".to_string()),
            ..Default::default()
        };
        assert_eq!(SystemClock::from_config(&bad).time_zone(), Tz::UTC);
        assert_eq!(
            SystemClock::from_config(&BookingConfig::default()).time_zone(),
            Tz::UTC
        );
    }
}
