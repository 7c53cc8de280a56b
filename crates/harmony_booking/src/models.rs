// --- File: crates/harmony_booking/src/models.rs ---
use chrono::{NaiveDate, NaiveTime, ParseError};
use harmony_common::{BookingId, BusinessId, ServiceId, StaffId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Calendar dates on the wire, e.g. `2025-06-01`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Times of day on the wire, e.g. `09:30:00`.
pub const TIME_FORMAT: &str = "%H:%M:%S";
const SHORT_TIME_FORMAT: &str = "%H:%M";

/// Parses a `yyyy-MM-dd` date.
pub fn parse_date(value: &str) -> Result<NaiveDate, ParseError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
}

/// Parses `HH:MM:SS`, falling back to `HH:MM`.
pub fn parse_time(value: &str) -> Result<NaiveTime, ParseError> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(value, SHORT_TIME_FORMAT))
}

/// Serde adapter for wall-clock times.
pub mod wall_clock {
    use super::{parse_time, TIME_FORMAT};
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&time.format(TIME_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_time(&raw).map_err(|err| {
            serde::de::Error::custom(format!("invalid time of day {raw:?}: {err}"))
        })
    }
}

/// A candidate appointment window on some date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRange {
    #[serde(with = "wall_clock")]
    pub start_time: NaiveTime,
    #[serde(with = "wall_clock")]
    pub end_time: NaiveTime,
}

impl TimeRange {
    pub fn new(start_time: NaiveTime, end_time: NaiveTime) -> Self {
        Self {
            start_time,
            end_time,
        }
    }

    /// Builds a range from two `HH:MM[:SS]` strings.
    pub fn parse(start: &str, end: &str) -> Result<Self, ParseError> {
        Ok(Self::new(parse_time(start)?, parse_time(end)?))
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}",
            self.start_time.format(SHORT_TIME_FORMAT),
            self.end_time.format(SHORT_TIME_FORMAT)
        )
    }
}

/// One staff member's offering for a date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffTimeSlot {
    pub staff_id: StaffId,
    pub staff_name: String,
    #[serde(default)]
    pub slots: Vec<TimeRange>,
}

/// Which staff member the customer wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StaffChoice {
    /// Whoever is free; resolved at submission time.
    Any,
    Specific(StaffId),
}

impl From<StaffId> for StaffChoice {
    fn from(id: StaffId) -> Self {
        StaffChoice::Specific(id)
    }
}

impl fmt::Display for StaffChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StaffChoice::Any => write!(f, "any staff"),
            StaffChoice::Specific(id) => write!(f, "staff {}", id),
        }
    }
}

/// Outbound create/update payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub business_id: BusinessId,
    pub service_id: ServiceId,
    pub staff_id: StaffId,
    pub booking_date: NaiveDate,
    #[serde(with = "wall_clock")]
    pub start_time: NaiveTime,
    #[serde(with = "wall_clock")]
    pub end_time: NaiveTime,
}

impl BookingRequest {
    pub fn time_range(&self) -> TimeRange {
        TimeRange::new(self.start_time, self.end_time)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
    Completed,
    #[serde(other)]
    Other,
}

/// The booking as returned by the API. Only `id` and `status` are
/// interpreted; everything else is passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRecord {
    pub id: BookingId,
    #[serde(default)]
    pub status: BookingStatus,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
