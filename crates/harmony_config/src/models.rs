use serde::{Deserialize, Serialize};

/// Default freshness window for cached availability, in seconds.
pub const DEFAULT_AVAILABILITY_TTL_SECS: u64 = 300;

// --- Booking API Config ---
// The bearer token is normally the marker "secret_from_env" and gets
// replaced from API_AUTH_TOKEN at load time.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiConfig {
    pub base_url: String, // Mandatory
    pub timeout_secs: Option<u64>,
    pub auth_token: Option<String>,
}

/// Order in which the booking steps are presented.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum BookingFlow {
    #[default]
    StaffFirst,
    DateFirst,
}

// --- Booking Flow Config ---
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct BookingConfig {
    #[serde(default)]
    pub flow_order: BookingFlow,
    /// Seconds a fetched availability list stays fresh.
    pub availability_ttl_secs: Option<u64>,
    /// IANA zone the business operates in, e.g. "Europe/Zurich".
    pub time_zone: Option<String>,
    /// Start the session with today's date already selected.
    #[serde(default)]
    pub preselect_today: bool,
}

impl BookingConfig {
    pub fn availability_ttl_secs(&self) -> u64 {
        self.availability_ttl_secs
            .unwrap_or(DEFAULT_AVAILABILITY_TTL_SECS)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct LoggingConfig {
    pub level: Option<String>,
}

// --- Unified App Configuration ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    // API config is mandatory
    pub api: ApiConfig,

    #[serde(default)]
    pub booking: BookingConfig,
    #[serde(default)]
    pub logging: Option<LoggingConfig>,
}
