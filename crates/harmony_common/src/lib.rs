// --- File: crates/harmony_common/src/lib.rs ---

// Declare modules within this crate
pub mod error;     // Error handling
pub mod http;      // HTTP utilities
pub mod logging;   // Logging utilities
pub mod models;    // Shared identifiers and wire envelopes

// Re-export error types and utilities for easier access
pub use error::{
    HarmonyError,
    UserFacing,
    config_error,
    validation_error,
};

// Re-export HTTP utilities for easier access
pub use http::{
    error_message,
    client::{HTTP_CLIENT, create_client, client_for_timeout},
};

pub use models::{ApiPayload, BookingId, BusinessId, ServiceId, StaffId};
