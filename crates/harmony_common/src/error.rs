// --- File: crates/harmony_common/src/error.rs ---
use std::fmt;
use thiserror::Error;

/// The base error type shared by all Harmony crates.
///
/// Each crate keeps its own precise error enum and converts into this one
/// at the application boundary with `From<SpecificError> for HarmonyError`.
#[derive(Error, Debug)]
pub enum HarmonyError {
    /// The HTTP request could not be completed
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// A response or input could not be parsed
    #[error("Failed to parse data: {0}")]
    ParseError(String),

    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Input rejected before anything was sent
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// The remote API answered with an error
    #[error("External service error: {service_name} - {message}")]
    ExternalServiceError {
        service_name: String,
        message: String,
    },

    #[error("Conflict: {0}")]
    ConflictError(String),

    #[error("Not found: {0}")]
    NotFoundError(String),

    #[error("Timeout: {0}")]
    TimeoutError(String),

    #[error("Rate limited: {0}")]
    RateLimitError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Errors that can be shown to an end user.
///
/// `Display` is for logs; `user_message` is the short sentence a booking
/// screen would show inline or in a toast.
pub trait UserFacing {
    fn user_message(&self) -> String;
}

impl HarmonyError {
    /// Maps an HTTP status returned by a remote API to an error variant.
    pub fn from_status(service_name: &str, status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            404 => HarmonyError::NotFoundError(message),
            408 | 504 => HarmonyError::TimeoutError(message),
            409 => HarmonyError::ConflictError(message),
            429 => HarmonyError::RateLimitError(message),
            400 | 422 => HarmonyError::ValidationError(message),
            _ => HarmonyError::ExternalServiceError {
                service_name: service_name.to_string(),
                message,
            },
        }
    }

    /// Whether repeating the same action may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            HarmonyError::HttpError(_)
                | HarmonyError::ExternalServiceError { .. }
                | HarmonyError::TimeoutError(_)
                | HarmonyError::RateLimitError(_)
        )
    }
}

impl UserFacing for HarmonyError {
    fn user_message(&self) -> String {
        match self {
            HarmonyError::HttpError(_) | HarmonyError::TimeoutError(_) => {
                "We could not reach the booking service. Please try again.".to_string()
            }
            HarmonyError::RateLimitError(_) => {
                "Too many requests. Please wait a moment and try again.".to_string()
            }
            HarmonyError::ValidationError(message)
            | HarmonyError::ConflictError(message)
            | HarmonyError::NotFoundError(message) => message.clone(),
            HarmonyError::ExternalServiceError { message, .. } => message.clone(),
            HarmonyError::ParseError(_)
            | HarmonyError::ConfigError(_)
            | HarmonyError::InternalError(_) => "Something went wrong.".to_string(),
        }
    }
}

impl From<reqwest::Error> for HarmonyError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            HarmonyError::TimeoutError(err.to_string())
        } else if err.is_decode() {
            HarmonyError::ParseError(err.to_string())
        } else {
            HarmonyError::HttpError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for HarmonyError {
    fn from(err: serde_json::Error) -> Self {
        HarmonyError::ParseError(err.to_string())
    }
}

impl From<std::io::Error> for HarmonyError {
    fn from(err: std::io::Error) -> Self {
        HarmonyError::InternalError(err.to_string())
    }
}

pub fn config_error<T: fmt::Display>(message: T) -> HarmonyError {
    HarmonyError::ConfigError(message.to_string())
}

pub fn validation_error<T: fmt::Display>(message: T) -> HarmonyError {
    HarmonyError::ValidationError(message.to_string())
}
