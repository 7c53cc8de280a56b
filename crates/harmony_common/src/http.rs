// --- File: crates/harmony_common/src/http.rs ---
use reqwest::Response;
use tracing::debug;

use crate::models::ApiErrorBody;

// Include the client module
pub mod client;

/// Reads the server supplied error text from a non-success response.
///
/// Falls back to the canonical reason phrase when the body is empty or
/// not the expected JSON shape.
pub async fn error_message(response: Response) -> (u16, String) {
    let status = response.status();
    let fallback = status
        .canonical_reason()
        .unwrap_or("request failed")
        .to_string();
    let message = match response.text().await {
        Ok(text) => parse_error_body(&text).unwrap_or(fallback),
        Err(err) => {
            debug!("could not read error body: {}", err);
            fallback
        }
    };
    (status.as_u16(), message)
}

/// Extracts `message` (or `error`) from a JSON error body.
pub fn parse_error_body(text: &str) -> Option<String> {
    serde_json::from_str::<ApiErrorBody>(text)
        .ok()
        .and_then(ApiErrorBody::into_message)
}
