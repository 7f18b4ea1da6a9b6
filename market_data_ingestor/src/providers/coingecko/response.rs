use serde::Deserialize;

use crate::models::bar::OhlcTuple;

/// Successful body of `/coins/{id}/ohlc`: an array of 5-element arrays.
pub type OhlcResponse = Vec<OhlcTuple>;

/// Error bodies come in two shapes depending on the failure.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
pub enum ErrorBody {
    /// `{"error": "coin not found"}`
    Simple { error: String },
    /// `{"status": {"error_code": 429, "error_message": "..."}}`
    Status { status: ErrorStatus },
}

#[derive(Deserialize, Debug)]
pub struct ErrorStatus {
    pub error_message: String,
}

/// Extracts the human-readable message from an error body, falling back to
/// the raw text.
pub fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody::Simple { error }) => error,
        Ok(ErrorBody::Status { status }) => status.error_message,
        Err(_) if body.trim().is_empty() => "Unknown API error".to_string(),
        Err(_) => body.trim().to_string(),
    }
}
