use serde::Deserialize;
use thiserror::Error;

/// Error body returned by CoinGecko, e.g.
/// `{"status": {"error_code": 429, "error_message": "..."}}` or `{"error": "..."}`
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    pub status: Option<ErrorStatus>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorStatus {
    pub error_code: Option<i32>,
    pub error_message: Option<String>,
}

impl ErrorResponse {
    pub fn message(&self) -> Option<String> {
        let status = self.status.as_ref();
        status
            .and_then(|s| s.error_message.clone())
            .or_else(|| self.error.clone())
            .or_else(|| status.and_then(|s| s.error_code).map(|code| format!("error code {}", code)))
    }
}

/// Error type for market-data requests
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// 429 Too Many Requests
    #[error("Rate Limited: {0}")]
    RateLimited(String),
    /// 5xx Server Error
    #[error("Server Error ({0}): {1}")]
    ServerError(u16, String),
    /// Other non-success statuses
    #[error("HTTP Error ({0}): {1}")]
    HttpError(u16, String),
    /// Network/request error
    #[error("Request Error: {0}")]
    RequestError(String),
    /// Body was not a JSON object
    #[error("Deserialization Error: {0}")]
    DeserializationError(String),
}
