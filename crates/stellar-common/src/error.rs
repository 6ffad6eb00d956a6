//! Error types for stellar-weather services.

use thiserror::Error;

/// Result type alias using StellarError.
pub type StellarResult<T> = Result<T, StellarError>;

/// Primary error type for cache, upstream and storage operations.
#[derive(Debug, Error)]
pub enum StellarError {
    // === Lookup Errors ===
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unknown zodiac sign: {0}")]
    UnknownSign(String),

    #[error("Invalid parameter value for '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    // === Upstream Errors ===
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Malformed upstream payload: {0}")]
    MalformedPayload(String),

    #[error("Upstream request timed out")]
    Timeout,

    // === Storage Errors ===
    #[error("Database error: {0}")]
    DatabaseError(String),

    // === Infrastructure Errors ===
    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl StellarError {
    pub fn invalid_parameter(param: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            param: param.into(),
            message: message.into(),
        }
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedPayload(msg.into())
    }

    /// Whether this error came from talking to a provider.
    ///
    /// Upstream errors are recovered by serving stale cached data; every
    /// other kind propagates to the caller.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            StellarError::UpstreamUnavailable(_)
                | StellarError::MalformedPayload(_)
                | StellarError::Timeout
        )
    }

    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            StellarError::InvalidParameter { .. } => 400,

            StellarError::NotFound(_) | StellarError::UnknownSign(_) => 404,

            StellarError::UpstreamUnavailable(_) | StellarError::MalformedPayload(_) => 502,
            StellarError::Timeout => 504,

            _ => 500,
        }
    }
}

impl From<serde_json::Error> for StellarError {
    fn from(err: serde_json::Error) -> Self {
        StellarError::MalformedPayload(format!("JSON error: {}", err))
    }
}
