//! HTTP request handlers for the Stellar Weather API.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

use stellar_common::StellarError;

pub mod analysis;
pub mod health;
pub mod horoscope;
pub mod landing;
pub mod weather;

/// Error body shared by every endpoint.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
}

/// Handler error: a [`StellarError`] rendered as `{"detail": ...}` with the
/// status code the error kind maps to.
#[derive(Debug)]
pub struct ApiError(pub StellarError);

impl From<StellarError> for ApiError {
    fn from(err: StellarError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            error!(error = %self.0, status = status.as_u16(), "Request failed");
        }

        (
            status,
            Json(ErrorBody {
                detail: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

pub type ApiResult<T> = Result<Json<T>, ApiError>;
