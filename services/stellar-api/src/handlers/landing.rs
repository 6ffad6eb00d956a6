//! Landing page handler.

use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
pub struct LandingResponse {
    pub message: &'static str,
    pub version: &'static str,
}

/// GET / - Service name and version
pub async fn landing_handler() -> Json<LandingResponse> {
    Json(LandingResponse {
        message: "Welcome to Stellar Weather API",
        version: env!("CARGO_PKG_VERSION"),
    })
}
