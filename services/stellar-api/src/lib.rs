//! Stellar Weather API Service Library
//!
//! HTTP front end over the weather and horoscope caches. The binary in
//! `main.rs` only parses configuration and serves [`create_router`].

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

pub mod config;
pub mod handlers;
pub mod state;

use state::AppState;

/// Build the full router with middleware.
pub fn create_router(state: Arc<AppState>, cors: CorsLayer) -> Router {
    Router::new()
        // Landing and probes
        .route("/", get(handlers::landing::landing_handler))
        .route("/health", get(handlers::health::health_handler))
        .route("/ready", get(handlers::health::ready_handler))
        .route("/metrics", get(handlers::health::metrics_handler))
        // Weather
        .route(
            "/api/weather/forecast/:city",
            get(handlers::weather::forecast_handler),
        )
        .route(
            "/api/weather/history/:city",
            get(handlers::weather::history_handler),
        )
        .route("/api/weather/:city", get(handlers::weather::weather_handler))
        // Horoscope
        .route(
            "/api/horoscope/all/today",
            get(handlers::horoscope::all_today_handler),
        )
        .route(
            "/api/horoscope/:sign",
            get(handlers::horoscope::horoscope_handler),
        )
        .route(
            "/api/horoscope/:sign/today",
            get(handlers::horoscope::today_handler),
        )
        // Analysis
        .route(
            "/api/analysis/:city/:sign",
            get(handlers::analysis::analysis_handler),
        )
        // Middleware
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
}
