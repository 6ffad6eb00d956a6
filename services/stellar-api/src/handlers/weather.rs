//! Weather handlers.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    Json,
};
use serde::Deserialize;

use stellar_cache::{DEFAULT_FORECAST_DAYS, DEFAULT_HISTORY_LIMIT};
use stellar_common::{StellarError, WeatherForecast, WeatherRecord};

use super::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ForecastParams {
    pub days: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    pub limit: Option<i64>,
}

/// GET /api/weather/:city
pub async fn weather_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(city): Path<String>,
) -> ApiResult<WeatherRecord> {
    let record = state.weather.get_or_fetch_weather(&city).await?;
    Ok(Json(record))
}

/// GET /api/weather/forecast/:city?days=N
pub async fn forecast_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(city): Path<String>,
    Query(params): Query<ForecastParams>,
) -> ApiResult<WeatherForecast> {
    let days = count_param("days", params.days, DEFAULT_FORECAST_DAYS)?;
    let forecast = state.weather.fetch_forecast(&city, days).await?;
    Ok(Json(forecast))
}

/// GET /api/weather/history/:city?limit=N
pub async fn history_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(city): Path<String>,
    Query(params): Query<HistoryParams>,
) -> ApiResult<Vec<WeatherRecord>> {
    let limit = count_param("limit", params.limit, DEFAULT_HISTORY_LIMIT)?;
    let history = state.weather.weather_history(&city, limit).await?;

    if history.is_empty() {
        return Err(StellarError::NotFound(format!("weather history for {}", city)).into());
    }

    Ok(Json(history))
}

// Range checks live in the service; this only rejects values no u32 can hold.
fn count_param(name: &str, value: Option<i64>, default: u32) -> Result<u32, StellarError> {
    match value {
        None => Ok(default),
        Some(v) => u32::try_from(v).map_err(|_| {
            StellarError::invalid_parameter(name, format!("must be a positive integer, got {}", v))
        }),
    }
}
