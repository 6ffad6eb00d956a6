//! Weather and horoscope analysis handler.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    Json,
};
use serde::Serialize;

use stellar_cache::compose_analysis;

use super::ApiResult;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub city: String,
    pub sign: String,
    pub weather: WeatherSummary,
    pub horoscope: HoroscopeSummary,
    pub analysis: String,
}

#[derive(Debug, Serialize)]
pub struct WeatherSummary {
    pub temperature: f64,
    pub description: String,
    pub humidity: u8,
}

#[derive(Debug, Serialize)]
pub struct HoroscopeSummary {
    pub today: String,
}

/// GET /api/analysis/:city/:sign
pub async fn analysis_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path((city, sign)): Path<(String, String)>,
) -> ApiResult<AnalysisResponse> {
    let weather = state.weather.get_or_fetch_weather(&city).await?;
    let horoscope = state.horoscopes.get_or_fetch_horoscope(&sign).await?;

    let analysis = compose_analysis(&weather, &horoscope);

    Ok(Json(AnalysisResponse {
        city,
        sign,
        weather: WeatherSummary {
            temperature: weather.temperature,
            description: weather.description,
            humidity: weather.humidity,
        },
        horoscope: HoroscopeSummary {
            today: horoscope.today,
        },
        analysis,
    }))
}
