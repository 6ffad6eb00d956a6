//! Horoscope handlers.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    Json,
};
use serde::Serialize;
use tracing::warn;

use stellar_common::{HoroscopeRecord, StellarError, ZodiacSign};

use super::ApiResult;
use crate::state::AppState;

/// The `today` slice of a horoscope.
#[derive(Debug, Serialize)]
pub struct TodayHoroscope {
    pub sign: String,
    pub date_range: String,
    pub today: String,
}

impl From<HoroscopeRecord> for TodayHoroscope {
    fn from(record: HoroscopeRecord) -> Self {
        Self {
            sign: record.sign,
            date_range: record.date_range,
            today: record.today,
        }
    }
}

/// GET /api/horoscope/:sign
pub async fn horoscope_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(sign): Path<String>,
) -> ApiResult<HoroscopeRecord> {
    let record = state.horoscopes.get_or_fetch_horoscope(&sign).await?;
    Ok(Json(record))
}

/// GET /api/horoscope/:sign/today
pub async fn today_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(sign): Path<String>,
) -> ApiResult<TodayHoroscope> {
    let record = state.horoscopes.get_or_fetch_horoscope(&sign).await?;
    Ok(Json(record.into()))
}

/// GET /api/horoscope/all/today
///
/// Serves whatever is cached. An empty cache is filled by looking up every
/// sign in turn; signs whose upstream fetch fails are left out.
pub async fn all_today_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> ApiResult<Vec<TodayHoroscope>> {
    let mut records = state.horoscopes.get_all_horoscopes().await?;

    if records.is_empty() {
        for sign in ZodiacSign::ALL {
            match state.horoscopes.get_or_fetch_horoscope(sign.name()).await {
                Ok(record) => records.push(record),
                Err(StellarError::NotFound(_)) => {
                    warn!(sign = %sign, "Skipping sign without horoscope data");
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    if records.is_empty() {
        return Err(StellarError::NotFound("horoscope data for any sign".to_string()).into());
    }

    Ok(Json(records.into_iter().map(TodayHoroscope::from).collect()))
}
