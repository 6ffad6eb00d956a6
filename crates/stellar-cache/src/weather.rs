//! Weather cache service.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tracing::{debug, instrument, warn};

use stellar_common::{StellarError, StellarResult, WeatherForecast, WeatherPatch, WeatherRecord};
use storage::Catalog;
use upstream::{parse_forecast, parse_weather, WeatherSource};

use crate::config::CacheConfig;
use crate::metrics::{CacheMetrics, CacheMetricsSnapshot};
use crate::read_through::{resolve, Lookup, ReadThrough};

pub const DEFAULT_FORECAST_DAYS: u32 = 7;
pub const MAX_FORECAST_DAYS: u32 = 14;

pub const DEFAULT_HISTORY_LIMIT: u32 = 10;
pub const MAX_HISTORY_LIMIT: u32 = 100;

/// Current weather by city, cached in the catalog.
pub struct WeatherService {
    catalog: Catalog,
    source: Arc<dyn WeatherSource>,
    ttl: Duration,
    metrics: CacheMetrics,
}

impl WeatherService {
    pub fn new(catalog: Catalog, source: Arc<dyn WeatherSource>, config: &CacheConfig) -> Self {
        Self {
            catalog,
            source,
            ttl: config.weather_ttl,
            metrics: CacheMetrics::new(),
        }
    }

    /// Current weather for a city, refreshed when stale.
    ///
    /// Fails with `NotFound` only when upstream is unavailable and nothing
    /// is cached for the city.
    pub async fn get_or_fetch_weather(&self, city: &str) -> StellarResult<WeatherRecord> {
        self.get_or_fetch_at(city, Utc::now()).await
    }

    pub async fn get_or_fetch_at(&self, city: &str, now: DateTime<Utc>) -> StellarResult<WeatherRecord> {
        let city = validate_city(city)?;
        self.lookup_at(city, now)
            .await?
            .into_record()
            .ok_or_else(|| StellarError::NotFound(format!("weather data for {}", city)))
    }

    /// The full lookup result, including how it was answered.
    pub async fn lookup_at(&self, city: &str, now: DateTime<Utc>) -> StellarResult<Lookup<WeatherRecord>> {
        let entity = CurrentWeather {
            catalog: &self.catalog,
            source: self.source.as_ref(),
        };
        resolve(&entity, city, now, self.ttl, &self.metrics).await
    }

    /// Daily forecast for a city. Never cached.
    ///
    /// `days` must be within 1..=14; anything else is rejected before any
    /// upstream call. Upstream and payload failures surface as `NotFound`.
    #[instrument(skip(self))]
    pub async fn fetch_forecast(&self, city: &str, days: u32) -> StellarResult<WeatherForecast> {
        let city = validate_city(city)?;
        if !(1..=MAX_FORECAST_DAYS).contains(&days) {
            return Err(StellarError::invalid_parameter(
                "days",
                format!("must be between 1 and {}, got {}", MAX_FORECAST_DAYS, days),
            ));
        }

        let forecast = match self.source.fetch_forecast(city).await {
            Ok(payload) => parse_forecast(&payload, days as usize),
            Err(e) => Err(e),
        };

        forecast.map_err(|e| {
            if e.is_upstream() {
                self.metrics.record_upstream_failure("forecast");
                warn!(city = %city, error = %e, "Forecast unavailable");
                StellarError::NotFound(format!("forecast for {}", city))
            } else {
                e
            }
        })
    }

    /// Stored records for a city, newest first. `limit` must be within 1..=100.
    pub async fn weather_history(&self, city: &str, limit: u32) -> StellarResult<Vec<WeatherRecord>> {
        let city = validate_city(city)?;
        if !(1..=MAX_HISTORY_LIMIT).contains(&limit) {
            return Err(StellarError::invalid_parameter(
                "limit",
                format!("must be between 1 and {}, got {}", MAX_HISTORY_LIMIT, limit),
            ));
        }
        self.catalog.weather_history(city, limit).await
    }

    pub fn metrics(&self) -> CacheMetricsSnapshot {
        self.metrics.snapshot()
    }
}

fn validate_city(city: &str) -> StellarResult<&str> {
    let trimmed = city.trim();
    if trimmed.is_empty() {
        return Err(StellarError::invalid_parameter("city", "must not be empty"));
    }
    Ok(trimmed)
}

struct CurrentWeather<'a> {
    catalog: &'a Catalog,
    source: &'a dyn WeatherSource,
}

#[async_trait]
impl<'a> ReadThrough for CurrentWeather<'a> {
    type Key = str;
    type Record = WeatherRecord;
    type Patch = WeatherPatch;

    const ENTITY: &'static str = "weather";

    async fn load(&self, city: &str) -> StellarResult<Option<WeatherRecord>> {
        self.catalog.get_weather(city).await
    }

    async fn fetch(&self, city: &str) -> StellarResult<WeatherPatch> {
        let payload = self.source.fetch_current(city).await?;
        let patch = parse_weather(&payload)?;
        if !patch.city.eq_ignore_ascii_case(city) {
            debug!(requested = %city, reported = %patch.city, "Provider reported a different city name");
        }
        Ok(patch)
    }

    fn build(
        city: &str,
        existing: Option<WeatherRecord>,
        patch: WeatherPatch,
        now: DateTime<Utc>,
    ) -> WeatherRecord {
        match existing {
            Some(record) => record.merge(patch, now),
            None => WeatherRecord::from_patch(city, patch, now),
        }
    }

    async fn store(&self, record: &WeatherRecord) -> StellarResult<WeatherRecord> {
        self.catalog.upsert_weather(record).await
    }
}
