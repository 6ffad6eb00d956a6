//! Application state for the Stellar Weather API.

use std::sync::Arc;

use anyhow::{Context, Result};
use metrics_exporter_prometheus::PrometheusHandle;
use tracing::info;

use stellar_cache::{CacheConfig, HoroscopeService, WeatherService};
use storage::Catalog;
use upstream::{horoscope_source, HoroscopeSource, OpenWeatherClient, WeatherSource};

use crate::config::ApiConfig;

/// Shared application state.
pub struct AppState {
    /// Record catalog, also used for readiness checks.
    pub catalog: Catalog,

    pub weather: WeatherService,

    pub horoscopes: HoroscopeService,

    /// Renders the Prometheus exposition for `/metrics`.
    pub prometheus: PrometheusHandle,
}

impl AppState {
    /// Connect the catalog and build the upstream clients from config.
    pub async fn new(config: &ApiConfig, prometheus: PrometheusHandle) -> Result<Self> {
        let catalog = Catalog::connect(&config.database_url)
            .await
            .context("Failed to connect catalog")?;
        catalog.migrate().await.context("Failed to migrate catalog")?;

        let cache = config
            .cache_config()
            .context("Invalid cache configuration")?;
        let upstream = config.upstream_config();
        let client = upstream.http_client()?;

        let weather_source: Arc<dyn WeatherSource> =
            Arc::new(OpenWeatherClient::with_client(client.clone(), &upstream));
        let horoscope_source = horoscope_source(&upstream, client);

        info!(
            database = %config.database_url,
            weather_base_url = %upstream.weather_base_url,
            horoscope = upstream.horoscope_base_url.as_deref().unwrap_or("generated"),
            "Initialized application state"
        );

        Ok(Self::from_parts(
            catalog,
            weather_source,
            horoscope_source,
            &cache,
            prometheus,
        ))
    }

    /// Assemble state from already-built parts.
    pub fn from_parts(
        catalog: Catalog,
        weather_source: Arc<dyn WeatherSource>,
        horoscope_source: Arc<dyn HoroscopeSource>,
        cache: &CacheConfig,
        prometheus: PrometheusHandle,
    ) -> Self {
        Self {
            weather: WeatherService::new(catalog.clone(), weather_source, cache),
            horoscopes: HoroscopeService::new(catalog.clone(), horoscope_source, cache),
            catalog,
            prometheus,
        }
    }
}
