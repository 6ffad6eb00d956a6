//! OpenWeatherMap HTTP client.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use stellar_common::{StellarError, StellarResult};

use crate::config::{map_request_error, UpstreamConfig};
use crate::sources::WeatherSource;

/// Weather source backed by the OpenWeatherMap `/weather` and `/forecast` APIs.
pub struct OpenWeatherClient {
    client: Client,
    base_url: String,
    api_key: String,
    lang: String,
}

impl OpenWeatherClient {
    pub fn new(config: &UpstreamConfig) -> StellarResult<Self> {
        Ok(Self::with_client(config.http_client()?, config))
    }

    /// Reuse an existing client (and its connection pool).
    pub fn with_client(client: Client, config: &UpstreamConfig) -> Self {
        Self {
            client,
            base_url: config.weather_base_url.trim_end_matches('/').to_string(),
            api_key: config.weather_api_key.clone(),
            lang: config.weather_lang.clone(),
        }
    }

    async fn get_json(&self, endpoint: &str, city: &str) -> StellarResult<Value> {
        let url = format!("{}/{}", self.base_url, endpoint);

        debug!(url = %url, city = %city, "Requesting weather provider");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
                ("lang", self.lang.as_str()),
            ])
            .send()
            .await
            .map_err(map_request_error)?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = %status, "Weather provider returned error status");
            return Err(StellarError::UpstreamUnavailable(format!(
                "{} returned {}",
                endpoint, status
            )));
        }

        response.json::<Value>().await.map_err(map_request_error)
    }
}

#[async_trait]
impl WeatherSource for OpenWeatherClient {
    #[instrument(skip(self))]
    async fn fetch_current(&self, city: &str) -> StellarResult<Value> {
        self.get_json("weather", city).await
    }

    #[instrument(skip(self))]
    async fn fetch_forecast(&self, city: &str) -> StellarResult<Value> {
        self.get_json("forecast", city).await
    }
}
