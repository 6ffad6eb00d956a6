//! Horoscope sources: a deterministic generator and an HTTP client.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, instrument, warn};

use stellar_common::{StellarError, StellarResult, ZodiacSign};

use crate::config::{map_request_error, UpstreamConfig};
use crate::sources::HoroscopeSource;

/// Built-in horoscope provider.
///
/// Produces the same texts for a sign on every call, with no network
/// access. This is what the service serves when no horoscope API is
/// configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeneratedHoroscopes;

impl GeneratedHoroscopes {
    /// Build the provider-shaped payload for a sign.
    pub fn payload(sign: ZodiacSign) -> Value {
        let name = sign.name();
        json!({
            "sign": name,
            "date_range": sign.date_range(),
            "today": format!(
                "{name} today: overall fortune is good, work goes smoothly and relationships are stable."
            ),
            "tomorrow": format!(
                "{name} tomorrow: fortune is average, pay attention to the people around you."
            ),
            "week": format!(
                "{name} this week: fortune rises through the week, a good time to start new projects."
            ),
            "month": format!(
                "{name} this month: fortune is steady and finances look good."
            ),
            "year": format!(
                "{name} this year: fortune rises and falls, take care of your health."
            ),
        })
    }
}

#[async_trait]
impl HoroscopeSource for GeneratedHoroscopes {
    async fn fetch_horoscope(&self, sign: ZodiacSign) -> StellarResult<Value> {
        Ok(Self::payload(sign))
    }
}

/// Horoscope source backed by a remote JSON API at `{base_url}/{sign}`.
pub struct HttpHoroscopeSource {
    client: Client,
    base_url: String,
    api_key: String,
}

impl HttpHoroscopeSource {
    pub fn new(client: Client, base_url: &str, api_key: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }
}

#[async_trait]
impl HoroscopeSource for HttpHoroscopeSource {
    #[instrument(skip(self), fields(sign = %sign))]
    async fn fetch_horoscope(&self, sign: ZodiacSign) -> StellarResult<Value> {
        let url = format!("{}/{}", self.base_url, sign.name());

        debug!(url = %url, "Requesting horoscope provider");

        let response = self
            .client
            .get(&url)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(map_request_error)?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = %status, "Horoscope provider returned error status");
            return Err(StellarError::UpstreamUnavailable(format!(
                "horoscope returned {}",
                status
            )));
        }

        response.json::<Value>().await.map_err(map_request_error)
    }
}

/// Pick the horoscope source for a config: HTTP when a base URL is set,
/// the generator otherwise.
pub fn horoscope_source(
    config: &UpstreamConfig,
    client: Client,
) -> Arc<dyn HoroscopeSource> {
    match &config.horoscope_base_url {
        Some(base_url) => Arc::new(HttpHoroscopeSource::new(
            client,
            base_url,
            &config.horoscope_api_key,
        )),
        None => Arc::new(GeneratedHoroscopes),
    }
}
