//! Provider endpoints, credentials and HTTP timeouts.

use std::time::Duration;

use reqwest::Client;

use stellar_common::{StellarError, StellarResult};

pub const DEFAULT_WEATHER_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// Immutable upstream configuration, built once at startup.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// OpenWeatherMap-compatible API root
    pub weather_base_url: String,
    pub weather_api_key: String,
    /// Language for weather descriptions (e.g. "en", "zh_cn")
    pub weather_lang: String,
    /// Horoscope API root; `None` selects the built-in generator
    pub horoscope_base_url: Option<String>,
    pub horoscope_api_key: String,
    /// Whole-request deadline for provider calls
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            weather_base_url: DEFAULT_WEATHER_BASE_URL.to_string(),
            weather_api_key: String::new(),
            weather_lang: "en".to_string(),
            horoscope_base_url: None,
            horoscope_api_key: String::new(),
            request_timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(5),
        }
    }
}

impl UpstreamConfig {
    /// Build the shared HTTP client with this config's deadlines.
    pub fn http_client(&self) -> StellarResult<Client> {
        Client::builder()
            .timeout(self.request_timeout)
            .connect_timeout(self.connect_timeout)
            .pool_max_idle_per_host(4)
            .build()
            .map_err(|e| StellarError::InternalError(format!("Failed to create HTTP client: {}", e)))
    }
}

/// Map a transport-level reqwest failure onto the upstream error kinds.
pub(crate) fn map_request_error(err: reqwest::Error) -> StellarError {
    if err.is_timeout() {
        StellarError::Timeout
    } else if err.is_decode() {
        StellarError::malformed(err.to_string())
    } else {
        StellarError::UpstreamUnavailable(err.to_string())
    }
}
