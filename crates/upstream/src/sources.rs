//! Source traits for the external providers.
//!
//! Sources return the raw JSON body; turning it into domain values is the
//! parser's job, so fakes only need to produce payloads.

use async_trait::async_trait;
use serde_json::Value;

use stellar_common::{StellarResult, ZodiacSign};

/// Provider of current weather and 5-day/3-hour forecasts by city.
#[async_trait]
pub trait WeatherSource: Send + Sync {
    /// Fetch the current conditions payload for a city.
    async fn fetch_current(&self, city: &str) -> StellarResult<Value>;

    /// Fetch the 3-hour interval forecast payload for a city.
    async fn fetch_forecast(&self, city: &str) -> StellarResult<Value>;
}

/// Provider of daily horoscope texts by sign.
#[async_trait]
pub trait HoroscopeSource: Send + Sync {
    async fn fetch_horoscope(&self, sign: ZodiacSign) -> StellarResult<Value>;
}
