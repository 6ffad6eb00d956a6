//! Scripted upstream sources.
//!
//! Each fake counts its calls and can be switched into a failure mode at any
//! point in a test, so cache behavior can be checked against exactly how
//! many times upstream was asked.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use stellar_common::{StellarError, StellarResult, ZodiacSign};
use upstream::{GeneratedHoroscopes, HoroscopeSource, WeatherSource};

use crate::fixtures::{current_weather_payload, horoscope_payload};

/// How a fake answers while failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Failure {
    #[default]
    None,
    /// Connection refused or non-2xx.
    Unavailable,
    Timeout,
    /// A 200 response whose body is missing required fields.
    Malformed,
}

impl Failure {
    fn apply(self) -> Option<StellarResult<Value>> {
        match self {
            Failure::None => None,
            Failure::Unavailable => Some(Err(StellarError::UpstreamUnavailable(
                "scripted outage".to_string(),
            ))),
            Failure::Timeout => Some(Err(StellarError::Timeout)),
            Failure::Malformed => Some(Ok(json!({ "unexpected": true }))),
        }
    }
}

/// Weather source answering from scripted payloads.
///
/// Cities without a scripted payload answer `UpstreamUnavailable`, the way
/// OpenWeatherMap answers 404 for an unknown city.
#[derive(Default)]
pub struct ScriptedWeather {
    current: Mutex<HashMap<String, Value>>,
    forecast: Mutex<HashMap<String, Value>>,
    failure: Mutex<Failure>,
    current_calls: AtomicUsize,
    forecast_calls: AtomicUsize,
}

impl ScriptedWeather {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the current weather for a city.
    pub fn with_current(self, city: &str, temperature: f64, description: &str) -> Self {
        self.set_current(city, current_weather_payload(city, temperature, description));
        self
    }

    /// Script a raw forecast payload for a city.
    pub fn with_forecast(self, city: &str, payload: Value) -> Self {
        self.forecast
            .lock()
            .unwrap()
            .insert(city.to_string(), payload);
        self
    }

    /// Replace the current-weather payload for a city mid-test.
    pub fn set_current(&self, city: &str, payload: Value) {
        self.current
            .lock()
            .unwrap()
            .insert(city.to_string(), payload);
    }

    pub fn fail_with(&self, failure: Failure) {
        *self.failure.lock().unwrap() = failure;
    }

    pub fn recover(&self) {
        self.fail_with(Failure::None);
    }

    pub fn current_calls(&self) -> usize {
        self.current_calls.load(Ordering::SeqCst)
    }

    pub fn forecast_calls(&self) -> usize {
        self.forecast_calls.load(Ordering::SeqCst)
    }

    fn answer(&self, scripted: &Mutex<HashMap<String, Value>>, city: &str) -> StellarResult<Value> {
        if let Some(result) = self.failure.lock().unwrap().apply() {
            return result;
        }
        scripted
            .lock()
            .unwrap()
            .get(city)
            .cloned()
            .ok_or_else(|| StellarError::UpstreamUnavailable(format!("city not found: {}", city)))
    }
}

#[async_trait]
impl WeatherSource for ScriptedWeather {
    async fn fetch_current(&self, city: &str) -> StellarResult<Value> {
        self.current_calls.fetch_add(1, Ordering::SeqCst);
        self.answer(&self.current, city)
    }

    async fn fetch_forecast(&self, city: &str) -> StellarResult<Value> {
        self.forecast_calls.fetch_add(1, Ordering::SeqCst);
        self.answer(&self.forecast, city)
    }
}

/// Horoscope source backed by [`GeneratedHoroscopes`], with overridable
/// `today` texts.
#[derive(Default)]
pub struct ScriptedHoroscopes {
    today: Mutex<HashMap<ZodiacSign, String>>,
    failure: Mutex<Failure>,
    calls: AtomicUsize,
}

impl ScriptedHoroscopes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_today(self, sign: ZodiacSign, today: &str) -> Self {
        self.set_today(sign, today);
        self
    }

    pub fn set_today(&self, sign: ZodiacSign, today: &str) {
        self.today.lock().unwrap().insert(sign, today.to_string());
    }

    pub fn fail_with(&self, failure: Failure) {
        *self.failure.lock().unwrap() = failure;
    }

    pub fn recover(&self) {
        self.fail_with(Failure::None);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HoroscopeSource for ScriptedHoroscopes {
    async fn fetch_horoscope(&self, sign: ZodiacSign) -> StellarResult<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(result) = self.failure.lock().unwrap().apply() {
            return result;
        }
        let today = self.today.lock().unwrap().get(&sign).cloned();
        Ok(match today {
            Some(today) => horoscope_payload(sign, &today),
            None => GeneratedHoroscopes::payload(sign),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_weather_counts_and_fails() {
        let source = ScriptedWeather::new().with_current("Beijing", 5.0, "haze");

        assert!(source.fetch_current("Beijing").await.is_ok());
        assert!(source.fetch_current("Atlantis").await.is_err());

        source.fail_with(Failure::Timeout);
        assert!(matches!(
            source.fetch_current("Beijing").await,
            Err(StellarError::Timeout)
        ));

        source.recover();
        assert!(source.fetch_current("Beijing").await.is_ok());
        assert_eq!(source.current_calls(), 4);
        assert_eq!(source.forecast_calls(), 0);
    }

    #[tokio::test]
    async fn test_scripted_horoscopes_override_today() {
        let source = ScriptedHoroscopes::new().with_today(ZodiacSign::Aries, "Aries today: bold");

        let aries = source.fetch_horoscope(ZodiacSign::Aries).await.unwrap();
        let leo = source.fetch_horoscope(ZodiacSign::Leo).await.unwrap();

        assert_eq!(aries["today"], "Aries today: bold");
        assert_eq!(leo, GeneratedHoroscopes::payload(ZodiacSign::Leo));
        assert_eq!(source.calls(), 2);
    }
}
