//! Weather records and forecast value objects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A cached current-weather observation, keyed by city name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    /// Natural key
    pub city: String,
    /// ISO country code (e.g. "CN")
    pub country: String,
    /// Temperature in degrees Celsius
    pub temperature: f64,
    /// Relative humidity, percent
    pub humidity: u8,
    /// Wind speed in m/s
    pub wind_speed: f64,
    pub description: String,
    /// Provider icon code (e.g. "01d")
    pub icon: String,
    pub created_at: DateTime<Utc>,
    /// None when the record was never refreshed
    pub updated_at: Option<DateTime<Utc>>,
}

/// The mutable part of a weather record, as parsed from an upstream payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherPatch {
    /// City name as reported by the provider. Records keep the requested
    /// name instead.
    pub city: String,
    pub country: String,
    pub temperature: f64,
    pub humidity: u8,
    pub wind_speed: f64,
    pub description: String,
    pub icon: String,
}

impl WeatherRecord {
    /// Build a new record for `city` from a freshly fetched patch.
    ///
    /// The record is keyed by the name the caller asked for, not the
    /// provider's spelling, so later lookups by the same key hit it.
    pub fn from_patch(city: impl Into<String>, patch: WeatherPatch, now: DateTime<Utc>) -> Self {
        Self {
            city: city.into(),
            country: patch.country,
            temperature: patch.temperature,
            humidity: patch.humidity,
            wind_speed: patch.wind_speed,
            description: patch.description,
            icon: patch.icon,
            created_at: now,
            updated_at: Some(now),
        }
    }

    /// Overwrite every mutable field with `patch` and bump `updated_at`.
    ///
    /// `city` and `created_at` are preserved.
    pub fn merge(self, patch: WeatherPatch, now: DateTime<Utc>) -> Self {
        Self {
            country: patch.country,
            temperature: patch.temperature,
            humidity: patch.humidity,
            wind_speed: patch.wind_speed,
            description: patch.description,
            icon: patch.icon,
            updated_at: Some(now),
            ..self
        }
    }
}

/// One day of a multi-day forecast. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    /// Calendar date label, "YYYY-MM-DD"
    pub date: String,
    pub temperature_min: f64,
    pub temperature_max: f64,
    pub humidity: u8,
    pub wind_speed: f64,
    pub description: String,
    pub icon: String,
}

/// A forecast for one city, one entry per distinct date in ascending order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherForecast {
    pub city: String,
    pub country: String,
    pub forecast: Vec<ForecastDay>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn patch(temperature: f64, description: &str) -> WeatherPatch {
        WeatherPatch {
            city: "Beijing".to_string(),
            country: "CN".to_string(),
            temperature,
            humidity: 60,
            wind_speed: 3.5,
            description: description.to_string(),
            icon: "01d".to_string(),
        }
    }

    #[test]
    fn test_from_patch_sets_both_timestamps() {
        let now = Utc.with_ymd_and_hms(2023, 12, 4, 8, 0, 0).unwrap();
        let record = WeatherRecord::from_patch("beijing", patch(25.5, "clear"), now);

        assert_eq!(record.city, "beijing");
        assert_eq!(record.created_at, now);
        assert_eq!(record.updated_at, Some(now));
    }

    #[test]
    fn test_merge_keeps_identity_and_created_at() {
        let created = Utc.with_ymd_and_hms(2023, 12, 4, 8, 0, 0).unwrap();
        let later = created + Duration::hours(2);
        let record = WeatherRecord::from_patch("Beijing", patch(20.0, "cloudy"), created);

        let merged = record.merge(patch(-3.0, "light snow"), later);

        assert_eq!(merged.city, "Beijing");
        assert_eq!(merged.created_at, created);
        assert_eq!(merged.updated_at, Some(later));
        assert_eq!(merged.temperature, -3.0);
        assert_eq!(merged.description, "light snow");
    }
}
