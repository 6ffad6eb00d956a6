//! Provider payload fixtures.
//!
//! These mirror the JSON shapes returned by OpenWeatherMap and by the
//! horoscope provider, trimmed to the fields the parsers read.

use serde_json::{json, Value};

use stellar_common::ZodiacSign;

/// Country code used by every fixture.
pub const FIXTURE_COUNTRY: &str = "CN";

/// A `/weather` payload for `city`.
pub fn current_weather_payload(city: &str, temperature: f64, description: &str) -> Value {
    json!({
        "name": city,
        "sys": { "country": FIXTURE_COUNTRY },
        "main": { "temp": temperature, "humidity": 60 },
        "wind": { "speed": 3.5 },
        "weather": [{ "description": description, "icon": "01d" }]
    })
}

/// A `/forecast` payload wrapping pre-built samples.
///
/// See [`crate::generators::forecast_samples`] for building the list.
pub fn forecast_payload(city: &str, samples: Vec<Value>) -> Value {
    json!({
        "city": { "name": city, "country": FIXTURE_COUNTRY },
        "list": samples
    })
}

/// A single forecast sample.
pub fn forecast_sample(dt_txt: &str, temp_min: f64, temp_max: f64, description: &str) -> Value {
    json!({
        "dt_txt": dt_txt,
        "main": { "temp_min": temp_min, "temp_max": temp_max, "humidity": 70 },
        "wind": { "speed": 2.0 },
        "weather": [{ "description": description, "icon": "03d" }]
    })
}

/// A horoscope payload with a custom `today` text.
pub fn horoscope_payload(sign: ZodiacSign, today: &str) -> Value {
    json!({
        "sign": sign.name(),
        "date_range": sign.date_range(),
        "today": today,
        "tomorrow": format!("{} tomorrow: steady", sign.name()),
        "week": format!("{} this week: busy", sign.name()),
        "month": format!("{} this month: calm", sign.name()),
        "year": format!("{} this year: growth", sign.name())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_weather_payload_parses() {
        let patch = upstream::parse_weather(&current_weather_payload("Beijing", 12.0, "haze")).unwrap();
        assert_eq!(patch.city, "Beijing");
        assert_eq!(patch.country, FIXTURE_COUNTRY);
    }

    #[test]
    fn test_horoscope_payload_parses() {
        let patch = upstream::parse_horoscope(&horoscope_payload(ZodiacSign::Leo, "Leo today: ok")).unwrap();
        assert_eq!(patch.date_range, "July 23 - August 22");
        assert_eq!(patch.today, "Leo today: ok");
    }
}
