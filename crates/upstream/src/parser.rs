//! Mapping of raw provider payloads into domain values.
//!
//! Every function here is pure. Missing or mistyped fields surface as
//! `MalformedPayload`, which the cache treats like an unreachable provider.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use stellar_common::{
    ForecastDay, HoroscopePatch, StellarError, StellarResult, WeatherForecast, WeatherPatch,
};

#[derive(Debug, Deserialize)]
struct CurrentPayload {
    name: String,
    sys: SysBlock,
    main: CurrentMain,
    wind: WindBlock,
    weather: Vec<Condition>,
}

#[derive(Debug, Deserialize)]
struct SysBlock {
    country: String,
}

#[derive(Debug, Deserialize)]
struct CurrentMain {
    temp: f64,
    humidity: i64,
}

#[derive(Debug, Deserialize)]
struct WindBlock {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct Condition {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct ForecastPayload {
    city: CityBlock,
    list: Vec<ForecastSample>,
}

#[derive(Debug, Deserialize)]
struct CityBlock {
    name: String,
    #[serde(default)]
    country: String,
}

#[derive(Debug, Deserialize)]
struct ForecastSample {
    dt_txt: String,
    main: SampleMain,
    wind: WindBlock,
    weather: Vec<Condition>,
}

#[derive(Debug, Deserialize)]
struct SampleMain {
    temp_min: f64,
    temp_max: f64,
    humidity: i64,
}

#[derive(Debug, Deserialize)]
struct HoroscopePayload {
    date_range: String,
    today: String,
    tomorrow: String,
    week: String,
    month: String,
    year: String,
}

/// Parse an OpenWeatherMap `/weather` payload.
pub fn parse_weather(payload: &Value) -> StellarResult<WeatherPatch> {
    let current = CurrentPayload::deserialize(payload)
        .map_err(|e| StellarError::malformed(format!("current weather: {}", e)))?;

    let condition = primary_condition(current.weather)?;

    Ok(WeatherPatch {
        city: current.name,
        country: current.sys.country,
        temperature: current.main.temp,
        humidity: humidity(current.main.humidity)?,
        wind_speed: wind_speed(current.wind.speed)?,
        description: condition.description,
        icon: condition.icon,
    })
}

/// Parse an OpenWeatherMap `/forecast` payload into at most `days` daily entries.
///
/// Samples are grouped by the date part of `dt_txt`; the first sample seen
/// for a date represents the whole day. Output is in ascending date order
/// no matter how the samples were ordered.
pub fn parse_forecast(payload: &Value, days: usize) -> StellarResult<WeatherForecast> {
    let parsed = ForecastPayload::deserialize(payload)
        .map_err(|e| StellarError::malformed(format!("forecast: {}", e)))?;

    let mut by_date: BTreeMap<String, ForecastSample> = BTreeMap::new();
    for sample in parsed.list {
        let date = sample_date(&sample.dt_txt)?;
        by_date.entry(date).or_insert(sample);
    }

    let forecast = by_date
        .into_iter()
        .take(days)
        .map(|(date, sample)| {
            let condition = primary_condition(sample.weather)?;
            Ok(ForecastDay {
                date,
                temperature_min: sample.main.temp_min,
                temperature_max: sample.main.temp_max,
                humidity: humidity(sample.main.humidity)?,
                wind_speed: wind_speed(sample.wind.speed)?,
                description: condition.description,
                icon: condition.icon,
            })
        })
        .collect::<StellarResult<Vec<_>>>()?;

    Ok(WeatherForecast {
        city: parsed.city.name,
        country: parsed.city.country,
        forecast,
    })
}

/// Parse a horoscope provider payload. Fields map 1:1.
pub fn parse_horoscope(payload: &Value) -> StellarResult<HoroscopePatch> {
    let parsed = HoroscopePayload::deserialize(payload)
        .map_err(|e| StellarError::malformed(format!("horoscope: {}", e)))?;

    Ok(HoroscopePatch {
        date_range: parsed.date_range,
        today: parsed.today,
        tomorrow: parsed.tomorrow,
        week: parsed.week,
        month: parsed.month,
        year: parsed.year,
    })
}

fn primary_condition(conditions: Vec<Condition>) -> StellarResult<Condition> {
    conditions
        .into_iter()
        .next()
        .ok_or_else(|| StellarError::malformed("weather[0] is missing"))
}

fn humidity(value: i64) -> StellarResult<u8> {
    u8::try_from(value)
        .ok()
        .filter(|h| *h <= 100)
        .ok_or_else(|| StellarError::malformed(format!("humidity out of range: {}", value)))
}

fn wind_speed(value: f64) -> StellarResult<f64> {
    if value >= 0.0 {
        Ok(value)
    } else {
        Err(StellarError::malformed(format!("negative wind speed: {}", value)))
    }
}

// "2023-12-04 09:00:00" -> "2023-12-04"
fn sample_date(dt_txt: &str) -> StellarResult<String> {
    dt_txt
        .split([' ', 'T'])
        .next()
        .filter(|date| !date.is_empty())
        .map(str::to_string)
        .ok_or_else(|| StellarError::malformed(format!("bad dt_txt: {:?}", dt_txt)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn current(temp: f64, description: &str) -> Value {
        json!({
            "name": "Beijing",
            "sys": { "country": "CN" },
            "main": { "temp": temp, "humidity": 60 },
            "wind": { "speed": 3.5 },
            "weather": [{ "description": description, "icon": "01d" }]
        })
    }

    // One sample per (date, time) pair; temp_min carries the insertion index.
    fn forecast(stamps: &[&str]) -> Value {
        let list: Vec<Value> = stamps
            .iter()
            .enumerate()
            .map(|(i, stamp)| {
                json!({
                    "dt_txt": stamp,
                    "main": { "temp_min": i as f64, "temp_max": i as f64 + 5.0, "humidity": 50 },
                    "wind": { "speed": 2.0 },
                    "weather": [{ "description": "few clouds", "icon": "02d" }]
                })
            })
            .collect();
        json!({ "city": { "name": "Beijing", "country": "CN" }, "list": list })
    }

    #[test]
    fn test_parse_weather() {
        let patch = parse_weather(&current(25.5, "clear sky")).unwrap();

        assert_eq!(patch.city, "Beijing");
        assert_eq!(patch.country, "CN");
        assert_eq!(patch.temperature, 25.5);
        assert_eq!(patch.humidity, 60);
        assert_eq!(patch.wind_speed, 3.5);
        assert_eq!(patch.description, "clear sky");
        assert_eq!(patch.icon, "01d");
    }

    #[test]
    fn test_parse_weather_missing_field() {
        let mut payload = current(25.5, "clear sky");
        payload["main"].as_object_mut().unwrap().remove("temp");

        let err = parse_weather(&payload).unwrap_err();
        assert!(matches!(err, StellarError::MalformedPayload(_)));
    }

    #[test]
    fn test_parse_weather_wrong_type() {
        let mut payload = current(25.5, "clear sky");
        payload["wind"]["speed"] = json!("fast");

        assert!(matches!(
            parse_weather(&payload),
            Err(StellarError::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_parse_weather_empty_conditions() {
        let mut payload = current(25.5, "clear sky");
        payload["weather"] = json!([]);

        let err = parse_weather(&payload).unwrap_err();
        assert!(err.to_string().contains("weather[0]"));
    }

    #[test]
    fn test_parse_weather_humidity_out_of_range() {
        let mut payload = current(25.5, "clear sky");
        payload["main"]["humidity"] = json!(140);
        assert!(parse_weather(&payload).is_err());

        payload["main"]["humidity"] = json!(-1);
        assert!(parse_weather(&payload).is_err());
    }

    #[test]
    fn test_parse_forecast_first_sample_per_day() {
        let payload = forecast(&[
            "2023-12-04 00:00:00",
            "2023-12-04 03:00:00",
            "2023-12-05 00:00:00",
            "2023-12-05 03:00:00",
        ]);

        let parsed = parse_forecast(&payload, 2).unwrap();

        let dates: Vec<_> = parsed.forecast.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(dates, vec!["2023-12-04", "2023-12-05"]);
        assert_eq!(parsed.forecast[0].temperature_min, 0.0);
        assert_eq!(parsed.forecast[1].temperature_min, 2.0);
        assert_eq!(parsed.forecast[1].temperature_max, 7.0);
        assert_eq!(parsed.city, "Beijing");
    }

    #[test]
    fn test_parse_forecast_sorts_dates() {
        let payload = forecast(&[
            "2023-12-06 00:00:00",
            "2023-12-04 00:00:00",
            "2023-12-05 00:00:00",
        ]);

        let parsed = parse_forecast(&payload, 14).unwrap();
        let dates: Vec<_> = parsed.forecast.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(dates, vec!["2023-12-04", "2023-12-05", "2023-12-06"]);
    }

    #[test]
    fn test_parse_forecast_first_encountered_wins() {
        let payload = forecast(&["2023-12-04 21:00:00", "2023-12-04 00:00:00"]);

        let parsed = parse_forecast(&payload, 1).unwrap();
        assert_eq!(parsed.forecast.len(), 1);
        assert_eq!(parsed.forecast[0].temperature_min, 0.0);
    }

    #[test]
    fn test_parse_forecast_truncates() {
        let payload = forecast(&[
            "2023-12-04 00:00:00",
            "2023-12-05 00:00:00",
            "2023-12-06 00:00:00",
            "2023-12-07 00:00:00",
        ]);

        let parsed = parse_forecast(&payload, 3).unwrap();
        assert_eq!(parsed.forecast.len(), 3);
        assert_eq!(parsed.forecast[2].date, "2023-12-06");
    }

    #[test]
    fn test_parse_forecast_missing_list() {
        let payload = json!({ "city": { "name": "Beijing", "country": "CN" } });
        assert!(matches!(
            parse_forecast(&payload, 7),
            Err(StellarError::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_parse_horoscope() {
        let payload = json!({
            "sign": "Aries",
            "date_range": "March 21 - April 19",
            "today": "Aries today: fortunes are good",
            "tomorrow": "t",
            "week": "w",
            "month": "m",
            "year": "y"
        });

        let patch = parse_horoscope(&payload).unwrap();
        assert_eq!(patch.date_range, "March 21 - April 19");
        assert_eq!(patch.today, "Aries today: fortunes are good");
        assert_eq!(patch.year, "y");
    }

    #[test]
    fn test_parse_horoscope_missing_horizon() {
        let payload = json!({ "sign": "Aries", "date_range": "x", "today": "y" });
        assert!(parse_horoscope(&payload).is_err());
    }

    #[test]
    fn test_sample_date() {
        assert_eq!(sample_date("2023-12-04 09:00:00").unwrap(), "2023-12-04");
        assert_eq!(sample_date("2023-12-04T09:00:00").unwrap(), "2023-12-04");
        assert!(sample_date("").is_err());
    }
}
