//! Upstream provider access for stellar-weather.
//!
//! - [`WeatherSource`] / [`HoroscopeSource`]: the seams the cache depends on
//! - [`OpenWeatherClient`], [`HttpHoroscopeSource`]: reqwest implementations
//! - [`GeneratedHoroscopes`]: deterministic built-in horoscope texts
//! - [`parser`]: raw JSON to domain values

pub mod config;
pub mod horoscope;
pub mod openweather;
pub mod parser;
pub mod sources;

pub use config::UpstreamConfig;
pub use horoscope::{horoscope_source, GeneratedHoroscopes, HttpHoroscopeSource};
pub use openweather::OpenWeatherClient;
pub use parser::{parse_forecast, parse_horoscope, parse_weather};
pub use sources::{HoroscopeSource, WeatherSource};
