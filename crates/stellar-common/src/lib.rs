//! Common types and utilities shared across all stellar-weather crates.

pub mod error;
pub mod horoscope;
pub mod weather;

pub use error::{StellarError, StellarResult};
pub use horoscope::{Element, HoroscopePatch, HoroscopeRecord, ZodiacSign};
pub use weather::{ForecastDay, WeatherForecast, WeatherPatch, WeatherRecord};
