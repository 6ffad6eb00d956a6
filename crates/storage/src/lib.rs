//! Storage for stellar-weather services.
//!
//! One SQLite table per cached entity, keyed by its natural key:
//! - `weather`: keyed by city name
//! - `horoscope`: keyed by zodiac sign name

pub mod catalog;

pub use catalog::Catalog;
