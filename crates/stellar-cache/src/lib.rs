//! Read-through caching of weather and horoscope records.
//!
//! A lookup serves the stored record while it is within its staleness
//! window, refreshes it from upstream otherwise, and falls back to the
//! stored copy when upstream is unavailable.

pub mod analysis;
pub mod config;
pub mod freshness;
pub mod horoscope;
pub mod metrics;
pub mod read_through;
pub mod weather;

pub use analysis::compose_analysis;
pub use config::CacheConfig;
pub use freshness::{is_stale, Timestamped};
pub use horoscope::HoroscopeService;
pub use self::metrics::{CacheMetrics, CacheMetricsSnapshot};
pub use read_through::{resolve, Lookup, Outcome, ReadThrough};
pub use weather::{
    WeatherService, DEFAULT_FORECAST_DAYS, DEFAULT_HISTORY_LIMIT, MAX_FORECAST_DAYS,
    MAX_HISTORY_LIMIT,
};
