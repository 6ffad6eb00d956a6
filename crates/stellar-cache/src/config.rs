//! Cache configuration.

use chrono::Duration;

use stellar_common::{StellarError, StellarResult};

/// Default weather staleness window in minutes.
pub const DEFAULT_WEATHER_TTL_MINUTES: u32 = 60;

/// Default horoscope staleness window in days.
pub const DEFAULT_HOROSCOPE_TTL_DAYS: u32 = 1;

/// Staleness windows per entity type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    pub weather_ttl: Duration,
    pub horoscope_ttl: Duration,
}

impl CacheConfig {
    /// Both windows must be at least one unit long.
    pub fn new(weather_ttl_minutes: u32, horoscope_ttl_days: u32) -> StellarResult<Self> {
        Ok(Self {
            weather_ttl: ttl("weather_ttl_minutes", weather_ttl_minutes, Duration::try_minutes)?,
            horoscope_ttl: ttl("horoscope_ttl_days", horoscope_ttl_days, Duration::try_days)?,
        })
    }
}

fn ttl(param: &str, value: u32, unit: fn(i64) -> Option<Duration>) -> StellarResult<Duration> {
    if value == 0 {
        return Err(StellarError::invalid_parameter(param, "must be at least 1"));
    }
    unit(i64::from(value))
        .ok_or_else(|| StellarError::invalid_parameter(param, format!("{} is out of range", value)))
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            weather_ttl: Duration::minutes(i64::from(DEFAULT_WEATHER_TTL_MINUTES)),
            horoscope_ttl: Duration::days(i64::from(DEFAULT_HOROSCOPE_TTL_DAYS)),
        }
    }
}
