//! Staleness decisions for cached records.

use chrono::{DateTime, Duration, Utc};

use stellar_common::{HoroscopeRecord, WeatherRecord};

/// A cached record that knows when it was last refreshed.
pub trait Timestamped {
    fn last_updated(&self) -> Option<DateTime<Utc>>;
}

impl Timestamped for WeatherRecord {
    fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

impl Timestamped for HoroscopeRecord {
    fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

/// Whether a cached record must be refetched.
///
/// Absent records and records never stamped with an update time are always
/// stale. Otherwise a record is stale once `now - last_updated` strictly
/// exceeds `ttl`, so a record exactly `ttl` old is still served.
pub fn is_stale<T: Timestamped>(entity: Option<&T>, now: DateTime<Utc>, ttl: Duration) -> bool {
    match entity.and_then(Timestamped::last_updated) {
        Some(updated) => now - updated > ttl,
        None => true,
    }
}
