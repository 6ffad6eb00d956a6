//! Cache lookup metrics.
//!
//! Every lookup is counted twice: in-process atomics readable through
//! [`CacheMetrics::snapshot`], and `metrics` counters picked up by whatever
//! recorder the binary installs.

use std::sync::atomic::{AtomicU64, Ordering};

use metrics::counter;
use serde::Serialize;

use crate::read_through::Outcome;

pub const LOOKUPS_TOTAL: &str = "stellar_cache_lookups_total";
pub const UPSTREAM_FAILURES_TOTAL: &str = "stellar_upstream_failures_total";

/// Lookup counters for one entity type.
#[derive(Debug, Default)]
pub struct CacheMetrics {
    fresh: AtomicU64,
    refreshed: AtomicU64,
    stale: AtomicU64,
    missing: AtomicU64,
    upstream_failures: AtomicU64,
}

/// Point-in-time copy of [`CacheMetrics`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheMetricsSnapshot {
    pub fresh: u64,
    pub refreshed: u64,
    pub stale: u64,
    pub missing: u64,
    pub upstream_failures: u64,
}

impl CacheMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of one lookup.
    pub fn record_lookup(&self, entity: &'static str, outcome: Outcome) {
        let slot = match outcome {
            Outcome::Fresh => &self.fresh,
            Outcome::Refreshed => &self.refreshed,
            Outcome::Stale => &self.stale,
            Outcome::Missing => &self.missing,
        };
        slot.fetch_add(1, Ordering::Relaxed);
        counter!(LOOKUPS_TOTAL, "entity" => entity, "outcome" => outcome.as_str()).increment(1);
    }

    /// Record a failed upstream fetch or parse.
    pub fn record_upstream_failure(&self, entity: &'static str) {
        self.upstream_failures.fetch_add(1, Ordering::Relaxed);
        counter!(UPSTREAM_FAILURES_TOTAL, "entity" => entity).increment(1);
    }

    pub fn snapshot(&self) -> CacheMetricsSnapshot {
        CacheMetricsSnapshot {
            fresh: self.fresh.load(Ordering::Relaxed),
            refreshed: self.refreshed.load(Ordering::Relaxed),
            stale: self.stale.load(Ordering::Relaxed),
            missing: self.missing.load(Ordering::Relaxed),
            upstream_failures: self.upstream_failures.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_by_outcome() {
        let metrics = CacheMetrics::new();
        metrics.record_lookup("weather", Outcome::Fresh);
        metrics.record_lookup("weather", Outcome::Fresh);
        metrics.record_lookup("weather", Outcome::Stale);
        metrics.record_upstream_failure("weather");

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.fresh, 2);
        assert_eq!(snapshot.stale, 1);
        assert_eq!(snapshot.refreshed, 0);
        assert_eq!(snapshot.upstream_failures, 1);
    }
}
