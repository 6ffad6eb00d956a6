//! Generic read-through lookup shared by every cached entity.

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};

use stellar_common::StellarResult;

use crate::freshness::{is_stale, Timestamped};
use crate::metrics::CacheMetrics;

/// How a lookup was answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Fresh,
    Refreshed,
    Stale,
    Missing,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fresh => "fresh",
            Self::Refreshed => "refreshed",
            Self::Stale => "stale",
            Self::Missing => "missing",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a read-through lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    /// Stored record within its staleness window. Nothing was fetched.
    Fresh(T),
    /// Record fetched from upstream and committed.
    Refreshed(T),
    /// Upstream failed; the stored record is served as is.
    Stale(T),
    /// Upstream failed and nothing was stored.
    Missing,
}

impl<T> Lookup<T> {
    pub fn outcome(&self) -> Outcome {
        match self {
            Self::Fresh(_) => Outcome::Fresh,
            Self::Refreshed(_) => Outcome::Refreshed,
            Self::Stale(_) => Outcome::Stale,
            Self::Missing => Outcome::Missing,
        }
    }

    pub fn record(&self) -> Option<&T> {
        match self {
            Self::Fresh(r) | Self::Refreshed(r) | Self::Stale(r) => Some(r),
            Self::Missing => None,
        }
    }

    pub fn into_record(self) -> Option<T> {
        match self {
            Self::Fresh(r) | Self::Refreshed(r) | Self::Stale(r) => Some(r),
            Self::Missing => None,
        }
    }
}

/// One cached entity type: where it is stored, how it is fetched, and how
/// a fetched patch becomes a record.
#[async_trait]
pub trait ReadThrough: Send + Sync {
    type Key: fmt::Display + Send + Sync + ?Sized;
    type Record: Timestamped + Send + Sync;
    type Patch: Send;

    /// Label used in logs and metrics.
    const ENTITY: &'static str;

    async fn load(&self, key: &Self::Key) -> StellarResult<Option<Self::Record>>;

    /// Fetch and parse from upstream.
    async fn fetch(&self, key: &Self::Key) -> StellarResult<Self::Patch>;

    /// Merge into `existing`, or build a new record when there is none.
    fn build(
        key: &Self::Key,
        existing: Option<Self::Record>,
        patch: Self::Patch,
        now: DateTime<Utc>,
    ) -> Self::Record;

    /// Persist atomically and return what was committed.
    async fn store(&self, record: &Self::Record) -> StellarResult<Self::Record>;
}

/// Serve `key` from the store when fresh, otherwise refresh it from upstream.
///
/// Upstream failures never escape: they degrade to [`Lookup::Stale`] or
/// [`Lookup::Missing`]. Store failures are returned as errors.
pub async fn resolve<R: ReadThrough>(
    entity: &R,
    key: &R::Key,
    now: DateTime<Utc>,
    ttl: Duration,
    metrics: &CacheMetrics,
) -> StellarResult<Lookup<R::Record>> {
    let existing = match entity.load(key).await? {
        Some(record) if !is_stale(Some(&record), now, ttl) => {
            debug!(entity = R::ENTITY, key = %key, "Serving cached record");
            metrics.record_lookup(R::ENTITY, Outcome::Fresh);
            return Ok(Lookup::Fresh(record));
        }
        other => other,
    };

    let patch = match entity.fetch(key).await {
        Ok(patch) => patch,
        Err(e) if e.is_upstream() => {
            metrics.record_upstream_failure(R::ENTITY);
            let lookup = match existing {
                Some(record) => Lookup::Stale(record),
                None => Lookup::Missing,
            };
            warn!(
                entity = R::ENTITY,
                key = %key,
                error = %e,
                outcome = %lookup.outcome(),
                "Upstream refresh failed"
            );
            metrics.record_lookup(R::ENTITY, lookup.outcome());
            return Ok(lookup);
        }
        Err(e) => return Err(e),
    };

    let record = R::build(key, existing, patch, now);
    let stored = entity.store(&record).await?;

    info!(entity = R::ENTITY, key = %key, "Refreshed record from upstream");
    metrics.record_lookup(R::ENTITY, Outcome::Refreshed);

    Ok(Lookup::Refreshed(stored))
}
