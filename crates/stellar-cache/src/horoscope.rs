//! Horoscope cache service.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use stellar_common::{HoroscopePatch, HoroscopeRecord, StellarError, StellarResult, ZodiacSign};
use storage::Catalog;
use upstream::{parse_horoscope, HoroscopeSource};

use crate::config::CacheConfig;
use crate::metrics::{CacheMetrics, CacheMetricsSnapshot};
use crate::read_through::{resolve, Lookup, ReadThrough};

/// Horoscopes by zodiac sign, cached in the catalog.
pub struct HoroscopeService {
    catalog: Catalog,
    source: Arc<dyn HoroscopeSource>,
    ttl: Duration,
    metrics: CacheMetrics,
}

impl HoroscopeService {
    pub fn new(catalog: Catalog, source: Arc<dyn HoroscopeSource>, config: &CacheConfig) -> Self {
        Self {
            catalog,
            source,
            ttl: config.horoscope_ttl,
            metrics: CacheMetrics::new(),
        }
    }

    /// Horoscope for a sign given by English or Chinese name.
    ///
    /// Unknown names fail with `UnknownSign` without touching the store or
    /// upstream.
    pub async fn get_or_fetch_horoscope(&self, sign: &str) -> StellarResult<HoroscopeRecord> {
        let sign: ZodiacSign = sign.parse()?;
        self.get_or_fetch_at(sign, Utc::now()).await
    }

    pub async fn get_or_fetch_at(
        &self,
        sign: ZodiacSign,
        now: DateTime<Utc>,
    ) -> StellarResult<HoroscopeRecord> {
        self.lookup_at(sign, now)
            .await?
            .into_record()
            .ok_or_else(|| StellarError::NotFound(format!("horoscope for {}", sign)))
    }

    pub async fn lookup_at(
        &self,
        sign: ZodiacSign,
        now: DateTime<Utc>,
    ) -> StellarResult<Lookup<HoroscopeRecord>> {
        let entity = SignHoroscope {
            catalog: &self.catalog,
            source: self.source.as_ref(),
        };
        resolve(&entity, &sign, now, self.ttl, &self.metrics).await
    }

    /// Every cached horoscope, fresh or not. Never fetches.
    pub async fn get_all_horoscopes(&self) -> StellarResult<Vec<HoroscopeRecord>> {
        self.catalog.all_horoscopes().await
    }

    pub fn metrics(&self) -> CacheMetricsSnapshot {
        self.metrics.snapshot()
    }
}

struct SignHoroscope<'a> {
    catalog: &'a Catalog,
    source: &'a dyn HoroscopeSource,
}

#[async_trait]
impl<'a> ReadThrough for SignHoroscope<'a> {
    type Key = ZodiacSign;
    type Record = HoroscopeRecord;
    type Patch = HoroscopePatch;

    const ENTITY: &'static str = "horoscope";

    async fn load(&self, sign: &ZodiacSign) -> StellarResult<Option<HoroscopeRecord>> {
        self.catalog.get_horoscope(sign.name()).await
    }

    async fn fetch(&self, sign: &ZodiacSign) -> StellarResult<HoroscopePatch> {
        let payload = self.source.fetch_horoscope(*sign).await?;
        parse_horoscope(&payload)
    }

    fn build(
        sign: &ZodiacSign,
        existing: Option<HoroscopeRecord>,
        patch: HoroscopePatch,
        now: DateTime<Utc>,
    ) -> HoroscopeRecord {
        match existing {
            Some(record) => record.merge(patch, now),
            None => HoroscopeRecord::from_patch(*sign, patch, now),
        }
    }

    async fn store(&self, record: &HoroscopeRecord) -> StellarResult<HoroscopeRecord> {
        self.catalog.upsert_horoscope(record).await
    }
}
