//! Read-through behavior of the horoscope cache, and analyses built from
//! cached records.

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use stellar_cache::{compose_analysis, CacheConfig, HoroscopeService, Outcome, WeatherService};
use stellar_common::{StellarError, ZodiacSign};
use storage::Catalog;
use test_utils::{Failure, ScriptedHoroscopes, ScriptedWeather};
use upstream::{HoroscopeSource, WeatherSource};

fn midnight() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 12, 4, 0, 0, 0).unwrap()
}

async fn service_with(source: ScriptedHoroscopes) -> (HoroscopeService, Arc<ScriptedHoroscopes>) {
    let catalog = Catalog::open_memory().await.unwrap();
    let source = Arc::new(source);
    let horoscope_source: Arc<dyn HoroscopeSource> = source.clone();
    let service = HoroscopeService::new(catalog, horoscope_source, &CacheConfig::default());
    (service, source)
}

#[tokio::test]
async fn test_aries_date_range() {
    let (service, _source) = service_with(ScriptedHoroscopes::new()).await;

    let aries = service.get_or_fetch_horoscope("Aries").await.unwrap();

    assert_eq!(aries.sign, "Aries");
    assert_eq!(aries.date_range, "March 21 - April 19");
}

#[tokio::test]
async fn test_chinese_and_english_names_share_a_record() {
    let (service, source) = service_with(ScriptedHoroscopes::new()).await;

    let by_name = service.get_or_fetch_horoscope("aries").await.unwrap();
    let by_localized = service.get_or_fetch_horoscope("白羊座").await.unwrap();

    assert_eq!(by_name, by_localized);
    assert_eq!(source.calls(), 1);
}

#[tokio::test]
async fn test_unknown_sign_rejected_without_fetch() {
    let (service, source) = service_with(ScriptedHoroscopes::new()).await;

    let err = service.get_or_fetch_horoscope("Ophiuchus").await.unwrap_err();

    assert!(matches!(err, StellarError::UnknownSign(_)));
    assert_eq!(err.http_status_code(), 404);
    assert_eq!(source.calls(), 0);
}

#[tokio::test]
async fn test_daily_refresh() {
    let (service, source) = service_with(ScriptedHoroscopes::new()).await;

    service.get_or_fetch_at(ZodiacSign::Leo, midnight()).await.unwrap();

    let same_day = service
        .lookup_at(ZodiacSign::Leo, midnight() + Duration::hours(23))
        .await
        .unwrap();
    assert_eq!(same_day.outcome(), Outcome::Fresh);

    source.set_today(ZodiacSign::Leo, "Leo today: a new day");
    let next_day = service
        .lookup_at(ZodiacSign::Leo, midnight() + Duration::days(1) + Duration::minutes(1))
        .await
        .unwrap();

    assert_eq!(next_day.outcome(), Outcome::Refreshed);
    assert_eq!(next_day.record().unwrap().today, "Leo today: a new day");
    assert_eq!(next_day.record().unwrap().created_at, midnight());
    assert_eq!(source.calls(), 2);
}

#[tokio::test]
async fn test_failure_falls_back_to_stale() {
    let (service, source) = service_with(ScriptedHoroscopes::new()).await;

    let original = service.get_or_fetch_at(ZodiacSign::Pisces, midnight()).await.unwrap();
    source.fail_with(Failure::Unavailable);

    let stale = service
        .get_or_fetch_at(ZodiacSign::Pisces, midnight() + Duration::days(3))
        .await
        .unwrap();
    assert_eq!(stale, original);

    let err = service
        .get_or_fetch_at(ZodiacSign::Gemini, midnight())
        .await
        .unwrap_err();
    assert!(matches!(err, StellarError::NotFound(_)));
}

#[tokio::test]
async fn test_get_all_returns_only_cached() {
    let (service, source) = service_with(ScriptedHoroscopes::new()).await;

    assert!(service.get_all_horoscopes().await.unwrap().is_empty());

    service.get_or_fetch_horoscope("Leo").await.unwrap();
    service.get_or_fetch_horoscope("Aries").await.unwrap();

    let all = service.get_all_horoscopes().await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(source.calls(), 2);
}

#[tokio::test]
async fn test_analysis_from_cached_records() {
    let catalog = Catalog::open_memory().await.unwrap();
    let weather_source: Arc<dyn WeatherSource> =
        Arc::new(ScriptedWeather::new().with_current("Beijing", 25.5, "clear"));
    let horoscope_source: Arc<dyn HoroscopeSource> = Arc::new(
        ScriptedHoroscopes::new().with_today(ZodiacSign::Aries, "Aries today: fortunes are good"),
    );
    let config = CacheConfig::default();
    let weather = WeatherService::new(catalog.clone(), weather_source, &config);
    let horoscopes = HoroscopeService::new(catalog, horoscope_source, &config);

    let w = weather.get_or_fetch_weather("Beijing").await.unwrap();
    let h = horoscopes.get_or_fetch_horoscope("Aries").await.unwrap();
    let text = compose_analysis(&w, &h);

    assert!(text.starts_with(
        "Beijing weather is clear, temperature 25.5°C. Aries today: fortunes are good."
    ));
    assert!(text.contains("a fine day for just about anything"));
    assert!(text.contains("Clear skies lift the mood"));
    assert!(!text.contains("blazing heat"));
    assert!(!text.contains("keep warm"));
}
