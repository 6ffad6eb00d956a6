//! Tests for the reqwest-backed provider clients against a mock server.

use std::time::Duration;

use serde_json::json;
use stellar_common::{StellarError, ZodiacSign};
use upstream::{
    HoroscopeSource, HttpHoroscopeSource, OpenWeatherClient, UpstreamConfig, WeatherSource,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> UpstreamConfig {
    UpstreamConfig {
        weather_base_url: server.uri(),
        weather_api_key: "test-key".to_string(),
        weather_lang: "zh_cn".to_string(),
        request_timeout: Duration::from_millis(500),
        ..UpstreamConfig::default()
    }
}

// ============================================================================
// OpenWeatherClient
// ============================================================================

#[tokio::test]
async fn test_fetch_current_sends_expected_query() {
    let server = MockServer::start().await;
    let body = json!({ "name": "Beijing", "main": { "temp": 1.5 } });

    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "Beijing"))
        .and(query_param("appid", "test-key"))
        .and(query_param("units", "metric"))
        .and(query_param("lang", "zh_cn"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let client = OpenWeatherClient::new(&config_for(&server)).unwrap();
    let payload = client.fetch_current("Beijing").await.unwrap();

    assert_eq!(payload, body);
}

#[tokio::test]
async fn test_fetch_forecast_hits_forecast_endpoint() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "list": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let client = OpenWeatherClient::new(&config_for(&server)).unwrap();
    let payload = client.fetch_forecast("Shanghai").await.unwrap();

    assert_eq!(payload["list"], json!([]));
}

#[tokio::test]
async fn test_non_success_status_is_upstream_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "cod": "404" })))
        .mount(&server)
        .await;

    let client = OpenWeatherClient::new(&config_for(&server)).unwrap();
    let err = client.fetch_current("Atlantis").await.unwrap_err();

    assert!(matches!(err, StellarError::UpstreamUnavailable(_)));
    assert!(err.is_upstream());
}

#[tokio::test]
async fn test_non_json_body_is_malformed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = OpenWeatherClient::new(&config_for(&server)).unwrap();
    let err = client.fetch_current("Beijing").await.unwrap_err();

    assert!(matches!(err, StellarError::MalformedPayload(_)));
}

#[tokio::test]
async fn test_slow_provider_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let client = OpenWeatherClient::new(&config_for(&server)).unwrap();
    let err = client.fetch_current("Beijing").await.unwrap_err();

    assert!(matches!(err, StellarError::Timeout));
}

// ============================================================================
// HttpHoroscopeSource
// ============================================================================

#[tokio::test]
async fn test_horoscope_http_source() {
    let server = MockServer::start().await;
    let body = json!({
        "sign": "Leo",
        "date_range": "July 23 - August 22",
        "today": "Leo today: shine",
        "tomorrow": "t",
        "week": "w",
        "month": "m",
        "year": "y"
    });

    Mock::given(method("GET"))
        .and(path("/horoscope/Leo"))
        .and(query_param("key", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
        .mount(&server)
        .await;

    let client = UpstreamConfig::default().http_client().unwrap();
    let source = HttpHoroscopeSource::new(client, &format!("{}/horoscope/", server.uri()), "secret");

    let payload = source.fetch_horoscope(ZodiacSign::Leo).await.unwrap();
    assert_eq!(payload, body);
    assert!(upstream::parse_horoscope(&payload).is_ok());
}

#[tokio::test]
async fn test_horoscope_http_source_error_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = UpstreamConfig::default().http_client().unwrap();
    let source = HttpHoroscopeSource::new(client, &server.uri(), "secret");

    let err = source.fetch_horoscope(ZodiacSign::Virgo).await.unwrap_err();
    assert!(matches!(err, StellarError::UpstreamUnavailable(_)));
}
