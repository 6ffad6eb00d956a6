//! Service configuration from flags, environment and `.env`.

use std::time::Duration;

use axum::http::HeaderValue;
use clap::Parser;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use stellar_cache::config::{DEFAULT_HOROSCOPE_TTL_DAYS, DEFAULT_WEATHER_TTL_MINUTES};
use stellar_cache::CacheConfig;
use stellar_common::StellarResult;
use upstream::config::DEFAULT_WEATHER_BASE_URL;
use upstream::UpstreamConfig;

/// Stellar Weather API server
#[derive(Parser, Debug, Clone)]
#[command(name = "stellar-api")]
#[command(about = "Weather, horoscope and analysis API with a read-through SQLite cache")]
pub struct ApiConfig {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:8000", env = "LISTEN_ADDR")]
    pub listen: String,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    pub log_level: String,

    /// Number of worker threads
    #[arg(long, env = "WORKER_THREADS")]
    pub worker_threads: Option<usize>,

    /// SQLite database URL
    #[arg(long, default_value = "sqlite://stellar.db", env = "DATABASE_URL")]
    pub database_url: String,

    /// OpenWeatherMap API key
    #[arg(long, default_value = "", env = "WEATHER_API_KEY", hide_env_values = true)]
    pub weather_api_key: String,

    /// OpenWeatherMap base URL
    #[arg(long, default_value = DEFAULT_WEATHER_BASE_URL, env = "WEATHER_BASE_URL")]
    pub weather_base_url: String,

    /// Language for weather descriptions
    #[arg(long, default_value = "en", env = "WEATHER_LANG")]
    pub weather_lang: String,

    /// Horoscope provider base URL; built-in horoscopes when unset
    #[arg(long, env = "HOROSCOPE_BASE_URL")]
    pub horoscope_base_url: Option<String>,

    /// Horoscope provider API key
    #[arg(long, default_value = "", env = "HOROSCOPE_API_KEY", hide_env_values = true)]
    pub horoscope_api_key: String,

    /// Upstream request timeout in seconds
    #[arg(long, default_value_t = 10, env = "UPSTREAM_TIMEOUT_SECS")]
    pub upstream_timeout_secs: u64,

    /// Minutes before a cached weather record is refetched
    #[arg(
        long,
        default_value_t = DEFAULT_WEATHER_TTL_MINUTES,
        env = "WEATHER_CACHE_TTL_MINUTES",
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub weather_cache_ttl_minutes: u32,

    /// Days before a cached horoscope is refetched
    #[arg(
        long,
        default_value_t = DEFAULT_HOROSCOPE_TTL_DAYS,
        env = "HOROSCOPE_CACHE_TTL_DAYS",
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub horoscope_cache_ttl_days: u32,

    /// Comma-separated allowed CORS origins, or "*"
    #[arg(long, default_value = "*", env = "CORS_ORIGINS")]
    pub cors_origins: String,
}

impl ApiConfig {
    pub fn upstream_config(&self) -> UpstreamConfig {
        UpstreamConfig {
            weather_base_url: self.weather_base_url.clone(),
            weather_api_key: self.weather_api_key.clone(),
            weather_lang: self.weather_lang.clone(),
            horoscope_base_url: self
                .horoscope_base_url
                .clone()
                .filter(|url| !url.trim().is_empty()),
            horoscope_api_key: self.horoscope_api_key.clone(),
            request_timeout: Duration::from_secs(self.upstream_timeout_secs),
            ..UpstreamConfig::default()
        }
    }

    pub fn cache_config(&self) -> StellarResult<CacheConfig> {
        CacheConfig::new(self.weather_cache_ttl_minutes, self.horoscope_cache_ttl_days)
    }

    /// CORS layer for the configured origins. Origins that are not valid
    /// header values are skipped.
    pub fn cors_layer(&self) -> CorsLayer {
        let raw: Vec<&str> = self
            .cors_origins
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .collect();

        let allow_origin = if raw.is_empty() || raw.contains(&"*") {
            AllowOrigin::from(Any)
        } else {
            AllowOrigin::list(raw.into_iter().filter_map(|o| HeaderValue::from_str(o).ok()))
        };

        CorsLayer::new()
            .allow_origin(allow_origin)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
