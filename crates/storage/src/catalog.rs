//! Record catalog using SQLite.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::FromRow;
use tracing::{debug, info};

use stellar_common::{HoroscopeRecord, StellarError, StellarResult, WeatherRecord};

const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Database connection pool and record operations.
///
/// Each upsert runs in its own transaction, so a record is either fully
/// written or left as it was.
#[derive(Clone)]
pub struct Catalog {
    pool: SqlitePool,
}

impl Catalog {
    /// Connect to a database URL such as `sqlite://stellar.db`.
    ///
    /// The file is created when missing. Call [`Catalog::migrate`] before use.
    pub async fn connect(database_url: &str) -> StellarResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| StellarError::DatabaseError(format!("Invalid database URL: {}", e)))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect_with(options)
            .await
            .map_err(|e| StellarError::DatabaseError(format!("Connection failed: {}", e)))?;

        info!(url = %database_url, "Connected to catalog database");

        Ok(Self { pool })
    }

    /// Open or create a database file and make sure the schema exists.
    pub async fn open(path: &Path) -> StellarResult<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect_with(options)
            .await
            .map_err(|e| StellarError::DatabaseError(format!("Open failed: {}", e)))?;

        let catalog = Self { pool };
        catalog.migrate().await?;

        info!(path = %path.display(), "Opened catalog database");

        Ok(catalog)
    }

    /// Open a migrated in-memory database (for testing).
    pub async fn open_memory() -> StellarResult<Self> {
        let options = SqliteConnectOptions::new()
            .filename(":memory:")
            .create_if_missing(true);

        // A single connection that never recycles, otherwise the database
        // disappears with it.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| StellarError::DatabaseError(format!("Open failed: {}", e)))?;

        let catalog = Self { pool };
        catalog.migrate().await?;
        Ok(catalog)
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> StellarResult<()> {
        for statement in SCHEMA_SQL.split(';') {
            let trimmed = statement.trim();
            if !trimmed.is_empty() {
                sqlx::query(trimmed)
                    .execute(&self.pool)
                    .await
                    .map_err(|e| StellarError::DatabaseError(format!("Migration failed: {}", e)))?;
            }
        }

        Ok(())
    }

    /// Connectivity check used by readiness probes.
    pub async fn ping(&self) -> StellarResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| StellarError::DatabaseError(format!("Ping failed: {}", e)))?;
        Ok(())
    }

    /// Close the pool. Subsequent operations fail with `DatabaseError`.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    // ------------------------------------------------------------------------
    // Weather
    // ------------------------------------------------------------------------

    /// Get the stored weather record for a city.
    pub async fn get_weather(&self, city: &str) -> StellarResult<Option<WeatherRecord>> {
        let row = sqlx::query_as::<_, WeatherRow>(&format!(
            "SELECT {} FROM weather WHERE city = ?",
            WEATHER_COLUMNS
        ))
        .bind(city)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StellarError::DatabaseError(format!("Query failed: {}", e)))?;

        row.map(WeatherRecord::try_from).transpose()
    }

    /// Insert or update the weather record for `record.city` and return
    /// what was committed.
    ///
    /// On conflict every column except `city` and `created_at` is replaced.
    pub async fn upsert_weather(&self, record: &WeatherRecord) -> StellarResult<WeatherRecord> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StellarError::DatabaseError(format!("Begin failed: {}", e)))?;

        sqlx::query(
            r#"
            INSERT INTO weather (
                city, country, temperature, humidity, wind_speed,
                description, icon, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (city) DO UPDATE SET
                country = excluded.country,
                temperature = excluded.temperature,
                humidity = excluded.humidity,
                wind_speed = excluded.wind_speed,
                description = excluded.description,
                icon = excluded.icon,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&record.city)
        .bind(&record.country)
        .bind(record.temperature)
        .bind(record.humidity as i64)
        .bind(record.wind_speed)
        .bind(&record.description)
        .bind(&record.icon)
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| StellarError::DatabaseError(format!("Upsert failed: {}", e)))?;

        let row = sqlx::query_as::<_, WeatherRow>(&format!(
            "SELECT {} FROM weather WHERE city = ?",
            WEATHER_COLUMNS
        ))
        .bind(&record.city)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| StellarError::DatabaseError(format!("Query failed: {}", e)))?;

        tx.commit()
            .await
            .map_err(|e| StellarError::DatabaseError(format!("Commit failed: {}", e)))?;

        debug!(city = %record.city, "Upserted weather record");

        WeatherRecord::try_from(row)
    }

    /// Stored weather records for a city, most recently updated first.
    pub async fn weather_history(
        &self,
        city: &str,
        limit: u32,
    ) -> StellarResult<Vec<WeatherRecord>> {
        let rows = sqlx::query_as::<_, WeatherRow>(&format!(
            "SELECT {} FROM weather WHERE city = ? \
             ORDER BY COALESCE(updated_at, created_at) DESC LIMIT ?",
            WEATHER_COLUMNS
        ))
        .bind(city)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StellarError::DatabaseError(format!("Query failed: {}", e)))?;

        rows.into_iter().map(WeatherRecord::try_from).collect()
    }

    /// Delete the weather record for a city. Returns whether a row existed.
    pub async fn delete_weather(&self, city: &str) -> StellarResult<bool> {
        let result = sqlx::query("DELETE FROM weather WHERE city = ?")
            .bind(city)
            .execute(&self.pool)
            .await
            .map_err(|e| StellarError::DatabaseError(format!("Delete failed: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    // ------------------------------------------------------------------------
    // Horoscope
    // ------------------------------------------------------------------------

    /// Get the stored horoscope for a sign name.
    pub async fn get_horoscope(&self, sign: &str) -> StellarResult<Option<HoroscopeRecord>> {
        let row = sqlx::query_as::<_, HoroscopeRow>(&format!(
            "SELECT {} FROM horoscope WHERE sign = ?",
            HOROSCOPE_COLUMNS
        ))
        .bind(sign)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StellarError::DatabaseError(format!("Query failed: {}", e)))?;

        Ok(row.map(Into::into))
    }

    /// Insert or update the horoscope for `record.sign` and return what was
    /// committed.
    pub async fn upsert_horoscope(&self, record: &HoroscopeRecord) -> StellarResult<HoroscopeRecord> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StellarError::DatabaseError(format!("Begin failed: {}", e)))?;

        sqlx::query(
            r#"
            INSERT INTO horoscope (
                sign, date_range, today, tomorrow, week, month, year,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (sign) DO UPDATE SET
                date_range = excluded.date_range,
                today = excluded.today,
                tomorrow = excluded.tomorrow,
                week = excluded.week,
                month = excluded.month,
                year = excluded.year,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&record.sign)
        .bind(&record.date_range)
        .bind(&record.today)
        .bind(&record.tomorrow)
        .bind(&record.week)
        .bind(&record.month)
        .bind(&record.year)
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| StellarError::DatabaseError(format!("Upsert failed: {}", e)))?;

        let row = sqlx::query_as::<_, HoroscopeRow>(&format!(
            "SELECT {} FROM horoscope WHERE sign = ?",
            HOROSCOPE_COLUMNS
        ))
        .bind(&record.sign)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| StellarError::DatabaseError(format!("Query failed: {}", e)))?;

        tx.commit()
            .await
            .map_err(|e| StellarError::DatabaseError(format!("Commit failed: {}", e)))?;

        debug!(sign = %record.sign, "Upserted horoscope record");

        Ok(row.into())
    }

    /// Every cached horoscope, ordered by sign name.
    pub async fn all_horoscopes(&self) -> StellarResult<Vec<HoroscopeRecord>> {
        let rows = sqlx::query_as::<_, HoroscopeRow>(&format!(
            "SELECT {} FROM horoscope ORDER BY sign",
            HOROSCOPE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StellarError::DatabaseError(format!("Query failed: {}", e)))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Delete the horoscope for a sign name. Returns whether a row existed.
    pub async fn delete_horoscope(&self, sign: &str) -> StellarResult<bool> {
        let result = sqlx::query("DELETE FROM horoscope WHERE sign = ?")
            .bind(sign)
            .execute(&self.pool)
            .await
            .map_err(|e| StellarError::DatabaseError(format!("Delete failed: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }
}

const WEATHER_COLUMNS: &str = "city, country, temperature, humidity, wind_speed, \
                               description, icon, created_at, updated_at";

const HOROSCOPE_COLUMNS: &str = "sign, date_range, today, tomorrow, week, month, year, \
                                 created_at, updated_at";

#[derive(FromRow)]
struct WeatherRow {
    city: String,
    country: String,
    temperature: f64,
    humidity: i64,
    wind_speed: f64,
    description: String,
    icon: String,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<WeatherRow> for WeatherRecord {
    type Error = StellarError;

    fn try_from(row: WeatherRow) -> Result<Self, Self::Error> {
        let humidity = u8::try_from(row.humidity).map_err(|_| {
            StellarError::DatabaseError(format!(
                "Stored humidity out of range for {}: {}",
                row.city, row.humidity
            ))
        })?;

        Ok(WeatherRecord {
            city: row.city,
            country: row.country,
            temperature: row.temperature,
            humidity,
            wind_speed: row.wind_speed,
            description: row.description,
            icon: row.icon,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(FromRow)]
struct HoroscopeRow {
    sign: String,
    date_range: String,
    today: String,
    tomorrow: String,
    week: String,
    month: String,
    year: String,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl From<HoroscopeRow> for HoroscopeRecord {
    fn from(row: HoroscopeRow) -> Self {
        HoroscopeRecord {
            sign: row.sign,
            date_range: row.date_range,
            today: row.today,
            tomorrow: row.tomorrow,
            week: row.week,
            month: row.month,
            year: row.year,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS weather (
    city TEXT PRIMARY KEY,
    country TEXT NOT NULL,
    temperature REAL NOT NULL,
    humidity INTEGER NOT NULL,
    wind_speed REAL NOT NULL,
    description TEXT NOT NULL,
    icon TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT
);

CREATE TABLE IF NOT EXISTS horoscope (
    sign TEXT PRIMARY KEY,
    date_range TEXT NOT NULL,
    today TEXT NOT NULL,
    tomorrow TEXT NOT NULL,
    week TEXT NOT NULL,
    month TEXT NOT NULL,
    year TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT
);

CREATE INDEX IF NOT EXISTS idx_weather_updated ON weather(updated_at)
"#;
