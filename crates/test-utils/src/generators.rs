//! Generators for synthetic forecast data.
//!
//! These generators create predictable, verifiable samples: the n-th
//! generated sample has `temp_min == n` and `temp_max == n + 5`, so a test can
//! tell exactly which sample represented a day.

use chrono::{Duration, NaiveDate};
use serde_json::Value;

use crate::fixtures::forecast_sample;

/// Hours between consecutive samples, as in the OpenWeatherMap 5-day feed.
pub const SAMPLE_STEP_HOURS: i64 = 3;

/// Creates `days * per_day` forecast samples starting at midnight of `start`.
///
/// Samples are spaced [`SAMPLE_STEP_HOURS`] apart and wrap into the next day
/// after `per_day` samples.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use test_utils::forecast_samples;
///
/// let start = NaiveDate::from_ymd_opt(2023, 12, 4).unwrap();
/// let samples = forecast_samples(start, 2, 2);
/// assert_eq!(samples.len(), 4);
/// assert_eq!(samples[0]["dt_txt"], "2023-12-04 00:00:00");
/// assert_eq!(samples[1]["dt_txt"], "2023-12-04 03:00:00");
/// assert_eq!(samples[2]["dt_txt"], "2023-12-05 00:00:00");
/// ```
pub fn forecast_samples(start: NaiveDate, days: usize, per_day: usize) -> Vec<Value> {
    let mut samples = Vec::with_capacity(days * per_day);
    let midnight = start.and_hms_opt(0, 0, 0).unwrap_or_default();

    for day in 0..days {
        for slot in 0..per_day {
            let index = samples.len();
            let at = midnight
                + Duration::days(day as i64)
                + Duration::hours(SAMPLE_STEP_HOURS * slot as i64);
            samples.push(forecast_sample(
                &at.format("%Y-%m-%d %H:%M:%S").to_string(),
                index as f64,
                index as f64 + 5.0,
                "scattered clouds",
            ));
        }
    }

    samples
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forecast_samples_layout() {
        let start = NaiveDate::from_ymd_opt(2023, 12, 4).unwrap();
        let samples = forecast_samples(start, 3, 8);

        assert_eq!(samples.len(), 24);
        assert_eq!(samples[7]["dt_txt"], "2023-12-04 21:00:00");
        assert_eq!(samples[8]["dt_txt"], "2023-12-05 00:00:00");
        assert_eq!(samples[8]["main"]["temp_min"], 8.0);
    }
}
