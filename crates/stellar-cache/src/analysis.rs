//! Rule-based text mixing a weather record with a horoscope.

use stellar_common::{Element, HoroscopeRecord, WeatherRecord};

/// Above this temperature (°C) the hot clause applies.
pub const HOT_ABOVE: f64 = 30.0;
/// Below this temperature (°C) the cold clause applies.
pub const COLD_BELOW: f64 = 10.0;

const HOT_FIRE: &str =
    " The blazing heat matches the passionate nature of fire signs, a great day for outdoor activities!";
const HOT_OTHER: &str = " It's hot out there, stay cool and keep your spirits up.";
const COLD_EARTH: &str =
    " The cold weather makes earth signs even steadier, a good day for indoor work and study.";
const COLD_OTHER: &str = " It's cold, keep warm and drink plenty of hot water.";
const MILD_AIR: &str =
    " Pleasant weather suits the social side of air signs, why not meet up with friends today!";
const MILD_WATER: &str =
    " Comfortable weather boosts the creativity of water signs, a good day for art or meditation.";
const MILD_GENERIC: &str = " The weather is pleasant, a fine day for just about anything!";

const RAIN: &str = " Rainy days are good for quiet reflection, sorting your thoughts and planning ahead.";
const CLEAR: &str = " Clear skies lift the mood, a chance to finish tasks you have been putting off.";
const CLOUD: &str = " Cloudy weather favors keeping a low profile and quietly building energy.";

const RAIN_TERMS: &[&str] = &["rain", "drizzle", "shower", "thunderstorm", "雨"];
const CLEAR_TERMS: &[&str] = &["clear", "sunny", "晴"];
const CLOUD_TERMS: &[&str] = &["cloud", "overcast", "云"];

/// Compose the analysis text for a weather record and a horoscope.
///
/// The output is a base sentence, then exactly one temperature clause, then
/// at most one description clause.
pub fn compose_analysis(weather: &WeatherRecord, horoscope: &HoroscopeRecord) -> String {
    let mut text = format!(
        "{} weather is {}, temperature {}°C. {} today: {}.",
        weather.city,
        weather.description,
        celsius(weather.temperature),
        horoscope.sign,
        today_summary(&horoscope.today),
    );

    let element = horoscope.zodiac_sign().map(|sign| sign.element());
    text.push_str(temperature_clause(weather.temperature, element));

    if let Some(clause) = description_clause(&weather.description) {
        text.push_str(clause);
    }

    text
}

fn temperature_clause(temperature: f64, element: Option<Element>) -> &'static str {
    if temperature > HOT_ABOVE {
        match element {
            Some(Element::Fire) => HOT_FIRE,
            _ => HOT_OTHER,
        }
    } else if temperature < COLD_BELOW {
        match element {
            Some(Element::Earth) => COLD_EARTH,
            _ => COLD_OTHER,
        }
    } else {
        match element {
            Some(Element::Air) => MILD_AIR,
            Some(Element::Water) => MILD_WATER,
            _ => MILD_GENERIC,
        }
    }
}

fn description_clause(description: &str) -> Option<&'static str> {
    let description = description.to_lowercase();
    let mentions = |terms: &[&str]| terms.iter().any(|term| description.contains(term));

    if mentions(RAIN_TERMS) {
        Some(RAIN)
    } else if mentions(CLEAR_TERMS) {
        Some(CLEAR)
    } else if mentions(CLOUD_TERMS) {
        Some(CLOUD)
    } else {
        None
    }
}

/// Whole degrees keep one decimal place ("25.0"); others print as-is.
fn celsius(temperature: f64) -> String {
    if temperature.is_finite() && temperature.fract() == 0.0 {
        format!("{:.1}", temperature)
    } else {
        temperature.to_string()
    }
}

/// Text after the first ':' or '：', without trailing sentence punctuation.
fn today_summary(today: &str) -> &str {
    let summary = match today.find([':', '：']) {
        Some(idx) => {
            let delimiter_len = today[idx..].chars().next().map_or(1, char::len_utf8);
            &today[idx + delimiter_len..]
        }
        None => today,
    };
    summary
        .trim()
        .trim_end_matches(['.', '。', '!', '！'])
        .trim_end()
}
