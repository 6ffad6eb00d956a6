//! Zodiac signs and cached horoscope records.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::StellarError;

/// The four classical elements signs are grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    Fire,
    Earth,
    Air,
    Water,
}

/// One of the twelve fixed zodiac signs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZodiacSign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

impl ZodiacSign {
    /// All signs in calendar order, starting from Aries.
    pub const ALL: [ZodiacSign; 12] = [
        ZodiacSign::Aries,
        ZodiacSign::Taurus,
        ZodiacSign::Gemini,
        ZodiacSign::Cancer,
        ZodiacSign::Leo,
        ZodiacSign::Virgo,
        ZodiacSign::Libra,
        ZodiacSign::Scorpio,
        ZodiacSign::Sagittarius,
        ZodiacSign::Capricorn,
        ZodiacSign::Aquarius,
        ZodiacSign::Pisces,
    ];

    /// Canonical English name, used as the storage key.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Aries => "Aries",
            Self::Taurus => "Taurus",
            Self::Gemini => "Gemini",
            Self::Cancer => "Cancer",
            Self::Leo => "Leo",
            Self::Virgo => "Virgo",
            Self::Libra => "Libra",
            Self::Scorpio => "Scorpio",
            Self::Sagittarius => "Sagittarius",
            Self::Capricorn => "Capricorn",
            Self::Aquarius => "Aquarius",
            Self::Pisces => "Pisces",
        }
    }

    /// Chinese name, accepted as an alias when parsing.
    pub fn localized_name(&self) -> &'static str {
        match self {
            Self::Aries => "白羊座",
            Self::Taurus => "金牛座",
            Self::Gemini => "双子座",
            Self::Cancer => "巨蟹座",
            Self::Leo => "狮子座",
            Self::Virgo => "处女座",
            Self::Libra => "天秤座",
            Self::Scorpio => "天蝎座",
            Self::Sagittarius => "射手座",
            Self::Capricorn => "摩羯座",
            Self::Aquarius => "水瓶座",
            Self::Pisces => "双鱼座",
        }
    }

    /// Fixed calendar date range label.
    pub fn date_range(&self) -> &'static str {
        match self {
            Self::Aries => "March 21 - April 19",
            Self::Taurus => "April 20 - May 20",
            Self::Gemini => "May 21 - June 21",
            Self::Cancer => "June 22 - July 22",
            Self::Leo => "July 23 - August 22",
            Self::Virgo => "August 23 - September 22",
            Self::Libra => "September 23 - October 23",
            Self::Scorpio => "October 24 - November 22",
            Self::Sagittarius => "November 23 - December 21",
            Self::Capricorn => "December 22 - January 19",
            Self::Aquarius => "January 20 - February 18",
            Self::Pisces => "February 19 - March 20",
        }
    }

    pub fn element(&self) -> Element {
        match self {
            Self::Aries | Self::Leo | Self::Sagittarius => Element::Fire,
            Self::Capricorn | Self::Taurus | Self::Virgo => Element::Earth,
            Self::Gemini | Self::Libra | Self::Aquarius => Element::Air,
            Self::Cancer | Self::Scorpio | Self::Pisces => Element::Water,
        }
    }

    /// Parse an English (case-insensitive) or Chinese sign name.
    pub fn parse(s: &str) -> Option<Self> {
        let trimmed = s.trim();
        Self::ALL.into_iter().find(|sign| {
            sign.name().eq_ignore_ascii_case(trimmed) || sign.localized_name() == trimmed
        })
    }
}

impl fmt::Display for ZodiacSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ZodiacSign {
    type Err = StellarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| StellarError::UnknownSign(s.to_string()))
    }
}

/// A cached horoscope, keyed by sign name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoroscopeRecord {
    /// Natural key (canonical sign name)
    pub sign: String,
    pub date_range: String,
    pub today: String,
    pub tomorrow: String,
    pub week: String,
    pub month: String,
    pub year: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Horoscope texts as parsed from a provider payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoroscopePatch {
    pub date_range: String,
    pub today: String,
    pub tomorrow: String,
    pub week: String,
    pub month: String,
    pub year: String,
}

impl HoroscopeRecord {
    pub fn from_patch(sign: ZodiacSign, patch: HoroscopePatch, now: DateTime<Utc>) -> Self {
        Self {
            sign: sign.name().to_string(),
            date_range: patch.date_range,
            today: patch.today,
            tomorrow: patch.tomorrow,
            week: patch.week,
            month: patch.month,
            year: patch.year,
            created_at: now,
            updated_at: Some(now),
        }
    }

    /// Overwrite the texts with `patch` and bump `updated_at`.
    pub fn merge(self, patch: HoroscopePatch, now: DateTime<Utc>) -> Self {
        Self {
            date_range: patch.date_range,
            today: patch.today,
            tomorrow: patch.tomorrow,
            week: patch.week,
            month: patch.month,
            year: patch.year,
            updated_at: Some(now),
            ..self
        }
    }

    /// The sign this record belongs to, if the stored name is recognized.
    pub fn zodiac_sign(&self) -> Option<ZodiacSign> {
        ZodiacSign::parse(&self.sign)
    }
}
