//! Temperature and sky bucketing.
//!
//! Thresholds are inclusive on the lower bound: 60 is Mild and 75 is Warm.
//! Sky words are matched as substrings with rain taking precedence over
//! marine/overcast, which takes precedence over everything else.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::reading::WeatherReading;

const MILD_THRESHOLD_F: f64 = 60.0;
const WARM_THRESHOLD_F: f64 = 75.0;

const RAIN_WORDS: &[&str] = &["rain", "drizzle", "shower", "thunderstorm"];
const MARINE_WORDS: &[&str] = &["mist", "fog", "haze", "overcast", "marine"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemperatureBucket {
    Cool,
    Mild,
    Warm,
}

impl TemperatureBucket {
    pub const ALL: [Self; 3] = [Self::Cool, Self::Mild, Self::Warm];

    /// NaN compares false everywhere and ends up Warm.
    pub fn from_fahrenheit(temperature: f64) -> Self {
        if temperature < MILD_THRESHOLD_F {
            Self::Cool
        } else if temperature < WARM_THRESHOLD_F {
            Self::Mild
        } else {
            Self::Warm
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Cool => "Cool",
            Self::Mild => "Mild",
            Self::Warm => "Warm",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkyBucket {
    ClearPartlyCloudy,
    OvercastMarine,
    Rain,
}

impl SkyBucket {
    pub const ALL: [Self; 3] = [Self::ClearPartlyCloudy, Self::OvercastMarine, Self::Rain];

    pub fn from_description(description: &str) -> Self {
        let description = description.to_lowercase();
        let mentions = |words: &[&str]| words.iter().any(|w| description.contains(w));

        if mentions(RAIN_WORDS) {
            Self::Rain
        } else if mentions(MARINE_WORDS) {
            Self::OvercastMarine
        } else {
            Self::ClearPartlyCloudy
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::ClearPartlyCloudy => "Clear / Partly Cloudy",
            Self::OvercastMarine => "Overcast / Marine Layer",
            Self::Rain => "Rain",
        }
    }
}

/// Lookup key for the lunch table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scenario {
    pub temperature: TemperatureBucket,
    pub sky: SkyBucket,
}

impl Scenario {
    pub fn new(temperature: TemperatureBucket, sky: SkyBucket) -> Self {
        Self { temperature, sky }
    }

    /// All nine scenarios, temperature-major.
    pub fn all() -> impl Iterator<Item = Scenario> {
        TemperatureBucket::ALL
            .into_iter()
            .flat_map(|t| SkyBucket::ALL.into_iter().map(move |s| Scenario::new(t, s)))
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} + {}", self.temperature.label(), self.sky.label())
    }
}

pub fn classify(temperature_fahrenheit: f64, description: &str) -> Scenario {
    Scenario::new(
        TemperatureBucket::from_fahrenheit(temperature_fahrenheit),
        SkyBucket::from_description(description),
    )
}

/// Classify using the reading's rounded temperature.
pub fn classify_reading(reading: &WeatherReading) -> Scenario {
    classify(
        f64::from(reading.temperature_fahrenheit()),
        reading.description(),
    )
}
