use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single weather observation, already reduced to what the classifier uses.
///
/// Fields are private so a reading cannot be altered after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherReading {
    temperature_fahrenheit: i32,
    description: String,
    observed_at: Option<DateTime<Utc>>,
}

impl WeatherReading {
    /// Build a reading from a raw API temperature and description.
    ///
    /// The temperature is rounded half-to-even (72.5 becomes 72) and the
    /// description is lowercased. Non-finite temperatures become 0.
    pub fn new(
        temperature_fahrenheit: f64,
        description: &str,
        observed_at: Option<DateTime<Utc>>,
    ) -> Self {
        let rounded = if temperature_fahrenheit.is_finite() {
            // `as` saturates at the i32 bounds
            temperature_fahrenheit.round_ties_even() as i32
        } else {
            0
        };

        Self {
            temperature_fahrenheit: rounded,
            description: description.trim().to_lowercase(),
            observed_at,
        }
    }

    pub fn temperature_fahrenheit(&self) -> i32 {
        self.temperature_fahrenheit
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn observed_at(&self) -> Option<DateTime<Utc>> {
        self.observed_at
    }
}
