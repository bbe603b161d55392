use chrono::{DateTime, NaiveTime, Utc};
use lunchcast_core::WeatherReading;
use std::future::Future;

use crate::types::WeatherError;

/// What to ask the weather service for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WeatherQuery {
    Current { city: String },
    /// Forecast slot nearest `target` local time on the city's current date.
    ForecastNear {
        city: String,
        now: DateTime<Utc>,
        target: NaiveTime,
    },
}

impl WeatherQuery {
    pub fn city(&self) -> &str {
        match self {
            Self::Current { city } | Self::ForecastNear { city, .. } => city,
        }
    }
}

/// Anything that can turn a query into a reading.
pub trait WeatherSource {
    fn fetch(
        &self,
        query: &WeatherQuery,
    ) -> impl Future<Output = Result<WeatherReading, WeatherError>> + Send;
}
