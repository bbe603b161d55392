//! Weather retrieval for lunchcast
//!
//! Reads current conditions or the forecast entry nearest lunch time from the
//! OpenWeatherMap 2.5 API and reduces it to a `WeatherReading`.

pub mod forecast;
pub mod provider;
pub mod source;
pub mod types;

pub use provider::WeatherProvider;
pub use source::{WeatherQuery, WeatherSource};
pub use types::WeatherError;
