//! Core of lunchcast: weather bucketing, the lunch table, the weekday gate
//! and the configuration shared by the binary.

pub mod config;
pub mod error;
pub mod gate;
pub mod lunch;
pub mod notify;
pub mod reading;
pub mod scenario;

pub use config::{ConfigOverrides, LunchConfig, ValidationResult, WeatherMode};
pub use error::ConfigError;
pub use gate::{should_send, SendDecision};
pub use lunch::{select_lunch, LunchSuggestion};
pub use notify::{compose, weather_line, LunchMessage};
pub use reading::WeatherReading;
pub use scenario::{classify, classify_reading, Scenario, SkyBucket, TemperatureBucket};

use anyhow::Result;

/// Initialize logging. Output goes to stderr so stdout only carries the report.
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    tracing::debug!("lunchcast core initialized");
    Ok(())
}
