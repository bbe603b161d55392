use chrono::NaiveDate;

use crate::lunch::LunchSuggestion;
use crate::reading::WeatherReading;
use crate::scenario::Scenario;

/// Subject and plain-text body of the daily email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LunchMessage {
    pub subject: String,
    pub body: String,
}

/// One-line weather summary, also printed to stdout by the binary.
pub fn weather_line(city: &str, reading: &WeatherReading) -> String {
    format!(
        "Weather for {}: {}°F, {}",
        city,
        reading.temperature_fahrenheit(),
        reading.description()
    )
}

pub fn compose(
    city: &str,
    reading: &WeatherReading,
    scenario: Scenario,
    lunch: LunchSuggestion,
    signature: Option<&str>,
    today: NaiveDate,
) -> LunchMessage {
    let subject = format!("Lunch suggestion for {}: {}", today.format("%A, %B %-d"), lunch);

    let mut body = format!(
        "{}\nScenario: {}\nLunch: {}\n",
        weather_line(city, reading),
        scenario,
        lunch
    );

    if let Some(name) = signature.map(str::trim).filter(|s| !s.is_empty()) {
        body.push_str(&format!("\n- {}\n", name));
    }

    LunchMessage { subject, body }
}
