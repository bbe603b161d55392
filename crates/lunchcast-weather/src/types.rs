use serde::Deserialize;

/// `main` block shared by the current and forecast payloads.
#[derive(Debug, Clone, Deserialize)]
pub struct MainBlock {
    pub temp: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConditionBlock {
    #[serde(default)]
    pub description: String,
}

/// Response of `/data/2.5/weather`
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentResponse {
    pub main: MainBlock,
    #[serde(default)]
    pub weather: Vec<ConditionBlock>,
    /// Unix seconds of the observation
    pub dt: Option<i64>,
}

/// One 3-hour slot of `/data/2.5/forecast`
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastEntry {
    pub dt: i64,
    pub main: MainBlock,
    #[serde(default)]
    pub weather: Vec<ConditionBlock>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastCity {
    /// Shift in seconds from UTC
    #[serde(default)]
    pub timezone: i32,
}

/// Response of `/data/2.5/forecast`
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastResponse {
    #[serde(default)]
    pub list: Vec<ForecastEntry>,
    pub city: ForecastCity,
}

/// First condition description; OpenWeatherMap orders them by significance.
pub(crate) fn primary_description(conditions: &[ConditionBlock]) -> Result<&str, WeatherError> {
    conditions
        .first()
        .map(|c| c.description.as_str())
        .ok_or_else(|| WeatherError::Parse("response has no weather conditions".to_string()))
}

/// Weather provider errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Location not found: {0}")]
    LocationNotFound(String),

    #[error("Weather API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl WeatherError {
    pub fn user_message(&self) -> &'static str {
        match self {
            WeatherError::Network(e) if e.is_timeout() => {
                "The weather request timed out. Please try again."
            }
            WeatherError::Network(_) => "Unable to reach the weather service.",
            WeatherError::InvalidApiKey => "Weather API key is invalid. Check settings.",
            WeatherError::LocationNotFound(_) => "Location not found. Check the city setting.",
            WeatherError::ApiError { status, .. } if *status >= 500 => {
                "Weather service unavailable. Please try again later."
            }
            WeatherError::ApiError { .. } => "Weather service error. Please try again.",
            WeatherError::Parse(_) => "Weather service returned unexpected data.",
        }
    }
}
