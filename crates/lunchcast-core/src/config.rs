use anyhow::{Context, Result};
use chrono::NaiveTime;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_CITY: &str = "Irvine,US";
pub const DEFAULT_TIMEZONE: &str = "America/Los_Angeles";
pub const DEFAULT_WEATHER_BASE_URL: &str = "https://api.openweathermap.org";
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
    /// Fields that are required but unset; also present in `errors`.
    pub missing: Vec<String>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_missing(&mut self, field: impl Into<String>) {
        let field = field.into();
        self.add_error(field.clone(), "required setting is not set");
        self.missing.push(field);
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Which OpenWeatherMap endpoint to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WeatherMode {
    #[default]
    Current,
    /// Forecast entry closest to the lunch target time.
    Forecast,
}

impl FromStr for WeatherMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "current" => Ok(Self::Current),
            "forecast" => Ok(Self::Forecast),
            other => Err(ConfigError::Invalid(format!(
                "unknown weather mode '{}', expected 'current' or 'forecast'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LunchConfig {
    /// OpenWeatherMap location query, e.g. "Irvine,US"
    pub city: String,

    /// OpenWeatherMap API key
    pub api_key: Option<String>,

    pub mode: WeatherMode,

    /// Local time of day the forecast entry is matched against
    pub lunch_target_hour: u32,
    pub lunch_target_minute: u32,

    /// IANA timezone used for the weekday gate and the email date
    pub timezone: String,

    /// Skip the email on Saturdays and Sundays
    pub weekday_only: bool,

    /// Send even when the weekday gate says no
    pub force_send: bool,

    /// When false the suggestion is only printed
    pub send_email: bool,

    /// From address of the email
    pub sender: Option<String>,

    pub recipients: Vec<String>,

    /// Gmail API bearer token
    pub access_token: Option<String>,

    /// Name appended to the bottom of the email
    pub signature_name: Option<String>,

    pub weather_base_url: String,

    /// Weather request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for LunchConfig {
    fn default() -> Self {
        Self {
            city: DEFAULT_CITY.to_string(),
            api_key: None,
            mode: WeatherMode::Current,
            lunch_target_hour: 12,
            lunch_target_minute: 0,
            timezone: DEFAULT_TIMEZONE.to_string(),
            weekday_only: true,
            force_send: false,
            send_email: true,
            sender: None,
            recipients: Vec::new(),
            access_token: None,
            signature_name: None,
            weather_base_url: DEFAULT_WEATHER_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Values supplied on the command line or through the environment.
///
/// `None` (or an empty list) leaves the file/default value in place.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub city: Option<String>,
    pub api_key: Option<String>,
    pub mode: Option<WeatherMode>,
    pub lunch_target_hour: Option<u32>,
    pub lunch_target_minute: Option<u32>,
    pub timezone: Option<String>,
    pub weekday_only: Option<bool>,
    pub force_send: Option<bool>,
    pub send_email: Option<bool>,
    pub sender: Option<String>,
    pub recipients: Vec<String>,
    pub access_token: Option<String>,
    pub signature_name: Option<String>,
    pub weather_base_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

/// Trim and drop empty strings so `CITY=""` behaves like an unset variable.
fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Unset, empty, or whitespace only.
fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

impl LunchConfig {
    /// Load configuration from an explicit file, or from the default location
    /// when it exists, or fall back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound(path.display().to_string()).into());
                }
                Self::from_file(path)
            }
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let config = Self::from_toml_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// `<config dir>/lunchcast/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("lunchcast").join("config.toml"))
    }

    pub fn apply(&mut self, overrides: ConfigOverrides) {
        if let Some(city) = non_empty(overrides.city) {
            self.city = city;
        }
        if let Some(key) = non_empty(overrides.api_key) {
            self.api_key = Some(key);
        }
        if let Some(mode) = overrides.mode {
            self.mode = mode;
        }
        if let Some(hour) = overrides.lunch_target_hour {
            self.lunch_target_hour = hour;
        }
        if let Some(minute) = overrides.lunch_target_minute {
            self.lunch_target_minute = minute;
        }
        if let Some(tz) = non_empty(overrides.timezone) {
            self.timezone = tz;
        }
        if let Some(flag) = overrides.weekday_only {
            self.weekday_only = flag;
        }
        if let Some(flag) = overrides.force_send {
            self.force_send = flag;
        }
        if let Some(flag) = overrides.send_email {
            self.send_email = flag;
        }
        if let Some(sender) = non_empty(overrides.sender) {
            self.sender = Some(sender);
        }
        let recipients: Vec<String> = overrides
            .recipients
            .into_iter()
            .filter_map(|r| non_empty(Some(r)))
            .collect();
        if !recipients.is_empty() {
            self.recipients = recipients;
        }
        if let Some(token) = non_empty(overrides.access_token) {
            self.access_token = Some(token);
        }
        if let Some(name) = non_empty(overrides.signature_name) {
            self.signature_name = Some(name);
        }
        if let Some(url) = non_empty(overrides.weather_base_url) {
            self.weather_base_url = url;
        }
        if let Some(secs) = overrides.request_timeout_secs {
            self.request_timeout_secs = secs;
        }
    }

    /// Validate the configuration
    ///
    /// Mail settings are only required when `send_email` is on.
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        if self.city.trim().is_empty() {
            result.add_missing("city");
        }
        if is_blank(self.api_key.as_deref()) {
            result.add_missing("api_key");
        }

        if self.send_email {
            if is_blank(self.sender.as_deref()) {
                result.add_missing("sender");
            }
            if self.recipients.iter().all(|r| is_blank(Some(r))) {
                result.add_missing("recipients");
            }
            if is_blank(self.access_token.as_deref()) {
                result.add_missing("access_token");
            }
        }

        for address in self.sender.iter().chain(self.recipients.iter()) {
            if !address.contains('@') {
                result.add_warning("mail", format!("'{}' does not look like an email address", address));
            }
        }

        if self.lunch_target_hour > 23 {
            result.add_error("lunch_target_hour", "Hour must be between 0 and 23");
        }
        if self.lunch_target_minute > 59 {
            result.add_error("lunch_target_minute", "Minute must be between 0 and 59");
        }

        if self.timezone.parse::<Tz>().is_err() {
            result.add_error("timezone", format!("Unknown timezone: {}", self.timezone));
        }

        self.validate_url(&self.weather_base_url, "weather_base_url", &mut result);

        if self.request_timeout_secs == 0 {
            result.add_error("request_timeout_secs", "Timeout must be greater than 0");
        } else if self.request_timeout_secs > 120 {
            result.add_warning("request_timeout_secs", "Timeout is unusually long (>120s)");
        }

        if self.force_send && !self.weekday_only {
            result.add_warning("force_send", "force_send has no effect when weekday_only is off");
        }

        result
    }

    /// Validate, log warnings, and turn errors into a `ConfigError`.
    ///
    /// Missing settings take precedence so the operator sees exactly what to set.
    pub fn ensure_valid(&self) -> Result<(), ConfigError> {
        let validation = self.validate();

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        if !validation.missing.is_empty() {
            return Err(ConfigError::MissingSetting(validation.missing.join(", ")));
        }
        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()));
        }
        Ok(())
    }

    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }
                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    pub fn tz(&self) -> Result<Tz, ConfigError> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| ConfigError::Invalid(format!("Unknown timezone: {}", self.timezone)))
    }

    pub fn lunch_target_time(&self) -> Result<NaiveTime, ConfigError> {
        NaiveTime::from_hms_opt(self.lunch_target_hour, self.lunch_target_minute, 0).ok_or_else(
            || {
                ConfigError::Invalid(format!(
                    "Invalid lunch target time {}:{:02}",
                    self.lunch_target_hour, self.lunch_target_minute
                ))
            },
        )
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
