use clap::builder::BoolishValueParser;
use clap::Parser;
use lunchcast_core::{ConfigOverrides, WeatherMode};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "lunchcast")]
#[command(author, version, about = "Suggest a lunch from the weather and email it")]
pub struct Cli {
    /// Path to a TOML config file (defaults to <config dir>/lunchcast/config.toml)
    #[arg(long, env = "LUNCHCAST_CONFIG")]
    pub config: Option<PathBuf>,

    /// OpenWeatherMap location query, e.g. "Irvine,US"
    #[arg(long, env = "CITY")]
    pub city: Option<String>,

    #[arg(long, env = "OPENWEATHER_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Use current conditions or the forecast nearest lunch time
    #[arg(long, env = "WEATHER_MODE")]
    pub mode: Option<WeatherMode>,

    #[arg(long, env = "LUNCH_TARGET_HOUR")]
    pub lunch_target_hour: Option<u32>,

    #[arg(long, env = "LUNCH_TARGET_MINUTE")]
    pub lunch_target_minute: Option<u32>,

    /// IANA timezone for the weekday check, e.g. "America/Los_Angeles"
    #[arg(long, env = "LUNCH_TIMEZONE")]
    pub timezone: Option<String>,

    /// Only email on Monday to Friday
    #[arg(long, env = "WEEKDAY_ONLY", value_parser = BoolishValueParser::new())]
    pub weekday_only: Option<bool>,

    /// Email even on weekends
    #[arg(
        long = "force",
        env = "FORCE_SEND",
        value_parser = BoolishValueParser::new(),
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub force_send: Option<bool>,

    #[arg(long, env = "SEND_EMAIL", value_parser = BoolishValueParser::new())]
    pub send_email: Option<bool>,

    /// Print the suggestion without sending email; wins over --send-email
    #[arg(long)]
    pub dry_run: bool,

    #[arg(long = "from", env = "MAIL_FROM")]
    pub sender: Option<String>,

    /// Recipients, comma separated
    #[arg(long = "to", env = "MAIL_TO", value_delimiter = ',')]
    pub recipients: Vec<String>,

    #[arg(long, env = "GMAIL_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    /// Name to sign the email with
    #[arg(long, env = "SIGNATURE_NAME")]
    pub signature_name: Option<String>,

    #[arg(long, env = "OPENWEATHER_BASE_URL")]
    pub weather_base_url: Option<String>,

    /// Weather request timeout in seconds
    #[arg(long, env = "WEATHER_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,
}

impl Cli {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            city: self.city.clone(),
            api_key: self.api_key.clone(),
            mode: self.mode,
            lunch_target_hour: self.lunch_target_hour,
            lunch_target_minute: self.lunch_target_minute,
            timezone: self.timezone.clone(),
            weekday_only: self.weekday_only,
            force_send: self.force_send,
            send_email: if self.dry_run { Some(false) } else { self.send_email },
            sender: self.sender.clone(),
            recipients: self.recipients.clone(),
            access_token: self.access_token.clone(),
            signature_name: self.signature_name.clone(),
            weather_base_url: self.weather_base_url.clone(),
            request_timeout_secs: self.timeout_secs,
        }
    }
}
