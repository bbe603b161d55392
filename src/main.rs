use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use std::process::ExitCode;

use lunchcast::cli::Cli;
use lunchcast::{run_once, Delivery};
use lunchcast_core::{weather_line, ConfigError, LunchConfig};
use lunchcast_mail::{GmailClient, MailError};
use lunchcast_weather::{WeatherError, WeatherProvider};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    if let Err(e) = lunchcast_core::init() {
        eprintln!("{:#}", e);
    }

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("lunchcast failed: {:#}", e);
            if let Some(hint) = hint_for(&e) {
                tracing::error!("{}", hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = LunchConfig::load(cli.config.as_deref())?;
    config.apply(cli.overrides());
    config.ensure_valid()?;

    let api_key = config
        .api_key
        .clone()
        .ok_or_else(|| ConfigError::MissingSetting("api_key".to_string()))?;
    let weather = WeatherProvider::new(&config.weather_base_url, api_key.trim(), config.request_timeout())
        .context("Failed to create weather client")?;

    let mail = if config.send_email {
        let token = config
            .access_token
            .as_deref()
            .ok_or_else(|| ConfigError::MissingSetting("access_token".to_string()))?;
        Some(GmailClient::new(token.trim()).context("Failed to create mail client")?)
    } else {
        None
    };

    let outcome = run_once(&config, &weather, mail.as_ref(), Utc::now()).await?;

    println!("{}", weather_line(&config.city, &outcome.reading));
    println!("Scenario: {}", outcome.scenario);
    println!("Lunch: {}", outcome.lunch);
    match outcome.delivery {
        Delivery::Sent(sent) => println!("Email sent (id {})", sent.id),
        Delivery::DryRun => println!("Email disabled"),
        Delivery::Skipped => println!("Email skipped ({:?})", outcome.decision),
    }

    Ok(())
}

/// Operator hint for the error types that carry one.
fn hint_for(err: &anyhow::Error) -> Option<String> {
    err.chain().find_map(|cause| {
        if let Some(e) = cause.downcast_ref::<ConfigError>() {
            Some(e.user_message().to_string())
        } else if let Some(e) = cause.downcast_ref::<WeatherError>() {
            Some(e.user_message().to_string())
        } else {
            cause.downcast_ref::<MailError>().map(MailError::user_message)
        }
    })
}
