//! One run: fetch, classify, pick lunch, gate, send.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use lunchcast_core::{
    classify_reading, compose, select_lunch, should_send, weather_line, ConfigError, LunchConfig,
    LunchSuggestion, Scenario, SendDecision, WeatherMode, WeatherReading,
};
use lunchcast_mail::{MailTransport, OutgoingMail, SentMessage};
use lunchcast_weather::{WeatherQuery, WeatherSource};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Sent(SentMessage),
    /// Email disabled; the suggestion was only computed.
    DryRun,
    /// The weekday gate said no.
    Skipped,
}

#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub reading: WeatherReading,
    pub scenario: Scenario,
    pub lunch: LunchSuggestion,
    pub decision: SendDecision,
    pub delivery: Delivery,
}

fn query_for(config: &LunchConfig, now: DateTime<Utc>) -> Result<WeatherQuery, ConfigError> {
    let city = config.city.clone();
    Ok(match config.mode {
        WeatherMode::Current => WeatherQuery::Current { city },
        WeatherMode::Forecast => WeatherQuery::ForecastNear {
            city,
            now,
            target: config.lunch_target_time()?,
        },
    })
}

/// Run the pipeline once.
///
/// `now` drives both the forecast target and the weekday gate. `mail` may be
/// `None` only when `config.send_email` is off.
pub async fn run_once<W, M>(
    config: &LunchConfig,
    weather: &W,
    mail: Option<&M>,
    now: DateTime<Utc>,
) -> Result<RunOutcome>
where
    W: WeatherSource,
    M: MailTransport,
{
    let tz = config.tz()?;
    let query = query_for(config, now)?;

    let reading = weather
        .fetch(&query)
        .await
        .with_context(|| format!("Failed to fetch weather for {}", query.city()))?;

    let scenario = classify_reading(&reading);
    let lunch = select_lunch(scenario);

    tracing::info!("{}", weather_line(&config.city, &reading));
    tracing::info!("Scenario: {}", scenario);
    tracing::info!("Lunch: {}", lunch);

    let decision = should_send(now, tz, config.weekday_only, config.force_send);
    tracing::info!("Send decision: {:?}", decision);

    let outcome = |delivery| RunOutcome {
        reading: reading.clone(),
        scenario,
        lunch,
        decision,
        delivery,
    };

    if !config.send_email {
        tracing::info!("Email disabled, not sending");
        return Ok(outcome(Delivery::DryRun));
    }
    if !decision.should_send() {
        tracing::info!("Skipping email: {:?}", decision);
        return Ok(outcome(Delivery::Skipped));
    }

    let transport = mail.ok_or_else(|| ConfigError::MissingSetting("mail transport".to_string()))?;
    let sender = config
        .sender
        .as_deref()
        .ok_or_else(|| ConfigError::MissingSetting("sender".to_string()))?;

    let message = compose(
        &config.city,
        &reading,
        scenario,
        lunch,
        config.signature_name.as_deref(),
        now.with_timezone(&tz).date_naive(),
    );
    let outgoing = OutgoingMail::new(sender, &config.recipients, &message.subject, &message.body)?;

    let sent = transport
        .send(&outgoing)
        .await
        .context("Failed to send lunch email")?;

    tracing::info!(
        "Sent lunch email {} to {} recipient(s)",
        sent.id,
        outgoing.to().len()
    );
    Ok(outcome(Delivery::Sent(sent)))
}
