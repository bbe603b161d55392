//! OpenWeatherMap client.

use chrono::{DateTime, NaiveTime, Utc};
use lunchcast_core::WeatherReading;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::instrument;

use crate::forecast::{lunch_target, nearest_entry};
use crate::source::{WeatherQuery, WeatherSource};
use crate::types::{primary_description, CurrentResponse, ForecastResponse, WeatherError};

const USER_AGENT: &str = concat!("lunchcast/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Client,
    base_url: String,
    api_key: String,
}

impl WeatherProvider {
    /// `timeout` bounds the whole request; an unbounded wait is never used.
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Current conditions for `city`.
    #[instrument(skip(self), level = "info")]
    pub async fn current(&self, city: &str) -> Result<WeatherReading, WeatherError> {
        let resp: CurrentResponse = self.get("weather", city).await?;
        let description = primary_description(&resp.weather)?;
        let observed_at = resp.dt.and_then(|dt| DateTime::from_timestamp(dt, 0));

        Ok(WeatherReading::new(resp.main.temp, description, observed_at))
    }

    /// Forecast entry closest to `target` local time on the city's date of `now`.
    #[instrument(skip(self), level = "info")]
    pub async fn forecast_near(
        &self,
        city: &str,
        now: DateTime<Utc>,
        target: NaiveTime,
    ) -> Result<WeatherReading, WeatherError> {
        let resp: ForecastResponse = self.get("forecast", city).await?;

        let target_at = lunch_target(now, resp.city.timezone, target).ok_or_else(|| {
            WeatherError::Parse(format!("invalid timezone offset {}", resp.city.timezone))
        })?;

        let entry = nearest_entry(&resp.list, target_at)
            .ok_or_else(|| WeatherError::Parse("forecast has no entries".to_string()))?;

        tracing::debug!(
            "Picked forecast slot {} for target {}",
            entry.dt,
            target_at
        );

        let description = primary_description(&entry.weather)?;
        Ok(WeatherReading::new(
            entry.main.temp,
            description,
            DateTime::from_timestamp(entry.dt, 0),
        ))
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str, city: &str) -> Result<T, WeatherError> {
        let url = format!("{}/data/2.5/{}", self.base_url, endpoint);

        let response = self
            .client
            .get(&url)
            .query(&[("q", city), ("appid", self.api_key.as_str()), ("units", "imperial")])
            .send()
            .await?;

        Self::handle_response(response, city).await
    }

    async fn handle_response<T: DeserializeOwned>(
        response: reqwest::Response,
        city: &str,
    ) -> Result<T, WeatherError> {
        let status = response.status();

        if status.is_success() {
            let text = response.text().await?;
            serde_json::from_str(&text).map_err(|e| WeatherError::Parse(e.to_string()))
        } else if status == StatusCode::UNAUTHORIZED {
            Err(WeatherError::InvalidApiKey)
        } else if status == StatusCode::NOT_FOUND {
            Err(WeatherError::LocationNotFound(city.to_string()))
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(WeatherError::ApiError {
                status: status.as_u16(),
                message,
            })
        }
    }
}

impl WeatherSource for WeatherProvider {
    async fn fetch(&self, query: &WeatherQuery) -> Result<WeatherReading, WeatherError> {
        match query {
            WeatherQuery::Current { city } => self.current(city).await,
            WeatherQuery::ForecastNear { city, now, target } => {
                self.forecast_near(city, *now, *target).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use chrono::TimeZone;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(server: &MockServer) -> WeatherProvider {
        WeatherProvider::new(&server.uri(), "test_key", Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_current_weather() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .and(query_param("q", "Irvine,US"))
            .and(query_param("appid", "test_key"))
            .and(query_param("units", "imperial"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "weather": [{"id": 500, "main": "Rain", "description": "Light Rain"}],
                "main": {"temp": 67.6},
                "dt": 1760634000
            })))
            .mount(&mock_server)
            .await;

        let reading = provider(&mock_server).current("Irvine,US").await.unwrap();

        assert_eq!(reading.temperature_fahrenheit(), 68);
        assert_eq!(reading.description(), "light rain");
        assert_eq!(reading.observed_at(), DateTime::from_timestamp(1_760_634_000, 0));
    }

    #[tokio::test]
    async fn test_forecast_picks_slot_nearest_noon() {
        let mock_server = MockServer::start().await;

        // Noon PDT on 2026-10-19 is 19:00 UTC
        let at = |h| Utc.with_ymd_and_hms(2026, 10, 19, h, 0, 0).unwrap().timestamp();

        Mock::given(method("GET"))
            .and(path("/data/2.5/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "list": [
                    {"dt": at(15), "main": {"temp": 58.0}, "weather": [{"description": "mist"}]},
                    {"dt": at(18), "main": {"temp": 66.0}, "weather": [{"description": "overcast clouds"}]},
                    {"dt": at(21), "main": {"temp": 71.0}, "weather": [{"description": "clear sky"}]}
                ],
                "city": {"timezone": -25200}
            })))
            .mount(&mock_server)
            .await;

        let now = Utc.with_ymd_and_hms(2026, 10, 19, 14, 30, 0).unwrap();
        let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap();
        let reading = provider(&mock_server)
            .forecast_near("Irvine,US", now, noon)
            .await
            .unwrap();

        assert_eq!(reading.temperature_fahrenheit(), 66);
        assert_eq!(reading.description(), "overcast clouds");
    }

    #[tokio::test]
    async fn test_forecast_empty_list_is_parse_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "list": [],
                "city": {"timezone": 0}
            })))
            .mount(&mock_server)
            .await;

        let now = Utc.with_ymd_and_hms(2026, 10, 19, 14, 30, 0).unwrap();
        let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap();
        let result = provider(&mock_server).forecast_near("Irvine,US", now, noon).await;

        assert!(matches!(result, Err(WeatherError::Parse(_))));
    }

    #[tokio::test]
    async fn test_invalid_api_key() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&mock_server)
            .await;

        let result = provider(&mock_server).current("Irvine,US").await;
        assert!(matches!(result, Err(WeatherError::InvalidApiKey)));
    }

    #[tokio::test]
    async fn test_unknown_city() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let result = provider(&mock_server).current("Nowhere,ZZ").await;
        match result {
            Err(WeatherError::LocationNotFound(city)) => assert_eq!(city, "Nowhere,ZZ"),
            other => panic!("expected LocationNotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_server_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&mock_server)
            .await;

        let result = provider(&mock_server).current("Irvine,US").await;
        assert!(matches!(
            result,
            Err(WeatherError::ApiError { status: 500, ref message }) if message == "boom"
        ));
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&mock_server)
            .await;

        let result = provider(&mock_server).current("Irvine,US").await;
        assert!(matches!(result, Err(WeatherError::Parse(_))));
    }

    #[tokio::test]
    async fn test_request_times_out() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_delay(Duration::from_secs(2))
                    .set_body_json(serde_json::json!({
                        "weather": [{"description": "clear sky"}],
                        "main": {"temp": 70.0}
                    })),
            )
            .mount(&mock_server)
            .await;

        let provider =
            WeatherProvider::new(&mock_server.uri(), "test_key", Duration::from_millis(200))
                .unwrap();
        match provider.current("Irvine,US").await {
            Err(WeatherError::Network(e)) => assert!(e.is_timeout()),
            other => panic!("expected timeout, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_dispatches_on_query() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "weather": [{"description": "haze"}],
                "main": {"temp": 80.0}
            })))
            .mount(&mock_server)
            .await;

        let query = WeatherQuery::Current {
            city: "Irvine,US".into(),
        };
        let reading = provider(&mock_server).fetch(&query).await.unwrap();
        assert_eq!(reading.description(), "haze");
        assert_eq!(reading.observed_at(), None);
    }
}
