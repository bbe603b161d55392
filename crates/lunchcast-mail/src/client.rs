//! Gmail API send client.

use std::time::Duration;
use tracing::instrument;

use crate::error::MailError;
use crate::message::OutgoingMail;
use crate::transport::{MailTransport, SentMessage};

const GMAIL_API_BASE: &str = "https://gmail.googleapis.com";
const SEND_TIMEOUT_SECS: u64 = 30;

pub struct GmailClient {
    client: reqwest::Client,
    access_token: String,
    base_url: String,
}

impl GmailClient {
    pub fn new(access_token: &str) -> Result<Self, MailError> {
        Self::with_base_url(access_token, GMAIL_API_BASE)
    }

    /// Point the client at another API host (used by tests).
    pub fn with_base_url(access_token: &str, base_url: &str) -> Result<Self, MailError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(SEND_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            access_token: access_token.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn auth_header(&self) -> String {
        format!("Bearer {}", self.access_token)
    }

    /// Send a plain-text message as the authenticated user.
    #[instrument(skip(self, mail), fields(from = %mail.from(), to = %mail.to().join(", ")), level = "info")]
    pub async fn send_message(&self, mail: &OutgoingMail) -> Result<SentMessage, MailError> {
        let url = format!("{}/gmail/v1/users/me/messages/send", self.base_url);

        let request_body = serde_json::json!({
            "raw": mail.encode_raw(),
        });

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.auth_header())
            .json(&request_body)
            .send()
            .await?;

        self.handle_response(response).await
    }

    async fn handle_response(&self, response: reqwest::Response) -> Result<SentMessage, MailError> {
        let status = response.status();

        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| MailError::SendFailed(format!("JSON parse error: {}", e)))
        } else if status.as_u16() == 401 {
            Err(MailError::TokenExpired)
        } else if status.as_u16() == 403 {
            Err(MailError::AuthRequired)
        } else if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            Err(MailError::RateLimited(retry_after))
        } else {
            let text = response.text().await.unwrap_or_default();
            Err(MailError::SendFailed(format!("{}: {}", status, text)))
        }
    }
}

impl MailTransport for GmailClient {
    async fn send(&self, mail: &OutgoingMail) -> Result<SentMessage, MailError> {
        self.send_message(mail).await
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use base64::Engine;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn mail() -> OutgoingMail {
        OutgoingMail::new(
            "bot@example.com",
            &["team@example.com".to_string()],
            "Lunch suggestion for Monday, October 19: Pasta",
            "Lunch: Pasta\n",
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_send_message() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/gmail/v1/users/me/messages/send"))
            .and(header("Authorization", "Bearer test_token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "msg1",
                "threadId": "thread1",
                "labelIds": ["SENT"]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = GmailClient::with_base_url("test_token", &mock_server.uri()).unwrap();
        let sent = client.send(&mail()).await.unwrap();

        assert_eq!(sent.id, "msg1");
        assert_eq!(sent.thread_id, "thread1");
    }

    #[tokio::test]
    async fn test_send_body_carries_encoded_message() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/gmail/v1/users/me/messages/send"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "msg2"
            })))
            .mount(&mock_server)
            .await;

        let client = GmailClient::with_base_url("test_token", &mock_server.uri()).unwrap();
        client.send(&mail()).await.unwrap();

        let requests = mock_server.received_requests().await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        let raw = base64::engine::general_purpose::URL_SAFE_NO_PAD
            .decode(body["raw"].as_str().unwrap())
            .unwrap();
        let raw = String::from_utf8(raw).unwrap();

        assert!(raw.contains("To: team@example.com\r\n"));
        assert!(raw.ends_with("Lunch: Pasta\r\n"));
    }

    #[tokio::test]
    async fn test_token_expired_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/gmail/v1/users/me/messages/send"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&mock_server)
            .await;

        let client = GmailClient::with_base_url("expired_token", &mock_server.uri()).unwrap();
        let result = client.send(&mail()).await;

        assert!(matches!(result, Err(MailError::TokenExpired)));
    }

    #[tokio::test]
    async fn test_forbidden() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/gmail/v1/users/me/messages/send"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&mock_server)
            .await;

        let client = GmailClient::with_base_url("token", &mock_server.uri()).unwrap();
        let result = client.send(&mail()).await;

        assert!(matches!(result, Err(MailError::AuthRequired)));
    }

    #[tokio::test]
    async fn test_rate_limited() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/gmail/v1/users/me/messages/send"))
            .respond_with(ResponseTemplate::new(429).append_header("Retry-After", "30"))
            .mount(&mock_server)
            .await;

        let client = GmailClient::with_base_url("token", &mock_server.uri()).unwrap();
        let result = client.send(&mail()).await;

        assert!(matches!(result, Err(MailError::RateLimited(30))));
    }

    #[tokio::test]
    async fn test_not_found_is_send_failure() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/gmail/v1/users/me/messages/send"))
            .respond_with(ResponseTemplate::new(404).set_body_string("user not found"))
            .mount(&mock_server)
            .await;

        let client = GmailClient::with_base_url("token", &mock_server.uri()).unwrap();
        let result = client.send(&mail()).await;

        match result {
            Err(MailError::SendFailed(msg)) => {
                assert!(msg.starts_with("404"));
                assert!(msg.contains("user not found"));
            }
            other => panic!("expected SendFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_server_error_is_send_failure() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/gmail/v1/users/me/messages/send"))
            .respond_with(ResponseTemplate::new(500).set_body_string("backend error"))
            .mount(&mock_server)
            .await;

        let client = GmailClient::with_base_url("token", &mock_server.uri()).unwrap();
        let result = client.send(&mail()).await;

        match result {
            Err(MailError::SendFailed(msg)) => assert!(msg.contains("backend error")),
            other => panic!("expected SendFailed, got {:?}", other),
        }
    }
}
