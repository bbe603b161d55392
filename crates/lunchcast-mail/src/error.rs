//! Mail-specific error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MailError {
    #[error("Authentication required")]
    AuthRequired,

    #[error("Token expired")]
    TokenExpired,

    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    #[error("Invalid message: {0}")]
    InvalidMessage(String),

    #[error("Send failed: {0}")]
    SendFailed(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),
}

impl MailError {
    /// Operator-facing message for logs.
    pub fn user_message(&self) -> String {
        match self {
            Self::AuthRequired => "The mail account refused access. Check the token scopes.".to_string(),
            Self::TokenExpired => "The Gmail access token has expired. Provide a fresh one.".to_string(),
            Self::RateLimited(secs) => format!("Too many requests. Please wait {} seconds.", secs),
            Self::InvalidMessage(msg) => format!("Email was not sent: {}", msg),
            Self::SendFailed(msg) => format!("Failed to send email: {}", msg),
            Self::NetworkError(_) => "Network error. Check your connection.".to_string(),
        }
    }
}
