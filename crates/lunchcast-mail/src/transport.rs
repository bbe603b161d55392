use serde::Deserialize;
use std::future::Future;

use crate::error::MailError;
use crate::message::OutgoingMail;

/// Identifiers the provider assigned to a delivered message.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentMessage {
    pub id: String,
    #[serde(default)]
    pub thread_id: String,
}

/// Hands a finished message to a mail provider.
pub trait MailTransport {
    fn send(&self, mail: &OutgoingMail)
        -> impl Future<Output = Result<SentMessage, MailError>> + Send;
}
