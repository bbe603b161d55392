//! Mail delivery for lunchcast.
//!
//! Builds a plain-text RFC 2822 message and sends it through the Gmail API.

pub mod client;
pub mod error;
pub mod message;
pub mod transport;

pub use client::GmailClient;
pub use error::MailError;
pub use message::OutgoingMail;
pub use transport::{MailTransport, SentMessage};
