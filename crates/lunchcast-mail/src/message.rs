use base64::Engine;

use crate::error::MailError;

/// A validated plain-text email ready to hand to a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    from: String,
    to: Vec<String>,
    subject: String,
    body: String,
}

fn has_line_break(value: &str) -> bool {
    value.contains('\r') || value.contains('\n')
}

impl OutgoingMail {
    /// Rejects empty sender/recipient lists and header values containing line
    /// breaks, which would otherwise inject extra headers.
    pub fn new(
        from: &str,
        to: &[String],
        subject: &str,
        body: &str,
    ) -> Result<Self, MailError> {
        let from = from.trim();
        if from.is_empty() {
            return Err(MailError::InvalidMessage("no sender".to_string()));
        }

        let to: Vec<String> = to
            .iter()
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .collect();
        if to.is_empty() {
            return Err(MailError::InvalidMessage("no recipients".to_string()));
        }

        if has_line_break(from) || has_line_break(subject) || to.iter().any(|r| has_line_break(r)) {
            return Err(MailError::InvalidMessage(
                "header values must not contain line breaks".to_string(),
            ));
        }

        Ok(Self {
            from: from.to_string(),
            to,
            subject: subject.to_string(),
            body: body.to_string(),
        })
    }

    pub fn from(&self) -> &str {
        &self.from
    }

    pub fn to(&self) -> &[String] {
        &self.to
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Render as an RFC 2822 message with CRLF line endings.
    pub fn to_rfc2822(&self) -> String {
        let subject = if self.subject.is_ascii() {
            self.subject.clone()
        } else {
            // RFC 2047 encoded-word
            format!(
                "=?UTF-8?B?{}?=",
                base64::engine::general_purpose::STANDARD.encode(self.subject.as_bytes())
            )
        };

        let headers = format!(
            "From: {}\r\nTo: {}\r\nSubject: {}\r\nMIME-Version: 1.0\r\nContent-Type: text/plain; charset=utf-8\r\nContent-Transfer-Encoding: 8bit\r\n",
            self.from,
            self.to.join(", "),
            subject
        );

        let body = self.body.replace("\r\n", "\n").replace('\n', "\r\n");
        format!("{}\r\n{}", headers, body)
    }

    /// URL-safe base64 of the full message, the form Gmail's `raw` field expects.
    pub fn encode_raw(&self) -> String {
        base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(self.to_rfc2822().as_bytes())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    fn recipients(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_rfc2822_layout() {
        let mail = OutgoingMail::new(
            "bot@example.com",
            &recipients(&["a@example.com", " b@example.com "]),
            "Lunch suggestion for Monday, October 19: Pasta",
            "Weather for Irvine,US: 68°F, mist\nLunch: Pasta\n",
        )
        .unwrap();

        let raw = mail.to_rfc2822();
        assert!(raw.starts_with("From: bot@example.com\r\nTo: a@example.com, b@example.com\r\n"));
        assert!(raw.contains("Subject: Lunch suggestion for Monday, October 19: Pasta\r\n"));
        assert!(raw.contains("Content-Type: text/plain; charset=utf-8\r\n"));
        assert!(raw.ends_with("\r\n\r\nWeather for Irvine,US: 68°F, mist\r\nLunch: Pasta\r\n"));
    }

    #[test]
    fn test_non_ascii_subject_is_encoded() {
        let mail = OutgoingMail::new("a@x.com", &recipients(&["b@x.com"]), "68°F", "").unwrap();
        assert!(mail.to_rfc2822().contains("Subject: =?UTF-8?B?"));
    }

    #[test]
    fn test_encode_raw_round_trips() {
        let mail = OutgoingMail::new("a@x.com", &recipients(&["b@x.com"]), "Hi", "Body").unwrap();
        let decoded = base64::engine::general_purpose::URL_SAFE_NO_PAD
            .decode(mail.encode_raw())
            .unwrap();
        assert_eq!(String::from_utf8(decoded).unwrap(), mail.to_rfc2822());
    }

    #[test]
    fn test_accessors_return_trimmed_values() {
        let mail = OutgoingMail::new(" a@x.com ", &recipients(&["b@x.com"]), "Hi", "Body").unwrap();
        assert_eq!(mail.from(), "a@x.com");
        assert_eq!(mail.to(), ["b@x.com"]);
        assert_eq!(mail.subject(), "Hi");
        assert_eq!(mail.body(), "Body");
    }

    #[test]
    fn test_rejects_missing_recipients() {
        let result = OutgoingMail::new("a@x.com", &recipients(&["", "  "]), "Hi", "Body");
        assert!(matches!(result, Err(MailError::InvalidMessage(_))));
    }

    #[test]
    fn test_rejects_missing_sender() {
        let result = OutgoingMail::new(" ", &recipients(&["b@x.com"]), "Hi", "Body");
        assert!(matches!(result, Err(MailError::InvalidMessage(_))));
    }

    #[test]
    fn test_rejects_header_injection() {
        let result = OutgoingMail::new(
            "a@x.com",
            &recipients(&["b@x.com"]),
            "Hi\r\nBcc: evil@x.com",
            "Body",
        );
        assert!(matches!(result, Err(MailError::InvalidMessage(_))));
    }
}
