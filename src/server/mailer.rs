//! Outbound notification delivery.
//!
//! SMTP is not wired. `Mailer::send` records each message as a structured log line, and
//! an optional tap receives a copy so callers in tests can read what was sent.

use serde_json::Value;
use tokio::sync::mpsc::UnboundedSender;

use crate::server::error::AppError;

/// One rendered message.
#[derive(Debug, Clone, PartialEq)]
pub struct Email {
    pub from: String,
    pub to: String,
    pub template: String,
    pub data: Value,
}

#[derive(Clone)]
pub struct Mailer {
    sender: String,
    tap: Option<UnboundedSender<Email>>,
}

impl Mailer {
    pub fn new(sender: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            tap: None,
        }
    }

    /// Copies every sent message into `tap`.
    #[cfg(test)]
    pub fn with_tap(mut self, tap: UnboundedSender<Email>) -> Self {
        self.tap = Some(tap);
        self
    }

    /// Delivers `template` rendered with `data` to `recipient`.
    ///
    /// Only called from background tasks; a failure here never reaches a client.
    pub async fn send(&self, recipient: &str, template: &str, data: Value) -> Result<(), AppError> {
        let email = Email {
            from: self.sender.clone(),
            to: recipient.to_string(),
            template: template.to_string(),
            data,
        };

        tracing::info!(
            from = %email.from,
            to = %email.to,
            template = %email.template,
            "email sent"
        );

        if let Some(tap) = &self.tap {
            // The receiving end may be gone; delivery itself already happened.
            let _ = tap.send(email);
        }

        Ok(())
    }
}
