//! Outgoing mail.
//!
//! Callers depend on the [`MailSender`] trait; production wiring uses
//! [`SmtpMailSender`], tests use [`MemoryMailSender`].

use std::sync::Mutex;

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use secrecy::ExposeSecret;
use tracing::debug;

use crate::config::MailSettings;

/// Mail delivery errors.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("No recipients given")]
    NoRecipients,

    #[error("Invalid address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("Failed to build message: {0}")]
    Build(String),

    #[error("SMTP transport error: {0}")]
    Transport(String),

    #[error("{0}")]
    Rejected(String),
}

/// Capability to send a plain-text mail to one or more recipients.
#[async_trait]
pub trait MailSender: Send + Sync {
    async fn send_mail(&self, to: &[String], subject: &str, body: &str) -> Result<(), MailError>;
}

fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
    address
        .parse::<Mailbox>()
        .map_err(|e| MailError::InvalidAddress {
            address: address.to_string(),
            reason: e.to_string(),
        })
}

/// SMTP-backed sender.
pub struct SmtpMailSender {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailSender {
    /// Build a sender from settings.
    ///
    /// With `use_tls` off the connection is plain SMTP with no encryption.
    pub fn new(settings: &MailSettings) -> Result<Self, MailError> {
        let mut builder = if settings.use_tls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
                .map_err(|e| MailError::Transport(e.to_string()))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&settings.host)
        };

        builder = builder.port(settings.port);

        if !settings.username.is_empty() {
            builder = builder.credentials(Credentials::new(
                settings.username.clone(),
                settings.password.expose_secret().to_string(),
            ));
        }

        Ok(Self {
            transport: builder.build(),
            from: parse_mailbox(&settings.from)?,
        })
    }
}

#[async_trait]
impl MailSender for SmtpMailSender {
    async fn send_mail(&self, to: &[String], subject: &str, body: &str) -> Result<(), MailError> {
        if to.is_empty() {
            return Err(MailError::NoRecipients);
        }

        let mut builder = Message::builder()
            .from(self.from.clone())
            .subject(subject)
            .header(ContentType::TEXT_PLAIN);
        for recipient in to {
            builder = builder.to(parse_mailbox(recipient)?);
        }

        let message = builder
            .body(body.to_string())
            .map_err(|e| MailError::Build(e.to_string()))?;

        let response = self
            .transport
            .send(message)
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        debug!(
            recipients = to.len(),
            code = %response.code(),
            "Mail accepted by relay"
        );

        Ok(())
    }
}

/// A message captured by [`MemoryMailSender`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMail {
    pub to: Vec<String>,
    pub subject: String,
    pub body: String,
}

/// In-memory sender that records every message instead of delivering it.
#[derive(Debug, Default)]
pub struct MemoryMailSender {
    sent: Mutex<Vec<SentMail>>,
    failure: Option<String>,
}

impl MemoryMailSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sender whose every delivery fails with the given message.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failure: Some(reason.into()),
        }
    }

    /// Snapshot of all recorded messages.
    pub fn sent(&self) -> Vec<SentMail> {
        self.sent
            .lock()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl MailSender for MemoryMailSender {
    async fn send_mail(&self, to: &[String], subject: &str, body: &str) -> Result<(), MailError> {
        if to.is_empty() {
            return Err(MailError::NoRecipients);
        }
        if let Some(reason) = &self.failure {
            return Err(MailError::Rejected(reason.clone()));
        }

        let mail = SentMail {
            to: to.to_vec(),
            subject: subject.to_string(),
            body: body.to_string(),
        };
        self.sent
            .lock()
            .map_err(|_| MailError::Rejected("mail recorder poisoned".to_string()))?
            .push(mail);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn settings(use_tls: bool) -> MailSettings {
        MailSettings {
            host: "localhost".to_string(),
            port: 1025,
            username: "bot@example.com".to_string(),
            password: SecretString::from("pw".to_string()),
            from: "bot@example.com".to_string(),
            use_tls,
        }
    }

    #[tokio::test]
    async fn test_memory_sender_records_messages() {
        let sender = MemoryMailSender::new();
        sender
            .send_mail(&["a@example.com".to_string()], "Hello", "Body")
            .await
            .unwrap();

        let sent = sender.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, vec!["a@example.com".to_string()]);
        assert_eq!(sent[0].subject, "Hello");
        assert_eq!(sent[0].body, "Body");
    }

    #[tokio::test]
    async fn test_memory_sender_failure_records_nothing() {
        let sender = MemoryMailSender::failing("relay down");
        let result = sender
            .send_mail(&["a@example.com".to_string()], "Hello", "Body")
            .await;

        assert!(matches!(result, Err(MailError::Rejected(_))));
        assert!(sender.sent().is_empty());
    }

    #[tokio::test]
    async fn test_empty_recipients_rejected() {
        let sender = MemoryMailSender::new();
        let result = sender.send_mail(&[], "Hello", "Body").await;
        assert!(matches!(result, Err(MailError::NoRecipients)));
    }

    #[tokio::test]
    async fn test_smtp_sender_rejects_bad_recipient_before_connecting() {
        let sender = SmtpMailSender::new(&settings(false)).unwrap();
        let result = sender
            .send_mail(&["not an address".to_string()], "Hello", "Body")
            .await;

        assert!(matches!(result, Err(MailError::InvalidAddress { .. })));
    }

    #[test]
    fn test_smtp_sender_rejects_bad_from() {
        let mut bad = settings(false);
        bad.from = "nope".to_string();
        assert!(matches!(
            SmtpMailSender::new(&bad),
            Err(MailError::InvalidAddress { .. })
        ));
    }
}
