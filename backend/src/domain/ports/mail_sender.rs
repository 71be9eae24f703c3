//! Driven port for handing a composed email to a mail provider.
//!
//! The relay service only knows this trait; the SMTP adapter lives in
//! `outbound::mail`. Tests substitute a recording double or the
//! [`FixtureMailSender`].

use async_trait::async_trait;
use tracing::info;

use crate::domain::ContactEmail;

/// Errors raised while delivering mail.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MailSenderError {
    /// The provider could not be reached or the session failed mid-way.
    #[error("mail provider connection failed: {message}")]
    Connection {
        /// Provider or transport diagnostic.
        message: String,
    },
    /// The provider answered but refused the message.
    #[error("mail provider rejected the message: {message}")]
    Rejected {
        /// Provider response text.
        message: String,
    },
    /// The message could not be encoded for the provider.
    #[error("message could not be built: {message}")]
    InvalidMessage {
        /// Builder diagnostic.
        message: String,
    },
}

impl MailSenderError {
    /// Build a [`MailSenderError::Connection`].
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Build a [`MailSenderError::Rejected`].
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }

    /// Build a [`MailSenderError::InvalidMessage`].
    pub fn invalid_message(message: impl Into<String>) -> Self {
        Self::InvalidMessage {
            message: message.into(),
        }
    }
}

/// Provider acknowledgement for an accepted message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReceipt {
    /// Provider response line, e.g. `250 2.0.0 OK`.
    pub response: String,
}

impl DeliveryReceipt {
    /// Wrap a provider response line.
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
        }
    }
}

/// Port for delivering composed contact emails.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MailSender: Send + Sync {
    /// Deliver `email`. Implementations make exactly one delivery attempt.
    async fn send(&self, email: &ContactEmail) -> Result<DeliveryReceipt, MailSenderError>;

    /// Check that the provider is reachable and accepts the credentials.
    async fn verify(&self) -> Result<(), MailSenderError>;
}

/// Development sender that logs messages instead of delivering them.
///
/// Used when no SMTP credentials are configured so the site can be exercised
/// locally end to end.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureMailSender;

#[async_trait]
impl MailSender for FixtureMailSender {
    async fn send(&self, email: &ContactEmail) -> Result<DeliveryReceipt, MailSenderError> {
        info!(
            to = %email.to().address(),
            reply_to = %email.reply_to().address(),
            subject = email.subject(),
            "fixture mail sender accepted message"
        );
        Ok(DeliveryReceipt::new("250 fixture accepted"))
    }

    async fn verify(&self) -> Result<(), MailSenderError> {
        Ok(())
    }
}
