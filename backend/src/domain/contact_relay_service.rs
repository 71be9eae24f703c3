//! Mail relay service implementing the [`ContactRelay`] driving port.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

use crate::domain::ports::{ContactRelay, MailSender, MailSenderError, RelayReceipt};
use crate::domain::{ContactEmail, ContactSubmission, Error, MailboxSettings};

fn map_sender_error(err: &MailSenderError) -> Error {
    Error::internal(format!("mail delivery failed: {err}"))
}

/// Composes the notification email and hands it to a [`MailSender`].
pub struct ContactRelayService<M: ?Sized> {
    sender: Arc<M>,
    mailboxes: MailboxSettings,
}

impl<M: ?Sized> Clone for ContactRelayService<M> {
    fn clone(&self) -> Self {
        Self {
            sender: Arc::clone(&self.sender),
            mailboxes: self.mailboxes.clone(),
        }
    }
}

impl<M: ?Sized> ContactRelayService<M> {
    /// Create a relay delivering through `sender` with fixed addressing.
    pub fn new(sender: Arc<M>, mailboxes: MailboxSettings) -> Self {
        Self { sender, mailboxes }
    }
}

#[async_trait]
impl<M> ContactRelay for ContactRelayService<M>
where
    M: MailSender + ?Sized,
{
    async fn relay(&self, submission: ContactSubmission) -> Result<RelayReceipt, Error> {
        let email = ContactEmail::compose(&submission, &self.mailboxes);
        match self.sender.send(&email).await {
            Ok(receipt) => {
                info!(response = %receipt.response, "contact email sent");
                Ok(RelayReceipt {
                    provider_response: receipt.response,
                })
            }
            Err(err) => {
                error!(error = %err, "contact email delivery failed");
                Err(map_sender_error(&err))
            }
        }
    }
}
