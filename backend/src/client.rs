//! Contact form submission client.
//!
//! Mirrors the browser flow: validate locally, make a single POST to the
//! relay, and turn the outcome into a [`Notification`] for the user. Nothing
//! is retried; every call to [`ContactClient::submit`] is one user action.

use std::fmt;
use std::time::Duration;

use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::ContactSubmission;

/// Text shown when the relay cannot be reached or reports a failure.
pub const DELIVERY_FAILED_NOTICE: &str = "Sorry, your message could not be sent. Please check your internet connection or try again later.";

/// Text shown when the relay confirms delivery.
pub const DELIVERED_NOTICE: &str = "Message sent successfully!";

/// Values typed into the contact form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContactForm {
    /// Sender's name.
    pub name: String,
    /// Sender's reply address.
    pub email: String,
    /// Optional subject line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// Message body.
    pub message: String,
}

/// Severity of a [`Notification`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    /// The message was relayed.
    Success,
    /// Validation or delivery failed.
    Error,
}

/// User-facing outcome of a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Success or error styling.
    pub kind: NotificationKind,
    /// Text to display.
    pub text: String,
}

impl Notification {
    fn success(text: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            text: text.into(),
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            text: text.into(),
        }
    }

    /// Whether the submission was relayed.
    pub fn is_success(&self) -> bool {
        self.kind == NotificationKind::Success
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[derive(Deserialize)]
struct RelayReply {
    success: bool,
    #[serde(default)]
    message: Option<String>,
}

/// HTTP client for the relay endpoint.
pub struct ContactClient {
    client: Client,
    endpoint: Url,
}

impl ContactClient {
    /// Build a client posting to `endpoint`, e.g.
    /// `http://localhost:5000/api/contact`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint })
    }

    /// Endpoint this client posts to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Validate `form` and, when valid, relay it once.
    pub async fn submit(&self, form: &ContactForm) -> Notification {
        if let Err(err) = ContactSubmission::try_from_parts(
            &form.name,
            &form.email,
            form.subject.as_deref(),
            &form.message,
        ) {
            debug!(field = %err.field(), "contact form rejected locally");
            return Notification::error(err.user_message());
        }

        let response = match self
            .client
            .post(self.endpoint.clone())
            .json(form)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %err, endpoint = %self.endpoint, "contact relay unreachable");
                return Notification::error(DELIVERY_FAILED_NOTICE);
            }
        };

        let status = response.status();
        match response.json::<RelayReply>().await {
            Ok(reply) if status.is_success() && reply.success => {
                Notification::success(reply.message.unwrap_or_else(|| DELIVERED_NOTICE.to_owned()))
            }
            Ok(reply) => {
                warn!(%status, message = ?reply.message, "contact relay reported failure");
                Notification::error(DELIVERY_FAILED_NOTICE)
            }
            Err(err) => {
                warn!(%status, error = %err, "contact relay reply unreadable");
                Notification::error(DELIVERY_FAILED_NOTICE)
            }
        }
    }
}
