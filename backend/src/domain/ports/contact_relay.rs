//! Driving port for relaying contact submissions.
//!
//! HTTP handlers call [`ContactRelay`] without knowing which mail provider,
//! if any, sits behind it.

use async_trait::async_trait;

use crate::domain::{ContactSubmission, Error};

/// Outcome of a relayed submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayReceipt {
    /// Provider acknowledgement for the delivered message.
    pub provider_response: String,
}

/// Domain use-case port for the mail relay.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContactRelay: Send + Sync {
    /// Forward `submission` to the site owner as an email.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] with `InternalError` when delivery fails. Delivery is
    /// attempted once; callers decide whether to resubmit.
    async fn relay(&self, submission: ContactSubmission) -> Result<RelayReceipt, Error>;
}
