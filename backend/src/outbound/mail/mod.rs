//! Mail outbound adapters.
//!
//! This module provides the SMTP implementation of the `MailSender` port.

mod smtp;

pub use smtp::{SmtpMailSender, SmtpSettings};
