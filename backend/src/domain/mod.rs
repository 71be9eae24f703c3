//! Domain primitives, ports, and the relay service.
//!
//! Purpose: define the contact submission and the email composed from it,
//! plus the ports that keep HTTP and SMTP details out of the domain.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - ContactSubmission / EmailAddress: validated form input.
//! - ContactEmail / MailboxSettings: outbound message composition.
//! - ContactRelayService: relay use-case over a `MailSender` port.
//! - TraceId: request correlation identifier.

pub mod contact;
pub mod contact_relay_service;
pub mod error;
pub mod mail_message;
pub mod ports;
pub mod trace_id;

pub use self::contact::{
    ContactField, ContactSubmission, ContactValidationError, EmailAddress, INVALID_EMAIL_MESSAGE,
    MISSING_FIELDS_MESSAGE,
};
pub use self::contact_relay_service::ContactRelayService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::mail_message::{ContactEmail, Mailbox, MailboxSettings};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
