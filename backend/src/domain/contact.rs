//! Contact submissions received from the portfolio's contact form.
//!
//! A [`ContactSubmission`] is the validated name/email/subject/message tuple
//! that the relay turns into an email. It lives for a single request and is
//! never stored. The same validation runs in the client before any network
//! call and again on the server before anything is sent.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Message shown when a required field is empty.
pub const MISSING_FIELDS_MESSAGE: &str = "Please fill in all fields.";
/// Message shown when the email address is malformed.
pub const INVALID_EMAIL_MESSAGE: &str = "Please enter a valid email address.";

static EMAIL_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    // One local part, one domain part containing a dot, no whitespace.
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
});

/// Required fields of a contact submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactField {
    /// Sender's display name.
    Name,
    /// Sender's reply address.
    Email,
    /// Free-form message body.
    Message,
}

impl ContactField {
    /// Wire name of the field, as used in form and JSON payloads.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Message => "message",
        }
    }
}

impl std::fmt::Display for ContactField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reasons a contact submission is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ContactValidationError {
    /// A required field was empty or whitespace only.
    #[error("missing required field: {0}")]
    MissingField(ContactField),
    /// The email address is not a deliverable `local@domain.tld` address.
    #[error("email address is malformed")]
    InvalidEmail,
}

impl ContactValidationError {
    /// Notification text shown to the person filling in the form.
    pub const fn user_message(self) -> &'static str {
        match self {
            Self::MissingField(_) => MISSING_FIELDS_MESSAGE,
            Self::InvalidEmail => INVALID_EMAIL_MESSAGE,
        }
    }

    /// Field the failure relates to.
    pub const fn field(self) -> ContactField {
        match self {
            Self::MissingField(field) => field,
            Self::InvalidEmail => ContactField::Email,
        }
    }

    /// Stable machine-readable failure code.
    pub const fn code(self) -> &'static str {
        match self {
            Self::MissingField(_) => "missing_field",
            Self::InvalidEmail => "invalid_email",
        }
    }
}

/// Syntactically valid email address.
///
/// # Examples
/// ```
/// use portfolio_backend::domain::EmailAddress;
///
/// assert!(EmailAddress::parse("ada@example.org").is_ok());
/// assert!(EmailAddress::parse("ada@example").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and wrap an address.
    ///
    /// The address must have a `local@domain.tld` shape and also be
    /// deliverable as an SMTP envelope address, so anything accepted here
    /// can be handed to the mail transport.
    pub fn parse(raw: &str) -> Result<Self, ContactValidationError> {
        if EMAIL_SHAPE.is_match(raw) && raw.parse::<lettre::Address>().is_ok() {
            Ok(Self(raw.to_owned()))
        } else {
            Err(ContactValidationError::InvalidEmail)
        }
    }

    /// Borrow the address text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validated contact-form submission.
///
/// ## Invariants
/// - `name` and `message` contain non-whitespace text.
/// - `email` satisfies [`EmailAddress::parse`].
/// - `subject`, when present, contains non-whitespace text.
///
/// Field contents are kept exactly as submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    name: String,
    email: EmailAddress,
    subject: Option<String>,
    message: String,
}

impl ContactSubmission {
    /// Validate raw form fields.
    ///
    /// Missing fields are reported before a malformed email, matching the
    /// order in which the form surfaces them.
    ///
    /// # Examples
    /// ```
    /// use portfolio_backend::domain::{ContactField, ContactSubmission, ContactValidationError};
    ///
    /// let ok = ContactSubmission::try_from_parts("Ada", "ada@example.org", None, "Hello");
    /// assert!(ok.is_ok());
    ///
    /// let missing = ContactSubmission::try_from_parts("Ada", "ada@example.org", None, "  ");
    /// assert_eq!(
    ///     missing,
    ///     Err(ContactValidationError::MissingField(ContactField::Message))
    /// );
    /// ```
    pub fn try_from_parts(
        name: &str,
        email: &str,
        subject: Option<&str>,
        message: &str,
    ) -> Result<Self, ContactValidationError> {
        require(name, ContactField::Name)?;
        require(email, ContactField::Email)?;
        require(message, ContactField::Message)?;
        let email = EmailAddress::parse(email)?;
        let subject = subject
            .filter(|value| !value.trim().is_empty())
            .map(str::to_owned);

        Ok(Self {
            name: name.to_owned(),
            email,
            subject,
            message: message.to_owned(),
        })
    }

    /// Sender's name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Sender's reply address.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Optional subject line.
    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    /// Message body.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

fn require(value: &str, field: ContactField) -> Result<(), ContactValidationError> {
    if value.trim().is_empty() {
        Err(ContactValidationError::MissingField(field))
    } else {
        Ok(())
    }
}
