//! Outbound email composed from a contact submission.
//!
//! The relay never sends as the submitter: the message goes out from the
//! configured account, with the submitter set as `Reply-To` so the site owner
//! can answer directly.

use super::contact::{ContactSubmission, EmailAddress};

const DEFAULT_SUBJECT_PREFIX: &str = "Portfolio Contact";
const SENDER_SUFFIX: &str = "via Portfolio";

/// Display name plus address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mailbox {
    name: Option<String>,
    address: EmailAddress,
}

impl Mailbox {
    /// Build a mailbox with an optional display name.
    pub fn new(name: Option<String>, address: EmailAddress) -> Self {
        Self { name, address }
    }

    /// Display name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Address part.
    pub fn address(&self) -> &EmailAddress {
        &self.address
    }
}

/// Fixed addressing applied to every relayed message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailboxSettings {
    sender: EmailAddress,
    recipient: EmailAddress,
    subject_prefix: String,
}

impl MailboxSettings {
    /// Settings sending from `sender` to `recipient` with the default subject
    /// prefix.
    pub fn new(sender: EmailAddress, recipient: EmailAddress) -> Self {
        Self {
            sender,
            recipient,
            subject_prefix: DEFAULT_SUBJECT_PREFIX.to_owned(),
        }
    }

    /// Override the subject prefix.
    #[must_use]
    pub fn with_subject_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.subject_prefix = prefix.into();
        self
    }

    /// Account the relay authenticates as.
    pub fn sender(&self) -> &EmailAddress {
        &self.sender
    }

    /// Site owner's inbox.
    pub fn recipient(&self) -> &EmailAddress {
        &self.recipient
    }
}

/// Fully composed message ready for a [`MailSender`](super::ports::MailSender).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactEmail {
    from: Mailbox,
    reply_to: Mailbox,
    to: Mailbox,
    subject: String,
    text_body: String,
    html_body: String,
}

impl ContactEmail {
    /// Compose the notification email for `submission`.
    ///
    /// # Examples
    /// ```
    /// use portfolio_backend::domain::{ContactEmail, ContactSubmission, EmailAddress, MailboxSettings};
    ///
    /// let submission = ContactSubmission::try_from_parts(
    ///     "Ada", "ada@example.org", Some("Hello"), "Nice site!",
    /// ).expect("valid");
    /// let settings = MailboxSettings::new(
    ///     EmailAddress::parse("relay@example.com").expect("valid"),
    ///     EmailAddress::parse("owner@example.com").expect("valid"),
    /// );
    /// let email = ContactEmail::compose(&submission, &settings);
    /// assert_eq!(email.subject(), "Portfolio Contact: Hello");
    /// assert!(email.text_body().ends_with("Nice site!"));
    /// ```
    pub fn compose(submission: &ContactSubmission, settings: &MailboxSettings) -> Self {
        let name = submission.name();
        let email = submission.email();
        let subject = match submission.subject() {
            Some(subject) => format!("{}: {subject}", settings.subject_prefix),
            None => settings.subject_prefix.clone(),
        };
        let text_body = format!(
            "You have a new message from your portfolio:\n\nName: {name}\nEmail: {email}\n\nMessage:\n{}",
            submission.message()
        );

        Self {
            from: Mailbox::new(
                Some(format!("{name} {SENDER_SUFFIX}")),
                settings.sender.clone(),
            ),
            reply_to: Mailbox::new(Some(name.to_owned()), email.clone()),
            to: Mailbox::new(None, settings.recipient.clone()),
            subject,
            text_body,
            html_body: render_html(submission),
        }
    }

    /// Envelope sender.
    pub fn from(&self) -> &Mailbox {
        &self.from
    }

    /// Submitter, for replies.
    pub fn reply_to(&self) -> &Mailbox {
        &self.reply_to
    }

    /// Site owner.
    pub fn to(&self) -> &Mailbox {
        &self.to
    }

    /// Subject line.
    pub fn subject(&self) -> &str {
        self.subject.as_str()
    }

    /// Plain-text body containing the submission verbatim.
    pub fn text_body(&self) -> &str {
        self.text_body.as_str()
    }

    /// HTML alternative with escaped submission values.
    pub fn html_body(&self) -> &str {
        self.html_body.as_str()
    }
}

fn render_html(submission: &ContactSubmission) -> String {
    let name = escape_html(submission.name());
    let email = escape_html(submission.email().as_str());
    let subject = escape_html(submission.subject().unwrap_or("(none)"));
    let message = escape_html(submission.message());
    format!(
        concat!(
            r#"<div style="font-family: Arial, sans-serif; padding: 20px; border: 1px solid #6366f1; border-radius: 10px;">"#,
            r#"<h2 style="color: #6366f1;">New Contact Form Submission</h2>"#,
            "<p><strong>Name:</strong> {name}</p>",
            "<p><strong>Email:</strong> {email}</p>",
            "<p><strong>Subject:</strong> {subject}</p>",
            r#"<hr style="border: 0; border-top: 1px solid #334155;">"#,
            r#"<p style="white-space: pre-wrap;">{message}</p>"#,
            "</div>"
        ),
        name = name,
        email = email,
        subject = subject,
        message = message,
    )
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}
