//! Lettre-backed SMTP sender.
//!
//! This adapter owns transport details only: TLS mode selection, credentials,
//! timeouts, MIME assembly, and SMTP error mapping.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use lettre::message::{Mailbox as LettreMailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::response::Response;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::domain::ports::{DeliveryReceipt, MailSender, MailSenderError};
use crate::domain::{ContactEmail, Mailbox};

/// Connection parameters for the SMTP relay.
#[derive(Clone)]
pub struct SmtpSettings {
    /// Relay host name, e.g. `smtp.gmail.com`.
    pub host: String,
    /// Relay port.
    pub port: u16,
    /// Upgrade a plain connection with STARTTLS instead of connecting over
    /// implicit TLS.
    pub starttls: bool,
    /// Account used to authenticate and to send.
    pub username: String,
    /// Account password or app password.
    pub password: String,
    /// Socket timeout for each SMTP command.
    pub timeout: Duration,
}

impl fmt::Debug for SmtpSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("starttls", &self.starttls)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// SMTP adapter for the [`MailSender`] port.
pub struct SmtpMailSender {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    host: String,
}

impl SmtpMailSender {
    /// Build a pooled transport. No connection is opened until the first send
    /// or [`MailSender::verify`].
    ///
    /// # Errors
    ///
    /// Returns [`MailSenderError::Connection`] when the TLS parameters for
    /// `host` cannot be constructed.
    pub fn new(settings: SmtpSettings) -> Result<Self, MailSenderError> {
        let SmtpSettings {
            host,
            port,
            starttls,
            username,
            password,
            timeout,
        } = settings;
        let builder = if starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&host)
        }
        .map_err(|err| MailSenderError::connection(format!("invalid SMTP relay {host}: {err}")))?;

        let transport = builder
            .port(port)
            .credentials(Credentials::new(username, password))
            .timeout(Some(timeout))
            .build();
        Ok(Self { transport, host })
    }
}

#[async_trait]
impl MailSender for SmtpMailSender {
    async fn send(&self, email: &ContactEmail) -> Result<DeliveryReceipt, MailSenderError> {
        let message = build_message(email)?;
        let response = self
            .transport
            .send(message)
            .await
            .map_err(map_smtp_error)?;
        Ok(DeliveryReceipt::new(describe_response(&response)))
    }

    async fn verify(&self) -> Result<(), MailSenderError> {
        match self.transport.test_connection().await {
            Ok(true) => Ok(()),
            Ok(false) => Err(MailSenderError::connection(format!(
                "SMTP relay {} did not accept the connection",
                self.host
            ))),
            Err(err) => Err(map_smtp_error(err)),
        }
    }
}

fn build_message(email: &ContactEmail) -> Result<Message, MailSenderError> {
    Message::builder()
        .from(to_lettre_mailbox(email.from())?)
        .reply_to(to_lettre_mailbox(email.reply_to())?)
        .to(to_lettre_mailbox(email.to())?)
        .subject(email.subject())
        .multipart(MultiPart::alternative_plain_html(
            email.text_body().to_owned(),
            email.html_body().to_owned(),
        ))
        .map_err(|err| MailSenderError::invalid_message(err.to_string()))
}

fn to_lettre_mailbox(mailbox: &Mailbox) -> Result<LettreMailbox, MailSenderError> {
    let address: Address = mailbox.address().as_str().parse().map_err(|err| {
        MailSenderError::invalid_message(format!(
            "address {} is not deliverable: {err}",
            mailbox.address()
        ))
    })?;
    Ok(LettreMailbox::new(
        mailbox.name().map(str::to_owned),
        address,
    ))
}

fn map_smtp_error(err: lettre::transport::smtp::Error) -> MailSenderError {
    if err.is_permanent() || err.is_transient() {
        MailSenderError::rejected(err.to_string())
    } else {
        MailSenderError::connection(err.to_string())
    }
}

fn describe_response(response: &Response) -> String {
    match response.first_line() {
        Some(line) => format!("{} {line}", response.code()),
        None => response.code().to_string(),
    }
}
