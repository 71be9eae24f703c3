//! Mail relay configuration loaded via OrthoConfig.
//!
//! Values come from `EMAIL_*` environment variables (or the matching CLI
//! flags and config file keys). Credentials are optional: without them the
//! server runs with the logging fixture sender.

use std::ffi::OsString;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::{EmailAddress, MailboxSettings};
use crate::outbound::mail::SmtpSettings;

const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
const IMPLICIT_TLS_PORT: u16 = 465;
const STARTTLS_PORT: u16 = 587;
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const FIXTURE_MAILBOX: &str = "portfolio@example.invalid";

/// SMTP account and routing configuration.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "EMAIL")]
pub struct MailSettings {
    /// SMTP account user; also the sender address.
    pub user: Option<String>,
    /// SMTP account password.
    pub pass: Option<String>,
    /// SMTP relay host.
    pub smtp_host: Option<String>,
    /// SMTP relay port.
    pub smtp_port: Option<u16>,
    /// Connect in plain text and upgrade with STARTTLS.
    #[ortho_config(default = false)]
    pub starttls: bool,
    /// Owner mailbox receiving contact messages.
    pub recipient: Option<String>,
    /// Per-command SMTP timeout in seconds.
    pub timeout_secs: Option<u64>,
    /// Subject line prefix for relayed messages.
    pub subject_prefix: Option<String>,
}

impl std::fmt::Debug for MailSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailSettings")
            .field("user", &self.user)
            .field("pass", &self.pass.as_ref().map(|_| "<redacted>"))
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("starttls", &self.starttls)
            .field("recipient", &self.recipient)
            .field("timeout_secs", &self.timeout_secs)
            .field("subject_prefix", &self.subject_prefix)
            .finish()
    }
}

/// Errors raised while turning [`MailSettings`] into adapter settings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MailSettingsError {
    /// A configured mailbox is not a valid email address.
    #[error("{name} is not a valid email address: '{value}'")]
    InvalidAddress {
        /// Setting that failed.
        name: &'static str,
        /// Offending value.
        value: String,
    },
}

/// Mail transport selected from configuration.
#[derive(Debug, Clone)]
pub enum MailTransportPlan {
    /// Deliver through the SMTP relay.
    Smtp {
        /// Relay connection parameters.
        smtp: SmtpSettings,
        /// Sender and owner mailboxes.
        mailboxes: MailboxSettings,
    },
    /// Log messages instead of delivering them.
    Fixture {
        /// Sender and owner mailboxes.
        mailboxes: MailboxSettings,
    },
}

impl MailSettings {
    /// Load settings from the environment and optional config file, ignoring
    /// process arguments.
    ///
    /// # Errors
    ///
    /// Returns an error message when a value cannot be parsed.
    pub fn from_env() -> Result<Self, String> {
        Self::load_from_iter([OsString::from("portfolio-backend")]).map_err(|err| err.to_string())
    }

    /// Relay host, falling back to Gmail.
    pub fn smtp_host(&self) -> &str {
        self.smtp_host
            .as_deref()
            .filter(|host| !host.trim().is_empty())
            .unwrap_or(DEFAULT_SMTP_HOST)
    }

    /// Relay port, falling back to the conventional port for the TLS mode.
    pub fn smtp_port(&self) -> u16 {
        self.smtp_port.unwrap_or(if self.starttls {
            STARTTLS_PORT
        } else {
            IMPLICIT_TLS_PORT
        })
    }

    /// Per-command SMTP timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS).max(1))
    }

    /// Account credentials when both user and password are present.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let user = self.user.as_deref().filter(|v| !v.trim().is_empty())?;
        let pass = self.pass.as_deref().filter(|v| !v.is_empty())?;
        Some((user, pass))
    }

    /// Choose SMTP delivery when credentials exist, otherwise the fixture.
    ///
    /// # Errors
    ///
    /// Returns [`MailSettingsError::InvalidAddress`] when the account user or
    /// recipient is not an email address.
    pub fn transport_plan(&self) -> Result<MailTransportPlan, MailSettingsError> {
        let Some((user, pass)) = self.credentials() else {
            let sender = parse_mailbox("EMAIL_USER", FIXTURE_MAILBOX)?;
            let recipient = match self.recipient.as_deref() {
                Some(value) => parse_mailbox("EMAIL_RECIPIENT", value)?,
                None => sender.clone(),
            };
            return Ok(MailTransportPlan::Fixture {
                mailboxes: self.mailboxes(sender, recipient),
            });
        };

        let sender = parse_mailbox("EMAIL_USER", user)?;
        let recipient = match self.recipient.as_deref() {
            Some(value) => parse_mailbox("EMAIL_RECIPIENT", value)?,
            None => sender.clone(),
        };
        Ok(MailTransportPlan::Smtp {
            smtp: SmtpSettings {
                host: self.smtp_host().to_owned(),
                port: self.smtp_port(),
                starttls: self.starttls,
                username: user.to_owned(),
                password: pass.to_owned(),
                timeout: self.timeout(),
            },
            mailboxes: self.mailboxes(sender, recipient),
        })
    }

    fn mailboxes(&self, sender: EmailAddress, recipient: EmailAddress) -> MailboxSettings {
        let mailboxes = MailboxSettings::new(sender, recipient);
        match self
            .subject_prefix
            .as_deref()
            .map(str::trim)
            .filter(|prefix| !prefix.is_empty())
        {
            Some(prefix) => mailboxes.with_subject_prefix(prefix),
            None => mailboxes,
        }
    }
}

fn parse_mailbox(name: &'static str, value: &str) -> Result<EmailAddress, MailSettingsError> {
    EmailAddress::parse(value.trim()).map_err(|_| MailSettingsError::InvalidAddress {
        name,
        value: value.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    //! Unit tests for mail configuration parsing.

    use super::*;
    use crate::domain::{ContactEmail, ContactSubmission};

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 8] = [
        "EMAIL_USER",
        "EMAIL_PASS",
        "EMAIL_SMTP_HOST",
        "EMAIL_SMTP_PORT",
        "EMAIL_STARTTLS",
        "EMAIL_RECIPIENT",
        "EMAIL_TIMEOUT_SECS",
        "EMAIL_SUBJECT_PREFIX",
    ];

    fn cleared() -> Vec<(&'static str, Option<String>)> {
        VARS.iter().map(|name| (*name, None)).collect()
    }

    fn with(overrides: &[(&'static str, &str)]) -> Vec<(&'static str, Option<String>)> {
        let mut vars = cleared();
        for (name, value) in overrides {
            if let Some(slot) = vars.iter_mut().find(|(key, _)| key == name) {
                slot.1 = Some((*value).to_owned());
            }
        }
        vars
    }

    fn load() -> MailSettings {
        MailSettings::from_env().expect("config should load")
    }

    #[rstest]
    fn defaults_select_fixture_transport() {
        let _guard = lock_env(cleared());

        let settings = load();
        assert_eq!(settings.smtp_host(), DEFAULT_SMTP_HOST);
        assert_eq!(settings.smtp_port(), IMPLICIT_TLS_PORT);
        assert_eq!(settings.timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert!(!settings.starttls);
        assert!(matches!(
            settings.transport_plan(),
            Ok(MailTransportPlan::Fixture { .. })
        ));
    }

    #[rstest]
    fn credentials_select_smtp_and_default_recipient_to_user() {
        let _guard = lock_env(with(&[
            ("EMAIL_USER", "relay@example.com"),
            ("EMAIL_PASS", "app-password"),
        ]));

        let plan = load().transport_plan().expect("valid plan");
        let MailTransportPlan::Smtp { smtp, mailboxes } = plan else {
            panic!("expected SMTP transport");
        };
        assert_eq!(smtp.host, DEFAULT_SMTP_HOST);
        assert_eq!(smtp.port, IMPLICIT_TLS_PORT);
        assert_eq!(smtp.username, "relay@example.com");
        assert_eq!(mailboxes.sender().as_str(), "relay@example.com");
        assert_eq!(mailboxes.recipient().as_str(), "relay@example.com");
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env(with(&[
            ("EMAIL_USER", "relay@example.com"),
            ("EMAIL_PASS", "app-password"),
            ("EMAIL_SMTP_HOST", "mail.example.net"),
            ("EMAIL_STARTTLS", "true"),
            ("EMAIL_RECIPIENT", "owner@example.com"),
            ("EMAIL_TIMEOUT_SECS", "5"),
        ]));

        let settings = load();
        assert_eq!(settings.smtp_port(), STARTTLS_PORT);
        let MailTransportPlan::Smtp { smtp, mailboxes } =
            settings.transport_plan().expect("valid plan")
        else {
            panic!("expected SMTP transport");
        };
        assert_eq!(smtp.host, "mail.example.net");
        assert!(smtp.starttls);
        assert_eq!(smtp.timeout, Duration::from_secs(5));
        assert_eq!(mailboxes.recipient().as_str(), "owner@example.com");
    }

    #[rstest]
    #[case(None, "Portfolio Contact: Hello")]
    #[case(Some("   "), "Portfolio Contact: Hello")]
    #[case(Some("Website"), "Website: Hello")]
    fn subject_prefix_reaches_composed_mail(
        #[case] prefix: Option<&str>,
        #[case] expected: &str,
    ) {
        let overrides: Vec<(&'static str, &str)> = prefix
            .map(|value| vec![("EMAIL_SUBJECT_PREFIX", value)])
            .unwrap_or_default();
        let _guard = lock_env(with(&overrides));

        let MailTransportPlan::Fixture { mailboxes } =
            load().transport_plan().expect("valid plan")
        else {
            panic!("expected fixture transport");
        };
        let submission =
            ContactSubmission::try_from_parts("Ada", "ada@example.org", Some("Hello"), "Hi")
                .expect("valid submission");
        let email = ContactEmail::compose(&submission, &mailboxes);
        assert_eq!(email.subject(), expected);
    }

    #[rstest]
    fn explicit_port_wins_over_tls_mode() {
        let _guard = lock_env(with(&[("EMAIL_SMTP_PORT", "2525"), ("EMAIL_STARTTLS", "true")]));
        assert_eq!(load().smtp_port(), 2525);
    }

    #[rstest]
    fn invalid_recipient_is_reported() {
        let _guard = lock_env(with(&[
            ("EMAIL_USER", "relay@example.com"),
            ("EMAIL_PASS", "app-password"),
            ("EMAIL_RECIPIENT", "owner"),
        ]));

        assert_eq!(
            load().transport_plan().map(|_| ()),
            Err(MailSettingsError::InvalidAddress {
                name: "EMAIL_RECIPIENT",
                value: "owner".to_owned(),
            })
        );
    }

    #[rstest]
    fn debug_output_redacts_password() {
        let _guard = lock_env(with(&[
            ("EMAIL_USER", "relay@example.com"),
            ("EMAIL_PASS", "hunter2"),
        ]));
        let rendered = format!("{:?}", load());
        assert!(!rendered.contains("hunter2"));
    }
}
