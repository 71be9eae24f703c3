//! Mail sender selection from configuration.

use std::sync::Arc;

use tracing::{error, info, warn};

use portfolio_backend::domain::MailboxSettings;
use portfolio_backend::domain::ports::{FixtureMailSender, MailSender};
use portfolio_backend::inbound::http::health::MailTransportKind;
use portfolio_backend::outbound::mail::SmtpMailSender;
use portfolio_backend::settings::{MailSettings, MailTransportPlan};

/// Sender, mailboxes and transport label chosen at startup.
pub struct MailerWiring {
    /// Sender the relay service delivers through.
    pub sender: Arc<dyn MailSender>,
    /// Relay account and owner mailboxes.
    pub mailboxes: MailboxSettings,
    /// Label reported by the readiness probe.
    pub kind: MailTransportKind,
}

/// Build the SMTP sender when credentials are configured, otherwise the
/// logging fixture.
///
/// # Errors
/// Returns [`std::io::Error`] when a configured address is invalid or the
/// SMTP transport cannot be constructed.
pub fn build_mailer(settings: &MailSettings) -> std::io::Result<MailerWiring> {
    let plan = settings.transport_plan().map_err(std::io::Error::other)?;
    match plan {
        MailTransportPlan::Smtp { smtp, mailboxes } => {
            info!(
                host = %smtp.host,
                port = smtp.port,
                starttls = smtp.starttls,
                recipient = %mailboxes.recipient(),
                "using SMTP mail transport"
            );
            let sender = SmtpMailSender::new(smtp).map_err(std::io::Error::other)?;
            Ok(MailerWiring {
                sender: Arc::new(sender),
                mailboxes,
                kind: MailTransportKind::Smtp,
            })
        }
        MailTransportPlan::Fixture { mailboxes } => {
            warn!("EMAIL_USER or EMAIL_PASS not set; contact messages will only be logged");
            Ok(MailerWiring {
                sender: Arc::new(FixtureMailSender),
                mailboxes,
                kind: MailTransportKind::Fixture,
            })
        }
    }
}

/// Check the mail provider connection without blocking startup.
pub async fn verify_mailer(sender: Arc<dyn MailSender>) {
    match sender.verify().await {
        Ok(()) => info!("mail transport ready"),
        Err(err) => error!(error = %err, "mail transport verification failed"),
    }
}
