//! Submit a contact message to a running relay, the way the site's form does.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{Context, Result};
use portfolio_backend::client::{ContactClient, ContactForm};
use reqwest::Url;
use tokio::runtime::Builder;

/// `send-contact` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "send-contact",
    about = "Send a contact form submission to the portfolio mail relay",
    version
)]
struct CliArgs {
    /// Relay endpoint.
    #[arg(
        long,
        value_name = "url",
        default_value = "http://localhost:5000/api/contact"
    )]
    endpoint: Url,
    /// Sender's name.
    #[arg(long, default_value = "")]
    name: String,
    /// Sender's reply address.
    #[arg(long, default_value = "")]
    email: String,
    /// Optional subject line.
    #[arg(long)]
    subject: Option<String>,
    /// Message body.
    #[arg(long, default_value = "")]
    message: String,
    /// Request timeout in seconds.
    #[arg(long, value_name = "secs", default_value_t = 30)]
    timeout: u64,
}

fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    let args = CliArgs::parse();

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("create Tokio runtime")?;

    let client = ContactClient::new(args.endpoint, Duration::from_secs(args.timeout))
        .wrap_err("build HTTP client")?;
    let form = ContactForm {
        name: args.name,
        email: args.email,
        subject: args.subject,
        message: args.message,
    };

    let notification = runtime.block_on(client.submit(&form));
    if notification.is_success() {
        println!("{notification}");
        Ok(ExitCode::SUCCESS)
    } else {
        eprintln!("{notification}");
        Ok(ExitCode::FAILURE)
    }
}
