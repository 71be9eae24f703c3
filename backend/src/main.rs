//! Backend entry-point: wires the contact relay, health probes, and OpenAPI docs.

mod server;

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultEnv;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use portfolio_backend::domain::ContactRelayService;
use portfolio_backend::inbound::http::health::HealthState;
use portfolio_backend::inbound::http::listen_config::listen_settings_from_env;
use portfolio_backend::inbound::http::state::HttpState;
use portfolio_backend::settings::MailSettings;
use server::{
    MailerWiring, ServerConfig, build_mailer, create_server, drain_on, shutdown_signal,
    verify_mailer,
};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let listen = listen_settings_from_env(&DefaultEnv::new()).map_err(std::io::Error::other)?;
    let mail_settings = MailSettings::from_env().map_err(std::io::Error::other)?;
    let MailerWiring {
        sender,
        mailboxes,
        kind,
    } = build_mailer(&mail_settings)?;

    actix_web::rt::spawn(verify_mailer(Arc::clone(&sender)));

    let relay = ContactRelayService::new(sender, mailboxes);
    let http_state = web::Data::new(HttpState::new(Arc::new(relay)));
    let health_state = web::Data::new(HealthState::new(kind));

    let server = create_server(health_state.clone(), http_state, ServerConfig::from(listen))?;
    actix_web::rt::spawn(drain_on(shutdown_signal(), health_state, server.handle()));
    server.await
}
