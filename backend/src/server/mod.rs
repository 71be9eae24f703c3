//! Server construction and middleware wiring.

mod config;
mod mailer;

pub use config::ServerConfig;
pub use mailer::{MailerWiring, build_mailer, verify_mailer};

use std::future::Future;
use std::io;

use actix_web::body::MessageBody;
use actix_web::dev::{Server, ServerHandle, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::{error, info};

use portfolio_backend::Trace;
#[cfg(debug_assertions)]
use portfolio_backend::doc::ApiDoc;
use portfolio_backend::inbound::http::contact::{form_config, json_config, send_email, submit_contact};
use portfolio_backend::inbound::http::health::{HealthState, live, ready};
use portfolio_backend::inbound::http::listen_config::{AllowedOrigins, cors};
use portfolio_backend::inbound::http::state::HttpState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    allowed_origins: AllowedOrigins,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        allowed_origins,
    } = deps;

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(json_config())
        .app_data(form_config())
        .wrap(Trace)
        .wrap(cors(&allowed_origins))
        .service(submit_contact)
        .service(send_email)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Construct an Actix HTTP server for the relay.
///
/// # Parameters
/// - `health_state`: shared readiness state, marked ready once the socket is bound.
/// - `http_state`: relay port handed to the contact handlers.
/// - `config`: bind address and CORS policy.
///
/// # Returns
/// A spawned [`Server`] that must be awaited to drive the listener.
///
/// Process signals are not handled here; pair the server with [`drain_on`].
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    config: ServerConfig,
) -> io::Result<Server> {
    let ServerConfig {
        bind_addr,
        allowed_origins,
    } = config;
    let deps = AppDependencies {
        health_state: health_state.clone(),
        http_state,
        allowed_origins,
    };

    let server = HttpServer::new(move || build_app(deps.clone()))
        .bind(bind_addr)?
        .disable_signals()
        .run();

    info!(%bind_addr, "contact relay listening");
    health_state.mark_ready();
    Ok(server)
}

/// Resolve on `SIGINT`, or `SIGTERM` on Unix.
///
/// # Errors
/// Returns an error when the signal handlers cannot be installed.
pub async fn shutdown_signal() -> io::Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut terminate = signal(SignalKind::terminate())?;
        tokio::select! {
            result = tokio::signal::ctrl_c() => result,
            _ = terminate.recv() => Ok(()),
        }
    }
    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await
    }
}

/// Wait for `signal`, flip the readiness probe to draining, then stop the
/// server gracefully.
///
/// When the signal listener fails the server is left running.
pub async fn drain_on<S>(signal: S, health_state: web::Data<HealthState>, handle: ServerHandle)
where
    S: Future<Output = io::Result<()>>,
{
    if let Err(err) = signal.await {
        error!(error = %err, "shutdown signal listener failed");
        return;
    }
    info!("shutdown requested; draining");
    health_state.mark_draining();
    handle.stop(true).await;
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use portfolio_backend::domain::ports::{FixtureMailSender, MailSender};
    use portfolio_backend::domain::{ContactRelayService, EmailAddress, MailboxSettings};
    use portfolio_backend::inbound::http::health::MailTransportKind;
    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn http_state() -> web::Data<HttpState> {
        let address = EmailAddress::parse("portfolio@example.com").expect("fixture address");
        let sender: Arc<dyn MailSender> = Arc::new(FixtureMailSender);
        let relay = ContactRelayService::new(sender, MailboxSettings::new(address.clone(), address));
        web::Data::new(HttpState::new(Arc::new(relay)))
    }

    fn start(http_state: web::Data<HttpState>) -> (web::Data<HealthState>, Server) {
        let health_state = web::Data::new(HealthState::new(MailTransportKind::Fixture));
        let config = ServerConfig::new("127.0.0.1:0".parse().expect("loopback address"));
        let server =
            create_server(health_state.clone(), http_state, config).expect("server binds");
        (health_state, server)
    }

    #[rstest]
    #[actix_web::test]
    async fn shutdown_signal_drains_then_stops_the_server(http_state: web::Data<HttpState>) {
        let (health_state, server) = start(http_state);
        assert!(health_state.is_ready());
        let handle = server.handle();
        let running = actix_web::rt::spawn(server);

        drain_on(async { Ok(()) }, health_state.clone(), handle).await;

        assert!(health_state.is_draining());
        assert!(!health_state.is_ready());
        running
            .await
            .expect("server task joins")
            .expect("server stops cleanly");
    }

    #[rstest]
    #[actix_web::test]
    async fn failed_signal_listener_keeps_serving(http_state: web::Data<HttpState>) {
        let (health_state, server) = start(http_state);
        let handle = server.handle();
        let running = actix_web::rt::spawn(server);

        drain_on(
            async { Err(io::Error::other("signal driver unavailable")) },
            health_state.clone(),
            handle.clone(),
        )
        .await;

        assert!(!health_state.is_draining());
        assert!(health_state.is_ready());
        handle.stop(false).await;
        running
            .await
            .expect("server task joins")
            .expect("server stops cleanly");
    }
}
