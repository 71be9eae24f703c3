//! Liveness and readiness probes.
//!
//! Readiness also reports which mail transport backs the relay, so a deploy
//! that silently fell back to the logging fixture is visible from outside.

use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::{HttpResponse, get, http::header, web};
use serde::Serialize;
use utoipa::ToSchema;

/// Mail transport the relay is wired to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MailTransportKind {
    /// Real SMTP delivery.
    Smtp,
    /// Log-only development sender.
    Fixture,
}

/// Probe response body.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProbeBody {
    /// `ok` or `unavailable`.
    #[schema(example = "ok")]
    pub status: &'static str,
    /// Active mail transport.
    pub mailer: MailTransportKind,
}

/// Process health shared with the probe handlers.
#[derive(Debug)]
pub struct HealthState {
    ready: AtomicBool,
    draining: AtomicBool,
    mailer: MailTransportKind,
}

impl HealthState {
    /// Not ready, not draining.
    pub fn new(mailer: MailTransportKind) -> Self {
        Self {
            ready: AtomicBool::new(false),
            draining: AtomicBool::new(false),
            mailer,
        }
    }

    /// Flip readiness once the listener is bound.
    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    /// Fail both probes so orchestrators stop routing traffic before shutdown.
    pub fn mark_draining(&self) {
        self.draining.store(true, Ordering::Release);
    }

    /// Whether the readiness probe passes.
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire) && !self.is_draining()
    }

    /// Whether shutdown has begun.
    pub fn is_draining(&self) -> bool {
        self.draining.load(Ordering::Acquire)
    }

    fn respond(&self, ok: bool) -> HttpResponse {
        let body = ProbeBody {
            status: if ok { "ok" } else { "unavailable" },
            mailer: self.mailer,
        };
        let mut builder = if ok {
            HttpResponse::Ok()
        } else {
            HttpResponse::ServiceUnavailable()
        };
        builder
            .insert_header((header::CACHE_CONTROL, "no-store"))
            .json(body)
    }
}

/// Readiness probe: 200 once the server accepts traffic, 503 otherwise.
#[utoipa::path(
    get,
    path = "/health/ready",
    tags = ["health"],
    responses(
        (status = 200, description = "Server is ready", body = ProbeBody),
        (status = 503, description = "Server is starting or draining", body = ProbeBody)
    )
)]
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    state.respond(state.is_ready())
}

/// Liveness probe: 200 until draining starts.
#[utoipa::path(
    get,
    path = "/health/live",
    tags = ["health"],
    responses(
        (status = 200, description = "Process is alive", body = ProbeBody),
        (status = 503, description = "Process is shutting down", body = ProbeBody)
    )
)]
#[get("/health/live")]
pub async fn live(state: web::Data<HealthState>) -> HttpResponse {
    state.respond(!state.is_draining())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use rstest::rstest;
    use serde_json::Value;

    async fn probe(state: web::Data<HealthState>, uri: &str) -> (StatusCode, Value) {
        let app = test::init_service(App::new().app_data(state).service(ready).service(live)).await;
        let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        let status = res.status();
        assert_eq!(
            res.headers().get(header::CACHE_CONTROL).map(|v| v.as_bytes()),
            Some(&b"no-store"[..])
        );
        (status, test::read_body_json(res).await)
    }

    #[rstest]
    #[actix_web::test]
    async fn readiness_follows_lifecycle() {
        let state = web::Data::new(HealthState::new(MailTransportKind::Smtp));

        let (status, _) = probe(state.clone(), "/health/ready").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

        state.mark_ready();
        let (status, body) = probe(state.clone(), "/health/ready").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["mailer"], "smtp");

        state.mark_draining();
        let (status, _) = probe(state, "/health/ready").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[rstest]
    #[actix_web::test]
    async fn liveness_fails_only_when_draining() {
        let state = web::Data::new(HealthState::new(MailTransportKind::Fixture));

        let (status, body) = probe(state.clone(), "/health/live").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["mailer"], "fixture");

        state.mark_draining();
        let (status, body) = probe(state, "/health/live").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "unavailable");
    }
}
