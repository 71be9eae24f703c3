//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers the contact relay routes, the health probes and the
//! request/response bodies they exchange. The document backs Swagger UI in
//! debug builds and is exported by `cargo run --bin openapi-dump`.

use utoipa::OpenApi;

use crate::domain::ErrorCode;
use crate::inbound::http::contact::{ContactRequest, ContactResponse};
use crate::inbound::http::error::FailureBody;
use crate::inbound::http::health::{MailTransportKind, ProbeBody};

/// OpenAPI document for the relay API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Portfolio contact relay",
        description = "Forwards portfolio contact form submissions to the site owner by email."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::contact::submit_contact,
        crate::inbound::http::contact::send_email,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ContactRequest,
        ContactResponse,
        FailureBody,
        ErrorCode,
        ProbeBody,
        MailTransportKind
    )),
    tags(
        (name = "contact", description = "Contact form relay"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
