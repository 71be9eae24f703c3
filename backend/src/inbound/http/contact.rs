//! Contact form relay handlers.
//!
//! ```text
//! POST /api/contact {"name":"Ada","email":"ada@example.org","subject":"Hi","message":"Hello"}
//! POST /send-email  name=Ada&email=ada%40example.org&message=Hello
//! ```
//!
//! Both routes accept JSON or urlencoded bodies and answer with the same
//! `{success, message}` envelope. `/send-email` is the legacy route kept for
//! older form builds; any `to` field it carries is ignored so the relay only
//! ever mails the configured owner.

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest, error::JsonPayloadError, post, web};
use futures_util::future::LocalBoxFuture;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{ContactSubmission, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::FailureBody;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{contact_validation_error, unreadable_body_error};

/// Message returned after a successful relay.
pub const SUCCESS_MESSAGE: &str = "Message sent successfully!";

/// Largest accepted request body, JSON or form.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Contact form payload.
///
/// Missing and `null` fields deserialize as empty strings so they surface as
/// the form's own validation message instead of a parse error.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct ContactRequest {
    /// Sender's name.
    #[serde(deserialize_with = "null_as_empty")]
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    /// Sender's reply address.
    #[serde(deserialize_with = "null_as_empty")]
    #[schema(example = "ada@example.org")]
    pub email: String,
    /// Optional subject line.
    #[schema(example = "Collaboration")]
    pub subject: Option<String>,
    /// Message body.
    #[serde(deserialize_with = "null_as_empty")]
    #[schema(example = "I enjoyed your portfolio.")]
    pub message: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl TryFrom<ContactRequest> for ContactSubmission {
    type Error = Error;

    fn try_from(value: ContactRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(
            &value.name,
            &value.email,
            value.subject.as_deref(),
            &value.message,
        )
        .map_err(contact_validation_error)
    }
}

/// Success envelope.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ContactResponse {
    /// Always `true`.
    #[schema(example = true)]
    pub success: bool,
    /// Confirmation text for the form.
    #[schema(example = "Message sent successfully!")]
    pub message: String,
}

impl ContactResponse {
    fn sent() -> Self {
        Self {
            success: true,
            message: SUCCESS_MESSAGE.to_owned(),
        }
    }
}

/// Contact payload read as a urlencoded form or, for any other content type,
/// as JSON.
///
/// The body goes straight to the matching extractor so its size limit and
/// error handler apply to the whole payload.
pub struct ContactBody(ContactRequest);

impl FromRequest for ContactBody {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        if req.content_type().eq_ignore_ascii_case(FORM_CONTENT_TYPE) {
            let form = web::Form::<ContactRequest>::from_request(req, payload);
            Box::pin(async move { form.await.map(|body| Self(body.into_inner())) })
        } else {
            let json = web::Json::<ContactRequest>::from_request(req, payload);
            Box::pin(async move { json.await.map(|body| Self(body.into_inner())) })
        }
    }
}

/// JSON extractor configuration that renders parse failures in the relay
/// envelope.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(MAX_BODY_BYTES)
        .error_handler(|err: JsonPayloadError, _req: &HttpRequest| {
            unreadable_body_error(&err.to_string()).into()
        })
}

/// Form extractor configuration matching [`json_config`].
pub fn form_config() -> web::FormConfig {
    web::FormConfig::default()
        .limit(MAX_BODY_BYTES)
        .error_handler(|err, _req: &HttpRequest| unreadable_body_error(&err.to_string()).into())
}

async fn relay_body(state: &HttpState, body: ContactBody) -> ApiResult<web::Json<ContactResponse>> {
    let ContactBody(request) = body;
    let submission = ContactSubmission::try_from(request)?;
    let receipt = state.relay.relay(submission).await?;
    info!(provider_response = %receipt.provider_response, "contact message relayed");
    Ok(web::Json(ContactResponse::sent()))
}

/// Relay a contact form submission to the site owner.
#[utoipa::path(
    post,
    path = "/api/contact",
    request_body(
        content = ContactRequest,
        content_type = "application/json",
        description = "JSON or application/x-www-form-urlencoded contact form"
    ),
    responses(
        (status = 200, description = "Message relayed", body = ContactResponse),
        (status = 400, description = "Missing field or invalid email", body = FailureBody),
        (status = 500, description = "Mail delivery failed", body = FailureBody)
    ),
    tags = ["contact"],
    operation_id = "submitContact"
)]
#[post("/api/contact")]
pub async fn submit_contact(
    state: web::Data<HttpState>,
    body: ContactBody,
) -> ApiResult<web::Json<ContactResponse>> {
    relay_body(&state, body).await
}

/// Legacy relay route; identical contract to `/api/contact`.
#[utoipa::path(
    post,
    path = "/send-email",
    request_body(
        content = ContactRequest,
        content_type = "application/json",
        description = "JSON or application/x-www-form-urlencoded contact form"
    ),
    responses(
        (status = 200, description = "Message relayed", body = ContactResponse),
        (status = 400, description = "Missing field or invalid email", body = FailureBody),
        (status = 500, description = "Mail delivery failed", body = FailureBody)
    ),
    tags = ["contact"],
    operation_id = "sendEmail"
)]
#[post("/send-email")]
pub async fn send_email(
    state: web::Data<HttpState>,
    body: ContactBody,
) -> ApiResult<web::Json<ContactResponse>> {
    relay_body(&state, body).await
}

#[cfg(test)]
mod tests;
