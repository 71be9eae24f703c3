//! HTTP rendering of domain errors.
//!
//! Every failure leaves the API in the relay envelope the contact form
//! understands (`{"success": false, "message": ...}`), extended with the
//! stable error code and trace identifier. Internal failures never expose
//! their diagnostic text.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Message returned for any internal failure, mail delivery included.
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to send message.";

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

/// Failure body returned by every endpoint.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FailureBody {
    /// Always `false`.
    #[schema(example = false)]
    pub success: bool,
    /// Text suitable for showing to the user.
    #[schema(example = "Please fill in all fields.")]
    pub message: String,
    /// Stable machine-readable code.
    pub code: ErrorCode,
    /// Correlation identifier, mirrored in the `trace-id` header.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
    /// Field-level context for validation failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub details: Option<Value>,
}

impl FailureBody {
    fn from_error(error: &Error) -> Self {
        let internal = matches!(error.code(), ErrorCode::InternalError);
        Self {
            success: false,
            message: if internal {
                GENERIC_FAILURE_MESSAGE.to_owned()
            } else {
                error.message().to_owned()
            },
            code: error.code(),
            trace_id: error.trace_id().map(str::to_owned),
            details: if internal {
                None
            } else {
                error.details().cloned()
            },
        }
    }
}

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        builder.json(FailureBody::from_error(self))
    }
}
