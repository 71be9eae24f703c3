//! Validation error mapping for inbound HTTP adapters.

use serde_json::json;

use crate::domain::{ContactValidationError, Error};

/// Convert a contact validation failure into a 400-class domain error.
///
/// The message is the same text the browser form shows, so API clients can
/// surface it directly; `details` names the offending field.
pub(crate) fn contact_validation_error(err: ContactValidationError) -> Error {
    Error::invalid_request(err.user_message()).with_details(json!({
        "field": err.field().as_str(),
        "code": err.code(),
    }))
}

/// Error returned when the request body is neither valid JSON nor a valid
/// urlencoded form.
pub(crate) fn unreadable_body_error(reason: &str) -> Error {
    Error::invalid_request("Request body must be a JSON object or an urlencoded form.")
        .with_details(json!({ "code": "invalid_body", "reason": reason }))
}
