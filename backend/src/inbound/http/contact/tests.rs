//! Handler tests for the contact relay routes.

use std::sync::Arc;

use actix_web::http::{StatusCode, header};
use actix_web::{App, test as actix_test};
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::{MockContactRelay, RelayReceipt};
use crate::domain::{INVALID_EMAIL_MESSAGE, MISSING_FIELDS_MESSAGE, TRACE_ID_HEADER};
use crate::inbound::http::error::GENERIC_FAILURE_MESSAGE;
use crate::middleware::Trace;

fn accepting_relay(times: usize) -> MockContactRelay {
    let mut relay = MockContactRelay::new();
    relay.expect_relay().times(times).returning(|_| {
        Ok(RelayReceipt {
            provider_response: "250 OK".to_owned(),
        })
    });
    relay
}

fn untouched_relay() -> MockContactRelay {
    let mut relay = MockContactRelay::new();
    relay.expect_relay().never();
    relay
}

fn app(
    relay: MockContactRelay,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .wrap(Trace)
        .app_data(web::Data::new(HttpState::new(Arc::new(relay))))
        .app_data(json_config())
        .app_data(form_config())
        .service(submit_contact)
        .service(send_email)
}

fn valid_body() -> Value {
    json!({
        "name": "Ada Lovelace",
        "email": "ada@example.org",
        "subject": "Engines",
        "message": "Hello there",
    })
}

#[rstest]
#[case("/api/contact")]
#[case("/send-email")]
#[actix_web::test]
async fn valid_json_is_relayed(#[case] uri: &str) {
    let service = actix_test::init_service(app(accepting_relay(1))).await;
    let request = actix_test::TestRequest::post()
        .uri(uri)
        .set_json(valid_body())
        .to_request();

    let response = actix_test::call_service(&service, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key(TRACE_ID_HEADER));
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(
        body,
        json!({ "success": true, "message": "Message sent successfully!" })
    );
}

#[rstest]
#[actix_web::test]
async fn urlencoded_form_is_relayed() {
    let mut relay = MockContactRelay::new();
    relay
        .expect_relay()
        .withf(|submission| {
            submission.name() == "Ada"
                && submission.email().as_str() == "ada@example.org"
                && submission.subject().is_none()
                && submission.message() == "Hi & bye"
        })
        .times(1)
        .returning(|_| {
            Ok(RelayReceipt {
                provider_response: "250 OK".to_owned(),
            })
        });
    let service = actix_test::init_service(app(relay)).await;
    let request = actix_test::TestRequest::post()
        .uri("/api/contact")
        .insert_header((header::CONTENT_TYPE, "application/x-www-form-urlencoded"))
        .set_payload("name=Ada&email=ada%40example.org&message=Hi+%26+bye")
        .to_request();

    let response = actix_test::call_service(&service, request).await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[rstest]
#[actix_web::test]
async fn recipient_override_is_ignored() {
    let service = actix_test::init_service(app(accepting_relay(1))).await;
    let mut body = valid_body();
    body["to"] = json!("victim@example.net");
    let request = actix_test::TestRequest::post()
        .uri("/send-email")
        .set_json(body)
        .to_request();

    let response = actix_test::call_service(&service, request).await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[rstest]
#[case(json!({ "email": "ada@example.org", "message": "Hi" }), MISSING_FIELDS_MESSAGE, "name")]
#[case(json!({ "name": "Ada", "email": "   ", "message": "Hi" }), MISSING_FIELDS_MESSAGE, "email")]
#[case(json!({ "name": "Ada", "email": "ada@example.org" }), MISSING_FIELDS_MESSAGE, "message")]
#[case(json!({ "name": "Ada", "email": "not-an-email", "message": "Hi" }), INVALID_EMAIL_MESSAGE, "email")]
#[case(json!({ "name": null, "email": "ada@example.org", "message": "Hi" }), MISSING_FIELDS_MESSAGE, "name")]
#[case(json!({ "name": "Ada", "email": "ada@example.org", "message": null }), MISSING_FIELDS_MESSAGE, "message")]
#[actix_web::test]
async fn invalid_submissions_are_rejected_without_relaying(
    #[case] payload: Value,
    #[case] message: &str,
    #[case] field: &str,
) {
    let service = actix_test::init_service(app(untouched_relay())).await;
    let request = actix_test::TestRequest::post()
        .uri("/api/contact")
        .set_json(payload)
        .to_request();

    let response = actix_test::call_service(&service, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let trace_header = response
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
        .expect("trace header present");
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], json!(message));
    assert_eq!(body["code"], json!("invalid_request"));
    assert_eq!(body["details"]["field"], json!(field));
    assert_eq!(body["traceId"], json!(trace_header));
}

#[rstest]
#[actix_web::test]
async fn malformed_json_is_a_bad_request() {
    let service = actix_test::init_service(app(untouched_relay())).await;
    let request = actix_test::TestRequest::post()
        .uri("/api/contact")
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{\"name\":")
        .to_request();

    let response = actix_test::call_service(&service, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["details"]["code"], json!("invalid_body"));
}

#[rstest]
#[case::over_the_cap(100 * 1024)]
#[case::over_the_default_payload_limit(300 * 1024)]
#[actix_web::test]
async fn oversized_json_is_rejected_in_the_envelope(#[case] size: usize) {
    let service = actix_test::init_service(app(untouched_relay())).await;
    let mut body = valid_body();
    body["message"] = json!("x".repeat(size));
    let request = actix_test::TestRequest::post()
        .uri("/api/contact")
        .set_json(body)
        .to_request();

    let response = actix_test::call_service(&service, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(response.headers().contains_key(TRACE_ID_HEADER));
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["details"]["code"], json!("invalid_body"));
    assert!(body["traceId"].is_string());
}

#[rstest]
#[case::over_the_cap(100 * 1024)]
#[case::over_the_default_payload_limit(300 * 1024)]
#[actix_web::test]
async fn oversized_form_is_rejected_in_the_envelope(#[case] size: usize) {
    let service = actix_test::init_service(app(untouched_relay())).await;
    let payload = format!(
        "name=Ada&email=ada%40example.org&message={}",
        "x".repeat(size)
    );
    let request = actix_test::TestRequest::post()
        .uri("/send-email")
        .insert_header((header::CONTENT_TYPE, "application/x-www-form-urlencoded"))
        .set_payload(payload)
        .to_request();

    let response = actix_test::call_service(&service, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["details"]["code"], json!("invalid_body"));
}

#[rstest]
#[actix_web::test]
async fn body_just_under_the_cap_is_relayed() {
    let service = actix_test::init_service(app(accepting_relay(1))).await;
    let mut body = valid_body();
    body["message"] = json!("x".repeat(MAX_BODY_BYTES - 1024));
    let request = actix_test::TestRequest::post()
        .uri("/api/contact")
        .set_json(body)
        .to_request();

    let response = actix_test::call_service(&service, request).await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[rstest]
#[actix_web::test]
async fn delivery_failure_is_generic_and_server_keeps_serving() {
    let mut relay = MockContactRelay::new();
    let mut calls = 0_u32;
    relay.expect_relay().times(2).returning(move |_| {
        calls += 1;
        if calls == 1 {
            Err(Error::internal("mail delivery failed: 535 authentication failed"))
        } else {
            Ok(RelayReceipt {
                provider_response: "250 OK".to_owned(),
            })
        }
    });
    let service = actix_test::init_service(app(relay)).await;

    let first = actix_test::call_service(
        &service,
        actix_test::TestRequest::post()
            .uri("/api/contact")
            .set_json(valid_body())
            .to_request(),
    )
    .await;
    assert_eq!(first.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = actix_test::read_body_json(first).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], json!(GENERIC_FAILURE_MESSAGE));
    assert!(!body.to_string().contains("535"));

    let second = actix_test::call_service(
        &service,
        actix_test::TestRequest::post()
            .uri("/api/contact")
            .set_json(valid_body())
            .to_request(),
    )
    .await;
    assert_eq!(second.status(), StatusCode::OK);
}
