//! Tests for HTTP error mapping.

use super::*;
use actix_web::body::to_bytes;
use actix_web::http::StatusCode;
use actix_web::{App, HttpResponse, ResponseError, test as actix_test, web};
use rstest::{fixture, rstest};
use serde::Deserialize;
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[rstest]
#[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::unauthorized("invalid password"), StatusCode::UNAUTHORIZED)]
#[case(Error::forbidden("consumer account required"), StatusCode::FORBIDDEN)]
#[case(Error::not_found("property 9 not found"), StatusCode::NOT_FOUND)]
#[case(Error::conflict("already voted this way"), StatusCode::CONFLICT)]
#[case(Error::service_unavailable("pool exhausted"), StatusCode::SERVICE_UNAVAILABLE)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] error: Error, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&error), status);
}

async fn decode_response(response: HttpResponse) -> Error {
    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    serde_json::from_slice(&bytes).expect("Error JSON deserialisation succeeds")
}

#[rstest]
#[actix_web::test]
async fn internal_errors_are_redacted_but_keep_trace_id(expected_trace_id: String) {
    let error = Error::internal("diesel: relation users does not exist")
        .with_trace_id(expected_trace_id.clone())
        .with_details(json!({"sql": "select 1"}));

    let response = ResponseError::error_response(&error);
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let header = response
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    assert_eq!(header.as_deref(), Some(expected_trace_id.as_str()));

    let payload = decode_response(response).await;
    assert_eq!(payload.code(), ErrorCode::InternalError);
    assert_eq!(payload.message(), "Internal server error");
    assert_eq!(payload.trace_id(), Some(expected_trace_id.as_str()));
    assert!(payload.details().is_none());
}

#[rstest]
#[actix_web::test]
async fn conflict_details_reach_the_client(expected_trace_id: String) {
    let error = Error::conflict("already voted this way")
        .with_trace_id(expected_trace_id)
        .with_details(json!({"code": "duplicate_vote", "vote": "up"}));

    let response = ResponseError::error_response(&error);
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let payload = decode_response(response).await;
    assert_eq!(payload.message(), "already voted this way");
    assert_eq!(
        payload.details(),
        Some(&json!({"code": "duplicate_vote", "vote": "up"}))
    );
}

#[rstest]
#[actix_web::test]
async fn error_without_trace_id_omits_trace_header() {
    let error = Error::invalid_request("bad").with_details(json!({"field": "email"}));

    let response = ResponseError::error_response(&error);
    assert!(response.headers().get(TRACE_ID_HEADER).is_none());
    let payload = decode_response(response).await;
    assert_eq!(payload.trace_id(), None);
}

#[rstest]
fn redaction_leaves_client_errors_untouched() {
    let error = Error::not_found("property 4 not found");
    assert_eq!(redact_if_internal(&error), error);
}

#[rstest]
fn from_actix_error_is_redacted_internal_error() {
    let err: Error = actix_web::error::ErrorBadRequest("boom").into();

    assert_eq!(err.code(), ErrorCode::InternalError);
    assert_eq!(err.message(), "Internal server error");
    assert_eq!(err.details(), None);
}

#[derive(Deserialize)]
struct NumericBody {
    #[serde(rename = "value")]
    _value: i32,
}

#[rstest]
#[actix_web::test]
async fn malformed_json_bodies_become_invalid_request() {
    let app = actix_test::init_service(
        App::new()
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .route(
                "/bodies",
                web::post().to(|_: web::Json<NumericBody>| async { HttpResponse::Ok().finish() }),
            ),
    )
    .await;

    let request = actix_test::TestRequest::post()
        .uri("/bodies")
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"value\": \"nope\"}")
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload: Error = actix_test::read_body_json(response).await;
    assert_eq!(payload.code(), ErrorCode::InvalidRequest);
    assert_eq!(payload.details(), Some(&json!({"code": "malformed_body"})));
}
