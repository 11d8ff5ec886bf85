#![cfg(feature = "axum")]
#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Integration tests for the axum boundary adapter
//!
//! These tests verify that:
//! 1. Errors surfaced by handlers become JSON error records
//! 2. The correlation id is taken from the request header by the middleware
//! 3. Location details stay out of responses outside development

use axum::routing::get;
use axum::{Json, Router, middleware};
use errkit::handler::render_error;
use errkit::{ApiError, CORRELATION_ID_HEADER, ErrorRecord, error_adapter_middleware};
use http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt; // for oneshot

const TEST_CORRELATION_ID: &str = "5f1aa5d0-bdb1-4cd7-a807-6d673f49f871";

async fn missing_user() -> Result<Json<Value>, ApiError> {
    Err(ErrorRecord::new(404, "missing user").into())
}

async fn method_not_allowed() -> Result<Json<Value>, ApiError> {
    Err((StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed").into())
}

async fn io_failure() -> Result<Json<Value>, ApiError> {
    Err(ApiError::from_err(std::io::Error::other(
        "this is a standard error",
    )))
}

async fn ok() -> Json<Value> {
    Json(serde_json::json!({"ok": true}))
}

fn app() -> Router {
    Router::new()
        .route("/users", get(missing_user))
        .route("/only-post", get(method_not_allowed))
        .route("/io", get(io_failure))
        .route("/health", get(ok))
        .layer(middleware::from_fn(error_adapter_middleware))
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn record_errors_pass_through_with_the_request_correlation_id() {
    let request = Request::get("/users")
        .header(CORRELATION_ID_HEADER, TEST_CORRELATION_ID)
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["status_code"], 404);
    assert_eq!(body["message"], "missing user");
    assert_eq!(body["correlation_id"], TEST_CORRELATION_ID);
}

#[tokio::test]
async fn framework_status_errors_keep_their_status_and_message() {
    let request = Request::get("/only-post")
        .header(CORRELATION_ID_HEADER, TEST_CORRELATION_ID)
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    let body = body_json(response).await;
    assert_eq!(body["status_code"], 405);
    assert_eq!(body["message"], "Method Not Allowed");
    assert_eq!(body["correlation_id"], TEST_CORRELATION_ID);
}

#[tokio::test]
async fn opaque_errors_become_500_records() {
    let request = Request::get("/io")
        .header(CORRELATION_ID_HEADER, TEST_CORRELATION_ID)
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["message"], "this is a standard error");
    assert_eq!(body["custom_code"], "InternalServerError");
    assert_eq!(body["correlation_id"], TEST_CORRELATION_ID);
}

#[tokio::test]
async fn responses_outside_development_carry_no_location() {
    // ENVIRONMENT is not set to the development token in the test run, so
    // the adapter must redact the location the builder resolved.
    let request = Request::get("/users")
        .header(CORRELATION_ID_HEADER, TEST_CORRELATION_ID)
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app().oneshot(request).await.unwrap();

    let body = body_json(response).await;
    assert!(body.get("location").is_none());
}

#[tokio::test]
async fn a_missing_correlation_header_yields_an_empty_correlation_id() {
    let request = Request::get("/users")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app().oneshot(request).await.unwrap();

    let body = body_json(response).await;
    assert_eq!(body["correlation_id"], "");
}

#[tokio::test]
async fn successful_responses_are_untouched() {
    let request = Request::get("/health")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["ok"], true);
}

#[tokio::test]
async fn rendering_for_development_keeps_the_resolved_location() {
    let err = ApiError::from(ErrorRecord::new(404, "missing user"));
    let response = render_error(err, TEST_CORRELATION_ID, true);

    let body = body_json(response).await;
    assert!(
        body["location"]["page"]
            .as_str()
            .unwrap()
            .ends_with("handler.rs")
    );
    assert!(body["location"]["line"].as_u64().unwrap() > 0);
}
