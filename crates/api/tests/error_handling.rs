//! Tests for `AppError` → HTTP response mapping.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use euit_api::error::AppError;
use euit_core::error::CoreError;
use http_body_util::BodyExt;

async fn into_json(error: AppError) -> (StatusCode, serde_json::Value) {
    let response = error.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

// ---------------------------------------------------------------------------
// Test: CoreError::Validation → 400 VALIDATION_ERROR
// ---------------------------------------------------------------------------

#[tokio::test]
async fn validation_error_returns_400() {
    let (status, json) =
        into_json(AppError::Core(CoreError::Validation("diemTongKet: range".into()))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "diemTongKet: range");
}

// ---------------------------------------------------------------------------
// Test: BadRequest → 400 BAD_REQUEST
// ---------------------------------------------------------------------------

#[tokio::test]
async fn bad_request_returns_400() {
    let (status, json) = into_json(AppError::BadRequest("missing field".into())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
    assert_eq!(json["error"], "missing field");
}

// ---------------------------------------------------------------------------
// Test: internal errors are sanitized
// ---------------------------------------------------------------------------

#[tokio::test]
async fn internal_error_hides_details() {
    let (status, json) = into_json(AppError::InternalError("socket table poisoned".into())).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
}

#[tokio::test]
async fn core_internal_error_hides_details() {
    let (status, json) = into_json(AppError::Core(CoreError::Internal("boom".into()))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
}

// ---------------------------------------------------------------------------
// Test: CoreError converts into AppError::Core
// ---------------------------------------------------------------------------

#[test]
fn core_error_converts_via_from() {
    use assert_matches::assert_matches;

    let error: AppError = CoreError::Validation("x".into()).into();

    assert_matches!(error, AppError::Core(CoreError::Validation(msg)) if msg == "x");
}
