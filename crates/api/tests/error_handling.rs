//! Tests for `AppError` → HTTP response mapping and `AppError` → `RpcError`
//! conversion.
//!
//! These call `IntoResponse` directly on `AppError` values; no router needed.

use assert_matches::assert_matches;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;
use weighbridge_api::error::AppError;
use weighbridge_api::rpc::{RpcError, RpcErrorCode};
use weighbridge_core::error::{CoreError, FieldErrors};
use weighbridge_db::store::StoreError;
use weighbridge_supabase::GoTrueError;

/// Helper: convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

fn duplicate_company() -> StoreError {
    StoreError::ConstraintViolation {
        constraint: "uq_companies_name".into(),
        message: "duplicate key value".into(),
    }
}

// ---------------------------------------------------------------------------
// REST responses
// ---------------------------------------------------------------------------

#[tokio::test]
async fn invalid_input_returns_400_with_field_summary() {
    let mut fields = FieldErrors::new();
    fields.add("email", "must be a valid email address");

    let (status, json) = error_to_response(CoreError::InvalidInput(fields).into()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["error"].as_str().unwrap().contains("email"));
}

#[tokio::test]
async fn bad_request_error_returns_400() {
    let (status, json) = error_to_response(AppError::BadRequest("invalid field value".into())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
    assert_eq!(json["error"], "invalid field value");
}

#[tokio::test]
async fn missing_session_returns_401() {
    let (status, json) =
        error_to_response(CoreError::Unauthorized("Missing session".into()).into()).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["code"], "UNAUTHORIZED");
    assert_eq!(json["error"], "Missing session");
}

#[tokio::test]
async fn constraint_violation_returns_409() {
    let (status, json) = error_to_response(duplicate_company().into()).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "CONFLICT");
    assert!(json["error"].as_str().unwrap().contains("uq_companies_name"));
}

#[tokio::test]
async fn unavailable_store_returns_503() {
    let err = StoreError::Unavailable("connection refused".into());
    let (status, json) = error_to_response(err.into()).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["code"], "STORE_UNAVAILABLE");
    assert!(!json["error"].as_str().unwrap().contains("refused"));
}

#[tokio::test]
async fn query_failure_is_sanitized() {
    let err = StoreError::Query("relation \"vehicle_logs\" does not exist".into());
    let (status, json) = error_to_response(err.into()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
}

#[tokio::test]
async fn internal_error_is_sanitized() {
    let (status, json) = error_to_response(AppError::InternalError("secret detail".into())).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "An internal error occurred");
}

#[tokio::test]
async fn provider_rejection_returns_401() {
    let err = GoTrueError::Rejected {
        status: 400,
        message: "Invalid login credentials".into(),
    };
    let (status, json) = error_to_response(err.into()).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error"], "Invalid login credentials");
}

#[tokio::test]
async fn provider_client_error_returns_400() {
    let err = GoTrueError::Rejected {
        status: 422,
        message: "Password should be at least 6 characters".into(),
    };
    let (status, json) = error_to_response(err.into()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn provider_outage_returns_502() {
    let err = GoTrueError::Rejected {
        status: 500,
        message: "boom".into(),
    };
    let (status, json) = error_to_response(err.into()).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["code"], "IDENTITY_UNAVAILABLE");
}

// ---------------------------------------------------------------------------
// RPC conversion
// ---------------------------------------------------------------------------

#[test]
fn rpc_invalid_input_keeps_field_errors() {
    let mut fields = FieldErrors::new();
    fields.add("phoneNumber", "must be at least 10 characters");

    let err = RpcError::from(AppError::from(CoreError::InvalidInput(fields)));

    assert_eq!(err.code, RpcErrorCode::BadRequest);
    assert_matches!(err.field_errors, Some(f) if f.get("phoneNumber").is_some());
}

#[test]
fn rpc_store_errors_carry_the_message() {
    let conflict = RpcError::from(AppError::from(duplicate_company()));
    assert_eq!(conflict.code, RpcErrorCode::Conflict);
    assert!(conflict.message.contains("uq_companies_name"));

    let failure = RpcError::from(AppError::from(StoreError::Query("numeric field overflow".into())));
    assert_eq!(failure.code, RpcErrorCode::InternalServerError);
    assert!(failure.message.contains("numeric field overflow"));
}

#[test]
fn rpc_provider_rejection_is_unauthorized() {
    let err = RpcError::from(AppError::from(GoTrueError::Rejected {
        status: 401,
        message: "expired".into(),
    }));
    assert_eq!(err.code, RpcErrorCode::Unauthorized);
}

#[test]
fn rpc_core_errors_map_to_client_codes() {
    let weight = RpcError::from(AppError::from(CoreError::Validation(
        "weight must be a finite number".into(),
    )));
    assert_eq!(weight.code, RpcErrorCode::BadRequest);

    let session = RpcError::from(AppError::from(CoreError::Unauthorized("Missing session".into())));
    assert_eq!(session.code, RpcErrorCode::Unauthorized);
    assert_eq!(session.message, "Missing session");
}
