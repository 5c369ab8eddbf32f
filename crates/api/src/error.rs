use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use weighbridge_core::error::CoreError;
use weighbridge_db::store::StoreError;
use weighbridge_supabase::GoTrueError;

use crate::rpc::{RpcError, RpcErrorCode};

/// Application-level error type for HTTP handlers and RPC procedures.
///
/// Wraps [`CoreError`] for domain errors, [`StoreError`] for storage
/// failures and [`GoTrueError`] for identity-provider failures, and adds
/// HTTP-specific variants. Implements [`IntoResponse`] for the REST routes and
/// converts into [`RpcError`] for the RPC endpoint.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `weighbridge_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A storage backend failure.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// An identity-provider failure.
    #[error(transparent)]
    Identity(#[from] GoTrueError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

const SANITIZED: &str = "An internal error occurred";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::InvalidInput(fields) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", fields.to_string())
                }
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
            },

            // --- Storage errors ---
            AppError::Store(err) => classify_store_error(err),

            // --- Identity provider errors ---
            AppError::Identity(err) => classify_identity_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    SANITIZED.to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a storage error into an HTTP status, error code, and message.
///
/// - Constraint violations map to 409.
/// - An unreachable backend maps to 503.
/// - Everything else maps to 500 with a sanitized message.
fn classify_store_error(err: &StoreError) -> (StatusCode, &'static str, String) {
    match err {
        StoreError::ConstraintViolation { constraint, .. } => (
            StatusCode::CONFLICT,
            "CONFLICT",
            format!("Duplicate value violates unique constraint: {constraint}"),
        ),
        StoreError::Unavailable(msg) => {
            tracing::error!(error = %msg, "Storage unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "STORE_UNAVAILABLE",
                "Storage is temporarily unavailable".to_string(),
            )
        }
        StoreError::Query(msg) => {
            tracing::error!(error = %msg, "Storage query failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                SANITIZED.to_string(),
            )
        }
    }
}

/// Provider rejections (bad credentials, expired refresh token) are the
/// caller's problem; anything else means the provider could not be used.
fn classify_identity_error(err: &GoTrueError) -> (StatusCode, &'static str, String) {
    match err {
        GoTrueError::Rejected { status, message } if err.is_rejection() => {
            if matches!(status, 400 | 401 | 403) {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", message.clone())
            } else {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", message.clone())
            }
        }
        other => {
            tracing::error!(error = %other, "Identity provider failure");
            (
                StatusCode::BAD_GATEWAY,
                "IDENTITY_UNAVAILABLE",
                "Identity provider is unavailable".to_string(),
            )
        }
    }
}

impl From<AppError> for RpcError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::Core(core) => match core {
                CoreError::Validation(msg) => RpcError::new(RpcErrorCode::BadRequest, msg),
                CoreError::InvalidInput(fields) => RpcError::invalid_input(fields),
                CoreError::Unauthorized(msg) => RpcError::new(RpcErrorCode::Unauthorized, msg),
            },
            AppError::Store(store) => {
                let code = if store.is_constraint_violation() {
                    RpcErrorCode::Conflict
                } else {
                    RpcErrorCode::InternalServerError
                };
                RpcError::new(code, store.to_string())
            }
            AppError::Identity(identity) => {
                let code = if identity.is_rejection() {
                    RpcErrorCode::Unauthorized
                } else {
                    RpcErrorCode::InternalServerError
                };
                RpcError::new(code, identity.to_string())
            }
            AppError::BadRequest(msg) => RpcError::new(RpcErrorCode::BadRequest, msg),
            AppError::InternalError(msg) => RpcError::new(RpcErrorCode::InternalServerError, msg),
        }
    }
}
