//! Wire types of the RPC endpoint (tRPC HTTP protocol, no transformer).
//!
//! ```text
//! success: {"result": {"data": <output>}}
//! error:   {"error": {"message", "code": <json-rpc code>,
//!                     "data": {"code", "httpStatus", "path", "fieldErrors"?}}}
//! ```

use axum::http::StatusCode;
use serde::Serialize;
use serde_json::{json, Value};
use weighbridge_core::error::FieldErrors;

/// Error codes understood by RPC clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RpcErrorCode {
    ParseError,
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    MethodNotSupported,
    Conflict,
    InternalServerError,
}

impl RpcErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            RpcErrorCode::ParseError => "PARSE_ERROR",
            RpcErrorCode::BadRequest => "BAD_REQUEST",
            RpcErrorCode::Unauthorized => "UNAUTHORIZED",
            RpcErrorCode::Forbidden => "FORBIDDEN",
            RpcErrorCode::NotFound => "NOT_FOUND",
            RpcErrorCode::MethodNotSupported => "METHOD_NOT_SUPPORTED",
            RpcErrorCode::Conflict => "CONFLICT",
            RpcErrorCode::InternalServerError => "INTERNAL_SERVER_ERROR",
        }
    }

    /// JSON-RPC 2.0 style numeric code.
    pub fn json_rpc_code(self) -> i32 {
        match self {
            RpcErrorCode::ParseError => -32700,
            RpcErrorCode::BadRequest => -32600,
            RpcErrorCode::Unauthorized => -32001,
            RpcErrorCode::Forbidden => -32003,
            RpcErrorCode::NotFound => -32004,
            RpcErrorCode::MethodNotSupported => -32005,
            RpcErrorCode::Conflict => -32009,
            RpcErrorCode::InternalServerError => -32603,
        }
    }

    pub fn http_status(self) -> StatusCode {
        match self {
            RpcErrorCode::ParseError | RpcErrorCode::BadRequest => StatusCode::BAD_REQUEST,
            RpcErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            RpcErrorCode::Forbidden => StatusCode::FORBIDDEN,
            RpcErrorCode::NotFound => StatusCode::NOT_FOUND,
            RpcErrorCode::MethodNotSupported => StatusCode::METHOD_NOT_ALLOWED,
            RpcErrorCode::Conflict => StatusCode::CONFLICT,
            RpcErrorCode::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// A failed procedure call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{}: {message}", code.as_str())]
pub struct RpcError {
    pub code: RpcErrorCode,
    pub message: String,
    /// Per-field validation messages, present for invalid input.
    pub field_errors: Option<FieldErrors>,
}

impl RpcError {
    pub fn new(code: RpcErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            field_errors: None,
        }
    }

    pub fn invalid_input(fields: FieldErrors) -> Self {
        Self {
            code: RpcErrorCode::BadRequest,
            message: format!("Invalid input: {fields}"),
            field_errors: Some(fields),
        }
    }

    pub fn parse_error(message: impl Into<String>) -> Self {
        Self::new(RpcErrorCode::ParseError, message)
    }

    pub fn not_found(path: &str) -> Self {
        Self::new(
            RpcErrorCode::NotFound,
            format!("No \"query\"-procedure or \"mutation\"-procedure on path \"{path}\""),
        )
    }

    pub fn unauthorized() -> Self {
        Self::new(RpcErrorCode::Unauthorized, "Authentication required")
    }
}

/// Data block of an error envelope.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorData<'a> {
    code: &'static str,
    http_status: u16,
    path: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    field_errors: Option<&'a FieldErrors>,
}

#[derive(Debug, Serialize)]
struct ErrorShape<'a> {
    message: &'a str,
    code: i32,
    data: ErrorData<'a>,
}

/// Envelope for one call's outcome.
pub fn envelope(path: &str, outcome: &Result<Value, RpcError>) -> Value {
    match outcome {
        Ok(data) => json!({ "result": { "data": data } }),
        Err(err) => json!({
            "error": ErrorShape {
                message: &err.message,
                code: err.code.json_rpc_code(),
                data: ErrorData {
                    code: err.code.as_str(),
                    http_status: err.code.http_status().as_u16(),
                    path,
                    field_errors: err.field_errors.as_ref(),
                },
            }
        }),
    }
}

/// HTTP status of one call's outcome.
pub fn outcome_status(outcome: &Result<Value, RpcError>) -> StatusCode {
    match outcome {
        Ok(_) => StatusCode::OK,
        Err(err) => err.code.http_status(),
    }
}
