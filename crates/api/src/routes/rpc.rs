//! The RPC endpoint.
//!
//! ```text
//! GET  /trpc/{paths}?batch=1&input=<json>   -> queries
//! POST /trpc/{paths}?batch=1  <json body>   -> mutations
//! ```

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::Value;

use crate::middleware::auth::{AuthUser, MaybeAuthUser};
use crate::rpc::batch::{execute, parse_failure};
use crate::rpc::{CallContext, ProcedureKind};
use crate::state::AppState;

/// Query-string parameters shared by both methods.
#[derive(Debug, Default, Deserialize)]
pub struct RpcParams {
    pub batch: Option<String>,
    /// JSON-encoded input of a GET call.
    pub input: Option<String>,
}

impl RpcParams {
    fn is_batch(&self) -> bool {
        matches!(self.batch.as_deref(), Some("1" | "true"))
    }
}

pub fn router() -> Router<AppState> {
    Router::new().route("/trpc/{paths}", get(query).post(mutation))
}

async fn query(
    State(state): State<AppState>,
    Path(paths): Path<String>,
    Query(params): Query<RpcParams>,
    MaybeAuthUser(user): MaybeAuthUser,
) -> Response {
    let batch = params.is_batch();
    let input = match params.input.as_deref().map(serde_json::from_str::<Value>).transpose() {
        Ok(input) => input,
        Err(e) => return respond(parse_failure(&paths, batch, &e)),
    };
    dispatch(state, user, ProcedureKind::Query, &paths, batch, input).await
}

async fn mutation(
    State(state): State<AppState>,
    Path(paths): Path<String>,
    Query(params): Query<RpcParams>,
    MaybeAuthUser(user): MaybeAuthUser,
    body: Bytes,
) -> Response {
    let batch = params.is_batch();
    let input = if body.is_empty() {
        None
    } else {
        match serde_json::from_slice::<Value>(&body) {
            Ok(value) => Some(value),
            Err(e) => return respond(parse_failure(&paths, batch, &e)),
        }
    };
    dispatch(state, user, ProcedureKind::Mutation, &paths, batch, input).await
}

async fn dispatch(
    state: AppState,
    user: Option<AuthUser>,
    kind: ProcedureKind,
    paths: &str,
    batch: bool,
    input: Option<Value>,
) -> Response {
    let router = state.rpc.clone();
    let ctx = CallContext { state, user };
    respond(execute(&router, kind, ctx, paths, batch, input).await)
}

fn respond((status, body): (StatusCode, Value)) -> Response {
    (status, Json(body)).into_response()
}
