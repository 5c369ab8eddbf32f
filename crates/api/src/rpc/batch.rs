//! Executing one HTTP request's worth of calls.
//!
//! A batched request (`?batch=1`) names several comma-separated paths and
//! carries inputs keyed by call index (`{"0": .., "1": ..}`). Calls run
//! concurrently and independently; results come back in call order.

use axum::http::StatusCode;
use futures::future::join_all;
use serde_json::Value;

use super::protocol::{envelope, outcome_status, RpcError};
use super::registry::{CallContext, ProcedureKind, RpcRouter};

/// Run the request's calls and build the response status and body.
pub async fn execute(
    router: &RpcRouter,
    kind: ProcedureKind,
    ctx: CallContext,
    paths: &str,
    batch: bool,
    input: Option<Value>,
) -> (StatusCode, Value) {
    if !batch {
        let outcome = router.call(paths, kind, ctx, input).await;
        return (outcome_status(&outcome), envelope(paths, &outcome));
    }

    let calls: Vec<&str> = paths.split(',').collect();
    let outcomes = join_all(calls.iter().enumerate().map(|(index, path)| {
        let call_input = input
            .as_ref()
            .and_then(|inputs| inputs.get(index.to_string()))
            .cloned();
        router.call(path, kind, ctx.clone(), call_input)
    }))
    .await;

    let status = batch_status(outcomes.iter().map(outcome_status));
    let body = calls
        .iter()
        .zip(&outcomes)
        .map(|(path, outcome)| envelope(path, outcome))
        .collect();
    (status, Value::Array(body))
}

/// Every call of a request whose input could not be parsed fails the same way.
pub fn parse_failure(paths: &str, batch: bool, err: &serde_json::Error) -> (StatusCode, Value) {
    let failure: Result<Value, RpcError> =
        Err(RpcError::parse_error(format!("Unable to parse input: {err}")));
    let status = outcome_status(&failure);
    if batch {
        let body = paths.split(',').map(|path| envelope(path, &failure)).collect();
        (status, Value::Array(body))
    } else {
        (status, envelope(paths, &failure))
    }
}

/// The shared status when every call agrees, `207 Multi-Status` otherwise.
pub fn batch_status(statuses: impl IntoIterator<Item = StatusCode>) -> StatusCode {
    let mut statuses = statuses.into_iter();
    let Some(first) = statuses.next() else {
        return StatusCode::OK;
    };
    if statuses.all(|status| status == first) {
        first
    } else {
        StatusCode::MULTI_STATUS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_batches_keep_their_status() {
        assert_eq!(batch_status([StatusCode::OK, StatusCode::OK]), StatusCode::OK);
        assert_eq!(
            batch_status([StatusCode::UNAUTHORIZED, StatusCode::UNAUTHORIZED]),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(batch_status([]), StatusCode::OK);
    }

    #[test]
    fn mixed_batches_are_multi_status() {
        assert_eq!(
            batch_status([StatusCode::OK, StatusCode::BAD_REQUEST]),
            StatusCode::MULTI_STATUS
        );
    }

    #[test]
    fn parse_failure_covers_every_call() {
        let err = serde_json::from_str::<Value>("{not json").unwrap_err();
        let (status, body) = parse_failure("a,b", true, &err);
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let items = body.as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1]["error"]["data"]["code"], "PARSE_ERROR");
        assert_eq!(items[1]["error"]["data"]["path"], "b");
    }
}
