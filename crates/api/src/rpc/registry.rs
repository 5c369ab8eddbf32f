//! Procedure registry.
//!
//! Each procedure is registered with a path, a kind (query or mutation) and
//! an access level. Registration erases the input/output types: the stored
//! handler decodes and validates its JSON input, runs, and serializes the
//! output, so the dispatcher only deals in `serde_json::Value`.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use validator::Validate;
use weighbridge_core::weighing::validate_input;

use super::protocol::{RpcError, RpcErrorCode};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcedureKind {
    Query,
    Mutation,
}

impl ProcedureKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ProcedureKind::Query => "query",
            ProcedureKind::Mutation => "mutation",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    /// Requires a signed-in user; rejected with `UNAUTHORIZED` otherwise.
    Authenticated,
}

/// What a procedure gets besides its input.
#[derive(Clone)]
pub struct CallContext {
    pub state: AppState,
    pub user: Option<AuthUser>,
}

type Handler =
    Arc<dyn Fn(CallContext, Value) -> BoxFuture<'static, Result<Value, RpcError>> + Send + Sync>;

struct Procedure {
    kind: ProcedureKind,
    access: Access,
    handler: Handler,
}

/// Path-addressed procedures.
#[derive(Default)]
pub struct RpcRouter {
    procedures: HashMap<String, Procedure>,
}

impl RpcRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query<I, O, F, Fut>(self, path: &str, access: Access, handler: F) -> Self
    where
        I: DeserializeOwned + Validate + Send + 'static,
        O: Serialize + Send + 'static,
        F: Fn(CallContext, I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = AppResult<O>> + Send + 'static,
    {
        self.register(path, ProcedureKind::Query, access, handler)
    }

    pub fn mutation<I, O, F, Fut>(self, path: &str, access: Access, handler: F) -> Self
    where
        I: DeserializeOwned + Validate + Send + 'static,
        O: Serialize + Send + 'static,
        F: Fn(CallContext, I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = AppResult<O>> + Send + 'static,
    {
        self.register(path, ProcedureKind::Mutation, access, handler)
    }

    fn register<I, O, F, Fut>(
        mut self,
        path: &str,
        kind: ProcedureKind,
        access: Access,
        handler: F,
    ) -> Self
    where
        I: DeserializeOwned + Validate + Send + 'static,
        O: Serialize + Send + 'static,
        F: Fn(CallContext, I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = AppResult<O>> + Send + 'static,
    {
        let handler = Arc::new(handler);
        let erased: Handler = Arc::new(move |ctx: CallContext, raw: Value| {
            let handler = Arc::clone(&handler);
            async move {
                let input: I = serde_json::from_value(raw)
                    .map_err(|e| RpcError::new(RpcErrorCode::BadRequest, e.to_string()))?;
                validate_input(&input).map_err(|e| RpcError::from(AppError::Core(e)))?;
                let output = (*handler)(ctx, input).await.map_err(RpcError::from)?;
                serde_json::to_value(output)
                    .map_err(|e| RpcError::new(RpcErrorCode::InternalServerError, e.to_string()))
            }
            .boxed()
        });

        let previous = self.procedures.insert(
            path.to_string(),
            Procedure {
                kind,
                access,
                handler: erased,
            },
        );
        assert!(previous.is_none(), "procedure '{path}' registered twice");
        self
    }

    /// Registered paths, sorted.
    pub fn paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = self.procedures.keys().map(String::as_str).collect();
        paths.sort_unstable();
        paths
    }

    /// Resolve and run one call.
    ///
    /// A missing or `null` input is passed to the procedure as `{}`.
    pub async fn call(
        &self,
        path: &str,
        kind: ProcedureKind,
        ctx: CallContext,
        input: Option<Value>,
    ) -> Result<Value, RpcError> {
        let procedure = self
            .procedures
            .get(path)
            .ok_or_else(|| RpcError::not_found(path))?;

        if procedure.kind != kind {
            return Err(RpcError::new(
                RpcErrorCode::MethodNotSupported,
                format!(
                    "Unsupported {} call on {} procedure \"{path}\"",
                    kind.as_str(),
                    procedure.kind.as_str()
                ),
            ));
        }

        if procedure.access == Access::Authenticated && ctx.user.is_none() {
            return Err(RpcError::unauthorized());
        }

        let input = match input {
            None | Some(Value::Null) => Value::Object(Default::default()),
            Some(value) => value,
        };

        let result = (procedure.handler)(ctx, input).await;
        match &result {
            Ok(_) => tracing::debug!(path, "Procedure succeeded"),
            Err(err) if err.code == RpcErrorCode::InternalServerError => {
                tracing::error!(path, error = %err.message, "Procedure failed");
            }
            Err(err) => tracing::info!(path, code = err.code.as_str(), error = %err.message, "Procedure rejected"),
        }
        result
    }
}
