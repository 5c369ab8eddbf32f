use std::sync::Arc;

use crate::auth::provider::IdentityProvider;
use crate::config::ServerConfig;
use crate::procedures;
use crate::rpc::RpcRouter;
use crate::storage::StoreProvider;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Process-wide store, connected on first use.
    pub store: Arc<StoreProvider>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Hosted identity service (sign-in, refresh, sign-out).
    pub identity: Arc<dyn IdentityProvider>,
    /// Registered RPC procedures.
    pub rpc: Arc<RpcRouter>,
}

impl AppState {
    pub fn new(
        config: ServerConfig,
        store: Arc<StoreProvider>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            store,
            config: Arc::new(config),
            identity,
            rpc: Arc::new(procedures::app_router()),
        }
    }
}
