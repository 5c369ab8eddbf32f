//! The process-wide store.
//!
//! [`StoreProvider`] builds the configured backend the first time a caller
//! needs it and keeps it for the life of the process. A failed connection
//! attempt is reported to that caller as [`StoreError::Unavailable`] and
//! retried by the next one. [`StoreProvider::shutdown`] closes the backend
//! during graceful shutdown.

use std::sync::Arc;

use tokio::sync::OnceCell;
use weighbridge_db::store::{MemoryStore, PgStore, StoreError, WeighingStore};
use weighbridge_supabase::{PostgrestStore, SupabaseProject};

use crate::config::{StoreBackend, StoreConfig};

pub struct StoreProvider {
    backend: StoreBackend,
    /// How to connect. `None` when the provider wraps a pre-built store.
    source: Option<(StoreConfig, SupabaseProject)>,
    store: OnceCell<Arc<dyn WeighingStore>>,
}

impl StoreProvider {
    pub fn new(config: StoreConfig, project: SupabaseProject) -> Self {
        Self {
            backend: config.backend,
            source: Some((config, project)),
            store: OnceCell::new(),
        }
    }

    /// A provider around an already-built store.
    pub fn with_store(backend: StoreBackend, store: Arc<dyn WeighingStore>) -> Self {
        Self {
            backend,
            source: None,
            store: OnceCell::new_with(Some(store)),
        }
    }

    pub fn backend(&self) -> StoreBackend {
        self.backend
    }

    /// The store, connecting on first use.
    pub async fn get(&self) -> Result<Arc<dyn WeighingStore>, StoreError> {
        self.store
            .get_or_try_init(|| self.connect())
            .await
            .map(Arc::clone)
    }

    /// Close the store if it was ever opened.
    pub async fn shutdown(&self) {
        if let Some(store) = self.store.get() {
            store.close().await;
            tracing::info!(backend = %self.backend, "Store closed");
        }
    }

    async fn connect(&self) -> Result<Arc<dyn WeighingStore>, StoreError> {
        let Some((config, project)) = &self.source else {
            return Err(StoreError::Unavailable("no store configured".to_string()));
        };
        let store: Arc<dyn WeighingStore> = match self.backend {
            StoreBackend::Postgres => {
                let url = config.database_url.as_deref().ok_or_else(|| {
                    StoreError::Unavailable("DATABASE_URL is not configured".to_string())
                })?;
                let pool = weighbridge_db::create_pool(url, config.max_connections)
                    .await
                    .inspect_err(|e| tracing::error!(error = %e, "Database connection failed"))?;
                if config.run_migrations {
                    weighbridge_db::run_migrations(&pool).await.map_err(|e| {
                        tracing::error!(error = %e, "Database migrations failed");
                        StoreError::Unavailable(format!("migrations failed: {e}"))
                    })?;
                    tracing::info!("Database migrations applied");
                }
                Arc::new(PgStore::new(pool))
            }
            StoreBackend::Supabase => Arc::new(PostgrestStore::new(project)?),
            StoreBackend::Memory => Arc::new(MemoryStore::new()),
        };
        tracing::info!(backend = store.backend_tag(), "Store initialised");
        Ok(store)
    }
}
