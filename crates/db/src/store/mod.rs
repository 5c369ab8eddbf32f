//! The data-access contract shared by every storage backend.
//!
//! [`WeighingStore`] exposes exactly four data operations. Backends differ
//! only in transport; input/output shapes and error semantics are the same,
//! so the RPC layer never needs to know which one is configured.
//!
//! - [`pg::PgStore`] -- pooled PostgreSQL connections via sqlx.
//! - [`memory::MemoryStore`] -- in-process tables for local runs and tests.
//!
//! The hosted REST backend lives in `weighbridge-supabase`.

use async_trait::async_trait;

use crate::models::company::Company;
use crate::models::vehicle_log::{NewVehicleLog, VehicleLog};

pub mod memory;
pub mod pg;

pub use memory::MemoryStore;
pub use pg::PgStore;

/// Failure talking to, or being rejected by, the storage backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The backend could not be reached (connection refused, pool exhausted,
    /// TLS failure, misconfiguration).
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// The write violated an integrity constraint, e.g. a duplicate company name.
    #[error("Constraint violation on {constraint}: {message}")]
    ConstraintViolation { constraint: String, message: String },

    /// The backend was reachable but the query failed.
    #[error("Query failed: {0}")]
    Query(String),
}

impl StoreError {
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, StoreError::ConstraintViolation { .. })
    }
}

/// SQLSTATE class 23 covers every integrity constraint violation.
pub fn is_integrity_violation(sqlstate: &str) -> bool {
    sqlstate.starts_with("23")
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) => {
                let is_constraint = db_err
                    .code()
                    .is_some_and(|code| is_integrity_violation(&code));
                if is_constraint {
                    StoreError::ConstraintViolation {
                        constraint: db_err.constraint().unwrap_or("unknown").to_string(),
                        message: db_err.message().to_string(),
                    }
                } else {
                    StoreError::Query(db_err.message().to_string())
                }
            }
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
            | sqlx::Error::Configuration(_) => StoreError::Unavailable(err.to_string()),
            _ => StoreError::Query(err.to_string()),
        }
    }
}

/// Storage for weigh-in records and companies.
#[async_trait]
pub trait WeighingStore: Send + Sync + 'static {
    /// Short backend label for logs and the health endpoint.
    fn backend_tag(&self) -> &'static str;

    /// Insert one weigh-in and return it with its generated id and timestamp.
    async fn create_vehicle_log(&self, input: &NewVehicleLog) -> Result<VehicleLog, StoreError>;

    /// Weigh-ins newest first: skip `offset`, return at most `limit`.
    async fn vehicle_logs(&self, limit: i64, offset: i64) -> Result<Vec<VehicleLog>, StoreError>;

    /// Companies with `is_active = true`, ordered by name ascending.
    async fn active_companies(&self) -> Result<Vec<Company>, StoreError>;

    /// Insert a company (active by default). Duplicate names fail with
    /// [`StoreError::ConstraintViolation`] and create nothing.
    async fn create_company(&self, name: &str) -> Result<Company, StoreError>;

    /// Cheapest call proving the backend is reachable.
    async fn health_check(&self) -> Result<(), StoreError> {
        self.active_companies().await.map(|_| ())
    }

    /// Release pooled resources. Called once during graceful shutdown.
    async fn close(&self) {}
}
