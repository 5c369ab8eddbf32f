//! PostgreSQL backend over a sqlx connection pool.

use async_trait::async_trait;

use super::{StoreError, WeighingStore};
use crate::mapping::map_rows;
use crate::models::company::Company;
use crate::models::vehicle_log::{NewVehicleLog, NewVehicleLogRow, VehicleLog};
use crate::repositories::{CompanyRepo, VehicleLogRepo};
use crate::DbPool;

/// [`WeighingStore`] backed by a pooled PostgreSQL connection set.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl WeighingStore for PgStore {
    fn backend_tag(&self) -> &'static str {
        "postgres"
    }

    async fn create_vehicle_log(&self, input: &NewVehicleLog) -> Result<VehicleLog, StoreError> {
        let row = VehicleLogRepo::create(&self.pool, &NewVehicleLogRow::from(input)).await?;
        Ok(row.into())
    }

    async fn vehicle_logs(&self, limit: i64, offset: i64) -> Result<Vec<VehicleLog>, StoreError> {
        let rows = VehicleLogRepo::list(&self.pool, limit, offset).await?;
        Ok(map_rows(rows))
    }

    async fn active_companies(&self) -> Result<Vec<Company>, StoreError> {
        let rows = CompanyRepo::list_active(&self.pool).await?;
        Ok(map_rows(rows))
    }

    async fn create_company(&self, name: &str) -> Result<Company, StoreError> {
        let row = CompanyRepo::create(&self.pool, name).await?;
        Ok(row.into())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        crate::health_check(&self.pool).await.map_err(StoreError::from)
    }

    async fn close(&self) {
        self.pool.close().await;
        tracing::info!("PostgreSQL pool closed");
    }
}
