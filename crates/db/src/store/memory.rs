//! In-process backend with the same ordering and uniqueness rules as the
//! SQL schema. Used for local runs without a database and by API tests.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;
use weighbridge_core::weighing::format_weight;

use super::{StoreError, WeighingStore};
use crate::models::company::{Company, CompanyRow};
use crate::models::vehicle_log::{NewVehicleLog, VehicleLog, VehicleLogRow};

/// Name of the unique constraint on `companies.name` in the SQL schema.
const COMPANY_NAME_CONSTRAINT: &str = "uq_companies_name";

/// [`WeighingStore`] holding rows in memory. Rows are kept in insertion order.
#[derive(Default)]
pub struct MemoryStore {
    logs: RwLock<Vec<VehicleLogRow>>,
    companies: RwLock<Vec<CompanyRow>>,
    unavailable: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a company row as-is, e.g. an inactive one.
    pub async fn seed_company(&self, row: CompanyRow) {
        self.companies.write().await.push(row);
    }

    /// Make every call fail with [`StoreError::Unavailable`] until reset.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn ensure_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(
                "memory store is marked unavailable".to_string(),
            ));
        }
        Ok(())
    }
}

/// Mirror `NUMERIC(10, 2)`: reject non-numbers and overflow, normalize scale.
fn normalize_weight(weight: &str) -> Result<String, StoreError> {
    let value: f64 = weight.trim().parse().map_err(|_| {
        StoreError::Query(format!("invalid input syntax for type numeric: \"{weight}\""))
    })?;
    format_weight(value).map_err(|_| StoreError::Query("numeric field overflow".to_string()))
}

#[async_trait]
impl WeighingStore for MemoryStore {
    fn backend_tag(&self) -> &'static str {
        "memory"
    }

    async fn create_vehicle_log(&self, input: &NewVehicleLog) -> Result<VehicleLog, StoreError> {
        self.ensure_available()?;
        let row = VehicleLogRow {
            id: Uuid::new_v4(),
            location: input.location.clone(),
            company: input.company.clone(),
            driver_name: input.driver_name.clone(),
            phone_number: input.phone_number.clone(),
            weight: normalize_weight(&input.weight)?,
            photo_url: input.photo_url.clone(),
            created_at: Utc::now(),
        };
        self.logs.write().await.push(row.clone());
        Ok(row.into())
    }

    async fn vehicle_logs(&self, limit: i64, offset: i64) -> Result<Vec<VehicleLog>, StoreError> {
        self.ensure_available()?;
        let logs = self.logs.read().await;
        // Newest insertion first; the stable sort keeps that order among
        // equal timestamps.
        let mut rows: Vec<&VehicleLogRow> = logs.iter().rev().collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .map(VehicleLog::from)
            .collect())
    }

    async fn active_companies(&self) -> Result<Vec<Company>, StoreError> {
        self.ensure_available()?;
        let mut rows: Vec<CompanyRow> = self
            .companies
            .read()
            .await
            .iter()
            .filter(|c| c.is_active)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows.into_iter().map(Company::from).collect())
    }

    async fn create_company(&self, name: &str) -> Result<Company, StoreError> {
        self.ensure_available()?;
        let mut companies = self.companies.write().await;
        if companies.iter().any(|c| c.name == name) {
            return Err(StoreError::ConstraintViolation {
                constraint: COMPANY_NAME_CONSTRAINT.to_string(),
                message: format!(
                    "duplicate key value violates unique constraint \"{COMPANY_NAME_CONSTRAINT}\""
                ),
            });
        }
        let row = CompanyRow {
            id: Uuid::new_v4(),
            name: name.to_string(),
            is_active: true,
            created_at: Utc::now(),
        };
        companies.push(row.clone());
        Ok(row.into())
    }
}
