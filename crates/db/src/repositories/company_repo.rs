//! Repository for the `companies` table.

use sqlx::PgPool;

use crate::models::company::CompanyRow;

/// Column list for `companies` queries.
const COLUMNS: &str = "id, name, is_active, created_at";

/// Provides data access for companies.
pub struct CompanyRepo;

impl CompanyRepo {
    /// List active companies, ordered by name ascending.
    pub async fn list_active(pool: &PgPool) -> Result<Vec<CompanyRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM companies \
             WHERE is_active = true \
             ORDER BY name ASC"
        );
        sqlx::query_as::<_, CompanyRow>(&query)
            .fetch_all(pool)
            .await
    }

    /// Create a company. Fails with a unique violation on
    /// `uq_companies_name` when the name is taken.
    pub async fn create(pool: &PgPool, name: &str) -> Result<CompanyRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO companies (name) \
             VALUES ($1) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CompanyRow>(&query)
            .bind(name)
            .fetch_one(pool)
            .await
    }
}
