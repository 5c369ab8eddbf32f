//! Repository for the `vehicle_logs` table.

use sqlx::PgPool;

use crate::models::vehicle_log::{NewVehicleLogRow, VehicleLogRow};

/// Column list for `vehicle_logs` queries. `weight` is read back as text so
/// the fixed-point scale survives untouched.
const COLUMNS: &str = "\
    id, location, company, driver_name, phone_number, \
    weight::text AS weight, photo_url, created_at";

/// Provides data access for weigh-in records.
pub struct VehicleLogRepo;

impl VehicleLogRepo {
    /// Insert one weigh-in, returning the stored row with its generated
    /// `id` and `created_at`.
    pub async fn create(pool: &PgPool, input: &NewVehicleLogRow) -> Result<VehicleLogRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO vehicle_logs \
                 (location, company, driver_name, phone_number, weight, photo_url) \
             VALUES ($1, $2, $3, $4, $5::numeric, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, VehicleLogRow>(&query)
            .bind(&input.location)
            .bind(&input.company)
            .bind(&input.driver_name)
            .bind(&input.phone_number)
            .bind(&input.weight)
            .bind(&input.photo_url)
            .fetch_one(pool)
            .await
    }

    /// List weigh-ins newest first, ties broken by id. The caller validates `limit` and `offset`.
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<VehicleLogRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM vehicle_logs \
             ORDER BY created_at DESC, id DESC \
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, VehicleLogRow>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }
}
