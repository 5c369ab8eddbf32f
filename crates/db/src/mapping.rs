//! Field mapping between storage rows and application records.
//!
//! Storage uses snake_case column names (`driver_name`, `phone_number`,
//! `photo_url`, `is_active`, `created_at`); the application speaks camelCase
//! (`driverName`, ...). The structs carry the naming through serde, and the
//! conversions below move values across without touching them, so a
//! row -> record -> row round-trip is the identity.

use crate::models::company::{Company, CompanyRow, NewCompanyRow};
use crate::models::vehicle_log::{NewVehicleLog, NewVehicleLogRow, VehicleLog, VehicleLogRow};

impl From<VehicleLogRow> for VehicleLog {
    fn from(row: VehicleLogRow) -> Self {
        Self {
            id: row.id,
            location: row.location,
            company: row.company,
            driver_name: row.driver_name,
            phone_number: row.phone_number,
            weight: row.weight,
            photo_url: row.photo_url,
            created_at: row.created_at,
        }
    }
}

impl From<VehicleLog> for VehicleLogRow {
    fn from(log: VehicleLog) -> Self {
        Self {
            id: log.id,
            location: log.location,
            company: log.company,
            driver_name: log.driver_name,
            phone_number: log.phone_number,
            weight: log.weight,
            photo_url: log.photo_url,
            created_at: log.created_at,
        }
    }
}

impl From<&NewVehicleLog> for NewVehicleLogRow {
    fn from(input: &NewVehicleLog) -> Self {
        Self {
            location: input.location.clone(),
            company: input.company.clone(),
            driver_name: input.driver_name.clone(),
            phone_number: input.phone_number.clone(),
            weight: input.weight.clone(),
            photo_url: input.photo_url.clone(),
        }
    }
}

impl From<CompanyRow> for Company {
    fn from(row: CompanyRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            is_active: row.is_active,
            created_at: row.created_at,
        }
    }
}

impl From<Company> for CompanyRow {
    fn from(company: Company) -> Self {
        Self {
            id: company.id,
            name: company.name,
            is_active: company.is_active,
            created_at: company.created_at,
        }
    }
}

impl From<&str> for NewCompanyRow {
    fn from(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

/// Map a batch of rows into application records, preserving order.
pub fn map_rows<R, T: From<R>>(rows: Vec<R>) -> Vec<T> {
    rows.into_iter().map(T::from).collect()
}
