//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument and return storage rows.

pub mod company_repo;
pub mod vehicle_log_repo;

pub use company_repo::CompanyRepo;
pub use vehicle_log_repo::VehicleLogRepo;
