pub mod company;
pub mod vehicle_log;
