//! Domain types and rules shared by every weighbridge crate.
//!
//! Nothing in here touches storage or HTTP: the procedure input shapes and
//! their validation, weight formatting, and the admin log filter are plain
//! functions over plain data so they can be tested without a database.

pub mod error;
pub mod log_filter;
pub mod types;
pub mod weighing;
