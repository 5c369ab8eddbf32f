//! Weigh-in record models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use weighbridge_core::log_filter::LogFields;
use weighbridge_core::types::{RecordId, Timestamp};

// ---------------------------------------------------------------------------
// Storage rows
// ---------------------------------------------------------------------------

/// A row from the `vehicle_logs` table.
///
/// `weight` is selected as `weight::text`, so it always carries the
/// `NUMERIC(10, 2)` canonical form (`"1234.50"`).
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct VehicleLogRow {
    pub id: RecordId,
    pub location: String,
    pub company: String,
    pub driver_name: String,
    pub phone_number: String,
    pub weight: String,
    pub photo_url: Option<String>,
    pub created_at: Timestamp,
}

/// Insert payload for `vehicle_logs`, in column naming.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewVehicleLogRow {
    pub location: String,
    pub company: String,
    pub driver_name: String,
    pub phone_number: String,
    pub weight: String,
    pub photo_url: Option<String>,
}

// ---------------------------------------------------------------------------
// Application records
// ---------------------------------------------------------------------------

/// One weigh-in, as returned to RPC callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct VehicleLog {
    pub id: RecordId,
    pub location: String,
    pub company: String,
    pub driver_name: String,
    pub phone_number: String,
    pub weight: String,
    pub photo_url: Option<String>,
    pub created_at: Timestamp,
}

/// A weigh-in to be created. `weight` is already in fixed-point text form.
#[derive(Debug, Clone, PartialEq)]
pub struct NewVehicleLog {
    pub location: String,
    pub company: String,
    pub driver_name: String,
    pub phone_number: String,
    pub weight: String,
    pub photo_url: Option<String>,
}

impl LogFields for VehicleLog {
    fn driver_name(&self) -> &str {
        &self.driver_name
    }

    fn company(&self) -> &str {
        &self.company
    }

    fn location(&self) -> &str {
        &self.location
    }

    fn created_at(&self) -> Timestamp {
        self.created_at
    }
}
