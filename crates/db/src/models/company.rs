//! Company models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use weighbridge_core::types::{RecordId, Timestamp};

/// A row from the `companies` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct CompanyRow {
    pub id: RecordId,
    pub name: String,
    pub is_active: bool,
    pub created_at: Timestamp,
}

/// Insert payload for `companies`. `is_active` is left to the column default.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewCompanyRow {
    pub name: String,
}

/// A selectable company, as returned to RPC callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Company {
    pub id: RecordId,
    pub name: String,
    pub is_active: bool,
    pub created_at: Timestamp,
}
