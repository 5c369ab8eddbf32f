//! [`WeighingStore`] over the PostgREST HTTP dialect.
//!
//! Rows travel as snake_case JSON, so the same row structs and field mapping
//! used by the SQL backend apply unchanged. `weight` is selected as
//! `weight::text` to keep the `NUMERIC(10, 2)` canonical form.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use weighbridge_db::mapping::map_rows;
use weighbridge_db::models::company::{Company, CompanyRow, NewCompanyRow};
use weighbridge_db::models::vehicle_log::{
    NewVehicleLog, NewVehicleLogRow, VehicleLog, VehicleLogRow,
};
use weighbridge_db::store::{is_integrity_violation, StoreError, WeighingStore};

use crate::SupabaseProject;

const VEHICLE_LOGS: &str = "vehicle_logs";
const COMPANIES: &str = "companies";

/// Column list for `vehicle_logs` reads.
pub const LOG_SELECT: &str =
    "id,location,company,driver_name,phone_number,weight::text,photo_url,created_at";

/// Column list for `companies` reads.
pub const COMPANY_SELECT: &str = "id,name,is_active,created_at";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Error body returned by PostgREST on a rejected request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PostgrestErrorBody {
    /// SQLSTATE (`23505`) or a PostgREST code (`PGRST116`).
    pub code: Option<String>,
    pub message: Option<String>,
    pub details: Option<String>,
    pub hint: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum PostgrestError {
    /// The HTTP request itself failed (network, DNS, TLS, decoding).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// PostgREST answered with a non-2xx status.
    #[error("PostgREST error ({status}): {}", body.message.as_deref().unwrap_or("<no message>"))]
    Api {
        status: u16,
        body: PostgrestErrorBody,
    },

    /// A write succeeded but no representation came back.
    #[error("PostgREST returned no rows for {0}")]
    EmptyRepresentation(&'static str),

    #[error("API key is not a valid header value")]
    InvalidApiKey,
}

impl From<PostgrestError> for StoreError {
    fn from(err: PostgrestError) -> Self {
        match err {
            PostgrestError::Request(e) if e.is_connect() || e.is_timeout() => {
                StoreError::Unavailable(e.to_string())
            }
            PostgrestError::Api { status, body } => classify_rejection(status, body),
            other => StoreError::Query(other.to_string()),
        }
    }
}

/// Map a rejected PostgREST response to the store taxonomy.
pub fn classify_rejection(status: u16, body: PostgrestErrorBody) -> StoreError {
    let message = body
        .message
        .clone()
        .unwrap_or_else(|| format!("request rejected with status {status}"));
    let is_constraint =
        status == 409 || body.code.as_deref().is_some_and(is_integrity_violation);

    if is_constraint {
        let constraint = constraint_name(&message).unwrap_or("unknown").to_string();
        StoreError::ConstraintViolation {
            constraint,
            message,
        }
    } else {
        StoreError::Query(message)
    }
}

/// Pull the constraint out of a Postgres message such as
/// `duplicate key value violates unique constraint "uq_companies_name"`.
pub fn constraint_name(message: &str) -> Option<&str> {
    let (_, rest) = message.split_once("constraint \"")?;
    rest.split_once('"').map(|(name, _)| name)
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// [`WeighingStore`] backed by a project's PostgREST endpoint.
#[derive(Clone)]
pub struct PostgrestStore {
    client: reqwest::Client,
    rest_url: String,
    headers: HeaderMap,
}

impl PostgrestStore {
    pub fn new(project: &SupabaseProject) -> Result<Self, PostgrestError> {
        Self::with_client(reqwest::Client::new(), project)
    }

    /// Reuse an existing [`reqwest::Client`] (shared connection pool).
    pub fn with_client(
        client: reqwest::Client,
        project: &SupabaseProject,
    ) -> Result<Self, PostgrestError> {
        let mut headers = HeaderMap::new();
        headers.insert("apikey", header_value(project.anon_key())?);
        headers.insert(
            AUTHORIZATION,
            header_value(&format!("Bearer {}", project.anon_key()))?,
        );
        Ok(Self {
            client,
            rest_url: project.rest_url(),
            headers,
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{}", self.rest_url, table)
    }

    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, PostgrestError> {
        let response = self
            .client
            .get(self.table_url(table))
            .headers(self.headers.clone())
            .query(query)
            .send()
            .await?;
        parse_response(response).await
    }

    async fn insert<B: Serialize, T: DeserializeOwned>(
        &self,
        table: &'static str,
        select: &str,
        body: &B,
    ) -> Result<T, PostgrestError> {
        let response = self
            .client
            .post(self.table_url(table))
            .headers(self.headers.clone())
            .header("Prefer", "return=representation")
            .query(&[("select", select)])
            .json(body)
            .send()
            .await?;
        let rows: Vec<T> = parse_response(response).await?;
        rows.into_iter()
            .next()
            .ok_or(PostgrestError::EmptyRepresentation(table))
    }
}

#[async_trait]
impl WeighingStore for PostgrestStore {
    fn backend_tag(&self) -> &'static str {
        "supabase"
    }

    async fn create_vehicle_log(&self, input: &NewVehicleLog) -> Result<VehicleLog, StoreError> {
        let row: VehicleLogRow = self
            .insert(VEHICLE_LOGS, LOG_SELECT, &NewVehicleLogRow::from(input))
            .await?;
        Ok(row.into())
    }

    async fn vehicle_logs(&self, limit: i64, offset: i64) -> Result<Vec<VehicleLog>, StoreError> {
        let rows: Vec<VehicleLogRow> = self
            .select(
                VEHICLE_LOGS,
                &[
                    ("select", LOG_SELECT.to_string()),
                    ("order", "created_at.desc,id.desc".to_string()),
                    ("limit", limit.to_string()),
                    ("offset", offset.to_string()),
                ],
            )
            .await?;
        Ok(map_rows(rows))
    }

    async fn active_companies(&self) -> Result<Vec<Company>, StoreError> {
        let rows: Vec<CompanyRow> = self
            .select(
                COMPANIES,
                &[
                    ("select", COMPANY_SELECT.to_string()),
                    ("is_active", "eq.true".to_string()),
                    ("order", "name.asc".to_string()),
                ],
            )
            .await?;
        Ok(map_rows(rows))
    }

    async fn create_company(&self, name: &str) -> Result<Company, StoreError> {
        let row: CompanyRow = self
            .insert(COMPANIES, COMPANY_SELECT, &NewCompanyRow::from(name))
            .await?;
        Ok(row.into())
    }
}

// ---- private helpers ----

fn header_value(value: &str) -> Result<HeaderValue, PostgrestError> {
    HeaderValue::from_str(value).map_err(|_| PostgrestError::InvalidApiKey)
}

async fn parse_response<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, PostgrestError> {
    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        let body = serde_json::from_str::<PostgrestErrorBody>(&text).unwrap_or_else(|_| {
            PostgrestErrorBody {
                message: Some(text),
                ..Default::default()
            }
        });
        tracing::debug!(status = status.as_u16(), code = ?body.code, "PostgREST request rejected");
        return Err(PostgrestError::Api {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response.json::<T>().await?)
}
