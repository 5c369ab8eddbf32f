//! `weighing.*` procedures: weigh-in records and companies.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use weighbridge_core::error::{CoreError, FieldErrors};
use weighbridge_core::log_filter::{summarize, LogFilter, LogSummary};
use weighbridge_core::weighing::{
    format_weight, AddCompanyInput, CreateVehicleLogInput, ListVehicleLogsInput, NoInput,
    SearchVehicleLogsInput,
};
use weighbridge_db::models::company::Company;
use weighbridge_db::models::vehicle_log::{NewVehicleLog, VehicleLog};
use weighbridge_db::store::WeighingStore;

use crate::error::AppResult;
use crate::rpc::{Access, CallContext, RpcRouter};

pub fn register(router: RpcRouter) -> RpcRouter {
    router
        .query("weighing.testConnection", Access::Public, test_connection)
        .mutation("weighing.create", Access::Public, create)
        .query("weighing.list", Access::Authenticated, list)
        .query("weighing.getCompanies", Access::Public, get_companies)
        .mutation("weighing.addCompany", Access::Authenticated, add_company)
        .query("weighing.search", Access::Authenticated, search)
}

// ---------------------------------------------------------------------------
// Output shapes
// ---------------------------------------------------------------------------

/// Result of `weighing.testConnection`. Storage failures are reported here
/// rather than as an RPC error.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionReport {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub companies_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of `weighing.search`.
#[derive(Debug, Serialize)]
pub struct SearchResult {
    pub logs: Vec<VehicleLog>,
    pub summary: LogSummary,
}

// ---------------------------------------------------------------------------
// Procedures
// ---------------------------------------------------------------------------

async fn store(ctx: &CallContext) -> AppResult<Arc<dyn WeighingStore>> {
    Ok(ctx.state.store.get().await?)
}

async fn test_connection(ctx: CallContext, _input: NoInput) -> AppResult<ConnectionReport> {
    let result = match ctx.state.store.get().await {
        Ok(store) => store.active_companies().await,
        Err(e) => Err(e),
    };

    Ok(match result {
        Ok(companies) => ConnectionReport {
            success: true,
            message: "Database connection successful".to_string(),
            companies_count: Some(companies.len()),
            error: None,
        },
        Err(err) => {
            tracing::error!(error = %err, "Database connection test failed");
            ConnectionReport {
                success: false,
                message: err.to_string(),
                companies_count: None,
                error: Some(format!("{err:?}")),
            }
        }
    })
}

async fn create(ctx: CallContext, input: CreateVehicleLogInput) -> AppResult<VehicleLog> {
    let weight = format_weight(input.weight)?;
    let store = store(&ctx).await?;

    if ctx.state.config.require_known_company {
        let companies = store.active_companies().await?;
        if !companies.iter().any(|c| c.name == input.company) {
            let mut fields = FieldErrors::new();
            fields.add("company", "is not an active company");
            return Err(CoreError::InvalidInput(fields).into());
        }
    }

    let new_log = NewVehicleLog {
        location: input.location,
        company: input.company,
        driver_name: input.driver_name,
        phone_number: input.phone_number,
        weight,
        photo_url: input.photo_url,
    };
    let log = store.create_vehicle_log(&new_log).await?;

    tracing::info!(
        log_id = %log.id,
        company = %log.company,
        weight = %log.weight,
        "Vehicle log created"
    );
    Ok(log)
}

async fn list(ctx: CallContext, input: ListVehicleLogsInput) -> AppResult<Vec<VehicleLog>> {
    let logs = store(&ctx)
        .await?
        .vehicle_logs(input.limit(), input.offset())
        .await?;
    Ok(logs)
}

async fn get_companies(ctx: CallContext, _input: NoInput) -> AppResult<Vec<Company>> {
    Ok(store(&ctx).await?.active_companies().await?)
}

async fn add_company(ctx: CallContext, input: AddCompanyInput) -> AppResult<Company> {
    let company = store(&ctx)
        .await?
        .create_company(input.name.trim())
        .await?;
    tracing::info!(
        company_id = %company.id,
        name = %company.name,
        user_id = ?ctx.user.as_ref().map(|u| u.user_id),
        "Company added"
    );
    Ok(company)
}

async fn search(ctx: CallContext, input: SearchVehicleLogsInput) -> AppResult<SearchResult> {
    let logs = store(&ctx).await?.vehicle_logs(input.limit(), 0).await?;
    let filter = LogFilter::new(input.search.as_deref(), input.date);
    let logs = filter.apply(logs);
    let summary = summarize(&logs, Utc::now().date_naive());
    Ok(SearchResult { logs, summary })
}
