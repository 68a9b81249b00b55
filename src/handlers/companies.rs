// handlers/companies.rs - /companies resource

use axum::extract::{Path, State};
use serde_json::{json, Value};
use tracing::info;

use crate::api::{ApiResponse, ApiResult, Payload};
use crate::app::AppState;
use crate::database::models::CompanyDetail;
use crate::error::ApiError;
use crate::validate;

fn company_not_found(code: &str) -> ApiError {
    ApiError::not_found(format!("Couldn't find company with code: {}", code))
}

/// GET /companies - List all companies
pub async fn list(State(state): State<AppState>) -> ApiResult<Value> {
    let companies = state.store.list_companies().await?;
    Ok(ApiResponse::success(json!({ "companies": companies })))
}

/// GET /companies/:code - Company with its invoices and industry labels
///
/// The enrichment queries only run once the company is known to exist.
pub async fn show(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> ApiResult<Value> {
    let company = state
        .store
        .find_company(&code)
        .await?
        .ok_or_else(|| company_not_found(&code))?;

    let invoices = state.store.company_invoices(&code).await?;
    let industries = state.store.company_industries(&code).await?;

    let company = CompanyDetail {
        company,
        invoices,
        industries,
    };
    Ok(ApiResponse::success(json!({ "company": company })))
}

/// POST /companies - Create a company; its code is derived from the name
pub async fn create(State(state): State<AppState>, payload: Payload) -> ApiResult<Value> {
    let company = validate::new_company(&payload)?;
    let company = state.store.insert_company(&company).await?;

    info!(code = %company.code, "created company");
    Ok(ApiResponse::created(json!({ "company": company })))
}

/// PUT /companies/:code - Replace name and description
pub async fn update(
    State(state): State<AppState>,
    Path(code): Path<String>,
    payload: Payload,
) -> ApiResult<Value> {
    let changes = validate::company_changes(&payload)?;
    let company = state
        .store
        .update_company(&code, &changes.name, &changes.description)
        .await?
        .ok_or_else(|| company_not_found(&code))?;

    Ok(ApiResponse::success(json!({ "company": company })))
}

/// DELETE /companies/:code
pub async fn delete(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> ApiResult<Value> {
    if !state.store.delete_company(&code).await? {
        return Err(company_not_found(&code));
    }

    info!(%code, "deleted company");
    Ok(ApiResponse::success(json!({ "status": "deleted" })))
}
