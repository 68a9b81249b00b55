// handlers/industries.rs - /industries resource and company associations

use axum::extract::{Path, State};
use serde_json::{json, Value};
use tracing::info;

use crate::api::{ApiResponse, ApiResult, Payload};
use crate::app::AppState;
use crate::database::models::IndustrySummary;
use crate::error::ApiError;
use crate::validate;

/// GET /industries - Every industry with the codes of its companies.
///
/// One query for the industries, then one per industry in list order.
pub async fn list(State(state): State<AppState>) -> ApiResult<Value> {
    let rows = state.store.list_industries().await?;

    let mut industries = Vec::with_capacity(rows.len());
    for industry in rows {
        let companies = state.store.industry_company_codes(&industry.code).await?;
        industries.push(IndustrySummary {
            industry,
            companies,
        });
    }

    Ok(ApiResponse::success(json!({ "industries": industries })))
}

/// POST /industries - Create an industry
pub async fn create(State(state): State<AppState>, payload: Payload) -> ApiResult<Value> {
    let industry = validate::new_industry(&payload)?;
    let industry = state.store.insert_industry(&industry).await?;

    info!(code = %industry.code, "created industry");
    Ok(ApiResponse::created(json!({ "industry": industry })))
}

/// POST /industries/:ind_code - Link a company to the industry
pub async fn associate(
    State(state): State<AppState>,
    Path(ind_code): Path<String>,
    payload: Payload,
) -> ApiResult<Value> {
    let company_code = validate::association_company(&payload)?;

    if state.store.find_industry(&ind_code).await?.is_none() {
        return Err(ApiError::not_found(format!(
            "Couldn't find industry with code: {}",
            ind_code
        )));
    }
    if state.store.find_company(&company_code).await?.is_none() {
        return Err(ApiError::not_found(format!(
            "Couldn't find company with code: {}",
            company_code
        )));
    }

    let association = state
        .store
        .insert_association(&company_code, &ind_code)
        .await?;

    info!(comp_code = %association.comp_code, indus_code = %association.indus_code, "associated company with industry");
    Ok(ApiResponse::success(json!({
        "msg": "Association created.",
        "association": association,
    })))
}
