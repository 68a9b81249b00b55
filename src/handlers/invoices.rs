// handlers/invoices.rs - /invoices resource

use std::num::IntErrorKind;

use axum::extract::{Path, State};
use serde_json::{json, Value};
use tracing::info;

use crate::api::{ApiResponse, ApiResult, Payload};
use crate::app::AppState;
use crate::error::ApiError;
use crate::validate;

/// Integers outside the `i32` id range can never match a row, so they are a 404
fn parse_id(raw: &str) -> Result<i32, ApiError> {
    raw.parse::<i32>().map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
            ApiError::not_found(format!("Couldn't find invoice with id: {}", raw))
        }
        _ => ApiError::bad_request(format!("Invoice id must be an integer, got: {}", raw)),
    })
}

fn invoice_not_found(id: i32) -> ApiError {
    ApiError::not_found(format!("Couldn't find invoice with id: {}", id))
}

/// GET /invoices - List all invoices
pub async fn list(State(state): State<AppState>) -> ApiResult<Value> {
    let invoices = state.store.list_invoices().await?;
    Ok(ApiResponse::success(json!({ "invoices": invoices })))
}

/// GET /invoices/:id - Invoice with its owning company nested under `company`
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Value> {
    let id = parse_id(&id)?;
    let invoice = state
        .store
        .find_invoice_detail(id)
        .await?
        .ok_or_else(|| invoice_not_found(id))?;

    Ok(ApiResponse::success(json!({ "invoice": invoice })))
}

/// POST /invoices - Create an invoice for an existing company.
///
/// An unknown `comp_code` is rejected by the store's foreign key and
/// surfaces as a 500.
pub async fn create(State(state): State<AppState>, payload: Payload) -> ApiResult<Value> {
    let input = validate::new_invoice(&payload)?;
    let invoice = state.store.insert_invoice(&input.comp_code, input.amt).await?;

    info!(id = invoice.id, comp_code = %invoice.comp_code, "created invoice");
    Ok(ApiResponse::created(json!({ "invoice": invoice })))
}

/// PUT /invoices/:id - Change the amount.
///
/// Existence is checked before the body, so an unknown id is a 404 even
/// when `amt` is missing.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Payload,
) -> ApiResult<Value> {
    let id = parse_id(&id)?;
    if state.store.find_invoice(id).await?.is_none() {
        return Err(invoice_not_found(id));
    }

    let amt = validate::invoice_amount(&payload)?;
    let invoice = state
        .store
        .update_invoice_amount(id, amt)
        .await?
        .ok_or_else(|| invoice_not_found(id))?;

    Ok(ApiResponse::success(json!({ "invoice": invoice })))
}

/// DELETE /invoices/:id
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Value> {
    let id = parse_id(&id)?;
    if !state.store.delete_invoice(id).await? {
        return Err(invoice_not_found(id));
    }

    info!(id, "deleted invoice");
    Ok(ApiResponse::success(json!({ "status": "deleted" })))
}
