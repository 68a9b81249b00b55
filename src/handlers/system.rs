// handlers/system.rs - service info, health probe and unmatched routes

use axum::{extract::State, http::{StatusCode, Uri}, response::{IntoResponse, Json}};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::error::ApiError;

/// GET / - Service name, version and endpoint map
pub async fn root() -> Json<Value> {
    Json(json!({
        "name": "BizTime API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "companies": "/companies[/:code]",
            "invoices": "/invoices[/:id]",
            "industries": "/industries[/:ind_code]",
            "health": "/health",
        }
    }))
}

/// GET /health - 200 when the store answers, 503 otherwise
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "database": "unavailable"
                })),
            )
        }
    }
}

/// Fallback for routes that match nothing
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::not_found(format!("No route for {}", uri.path()))
}
