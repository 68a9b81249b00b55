use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::database::Store;
use crate::handlers::{companies, industries, invoices, system};

/// Shared handler state; the only thing requests share is the store
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }
}

/// Build the full router with middleware chosen by `config`
pub fn app(state: AppState, config: &AppConfig) -> Router {
    let mut router = Router::new()
        // Public
        .route("/", get(system::root))
        .route("/health", get(system::health))
        // Resources
        .merge(company_routes())
        .merge(invoice_routes())
        .merge(industry_routes())
        .fallback(system::not_found)
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes))
        .with_state(state);

    if config.security.enable_cors {
        router = router.layer(CorsLayer::permissive());
    }
    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router
}

fn company_routes() -> Router<AppState> {
    Router::new()
        .route("/companies", get(companies::list).post(companies::create))
        .route(
            "/companies/:code",
            get(companies::show)
                .put(companies::update)
                .delete(companies::delete),
        )
}

fn invoice_routes() -> Router<AppState> {
    Router::new()
        .route("/invoices", get(invoices::list).post(invoices::create))
        .route(
            "/invoices/:id",
            get(invoices::show)
                .put(invoices::update)
                .delete(invoices::delete),
        )
}

fn industry_routes() -> Router<AppState> {
    Router::new()
        .route("/industries", get(industries::list).post(industries::create))
        .route("/industries/:ind_code", post(industries::associate))
}
