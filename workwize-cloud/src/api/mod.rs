//! API routes for workwize-cloud

pub mod assistant;
pub mod extract;
pub mod health;
pub mod resources;
pub mod status;
pub mod sync;

use axum::http::{Method, Uri};
use axum::routing::{get, post};
use axum::{Router, middleware};
use shared::ApiResponse;
use shared::error::AppError;
use tower::ServiceBuilder;

use crate::error::ServiceResult;
use crate::middleware::logging::logging_middleware;
use crate::middleware::rate_limit::{api_rate_limit, chat_rate_limit, sync_rate_limit};
use crate::middleware::security::{cors_layer, security_headers};
use crate::state::AppState;

pub type ApiResult<T> = ServiceResult<ApiResponse<T>>;

/// Create the combined router
pub fn create_router(state: AppState) -> Router {
    // Sync triggers (stricter per-IP budget)
    let sync = Router::new()
        .route("/api/sync/all", post(sync::sync_all))
        .route("/api/sync/{resource}", post(sync::sync_resource))
        .route_layer(middleware::from_fn_with_state(state.clone(), sync_rate_limit));

    // Assistant (stricter per-IP budget)
    let chat = Router::new()
        .route("/api/ai/chat", post(assistant::chat))
        .route_layer(middleware::from_fn_with_state(state.clone(), chat_rate_limit));

    let data = Router::new()
        .route("/api/status", get(status::get_status))
        .route("/api/employees", get(resources::list_employees))
        .route("/api/employees/{id}", get(resources::get_employee))
        .route("/api/assets", get(resources::list_assets))
        .route(
            "/api/assets/{id}",
            get(resources::get_asset).patch(resources::update_asset),
        )
        .route("/api/orders", get(resources::list_orders))
        .route("/api/orders/{id}", get(resources::get_order))
        .route("/api/products", get(resources::list_products))
        .route("/api/products/{id}", get(resources::get_product))
        .route("/api/warehouses", get(resources::list_warehouses))
        .route("/api/warehouses/{id}", get(resources::get_warehouse))
        .route("/api/offices", get(resources::list_offices))
        .route("/api/offices/{id}", get(resources::get_office))
        .route("/api/offboards", get(resources::list_offboards))
        .route(
            "/api/offboards/{id}",
            get(resources::get_offboard).patch(resources::update_offboard),
        )
        .route("/api/addresses", get(resources::list_addresses))
        .route("/api/addresses/{id}", get(resources::get_address))
        .route("/api/countries", get(resources::list_countries));

    // Global per-IP budget for everything under /api
    let api = data
        .merge(sync)
        .merge(chat)
        .route_layer(middleware::from_fn_with_state(state.clone(), api_rate_limit));

    let shell = ServiceBuilder::new()
        .layer(middleware::from_fn(security_headers))
        .layer(cors_layer(&state.config.cors_origins))
        .layer(middleware::from_fn(logging_middleware));

    Router::new()
        .route("/health", get(health::health_check))
        .merge(api)
        .fallback(route_not_found)
        .layer(shell)
        .with_state(state)
}

async fn route_not_found(method: Method, uri: Uri) -> AppError {
    AppError::route_not_found(method.as_str(), uri.path())
}
