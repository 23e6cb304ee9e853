//! HTTP API server for the fulfillment system.
//!
//! Exposes checkout, cart operations and the administrative order/delivery
//! commands, with structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::routing::{delete, get, post, put};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub use state::{AppState, create_default_state};

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(
    state: Arc<AppState>,
    metrics_handle: PrometheusHandle,
    request_timeout: Duration,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/checkout/{user_id}", post(routes::checkout::checkout))
        .route("/carts/{user_id}", get(routes::carts::get))
        .route("/carts/{user_id}", delete(routes::carts::delete))
        .route("/carts/{user_id}/items", post(routes::carts::add_item))
        .route(
            "/carts/{user_id}/items/{product_id}",
            put(routes::carts::set_quantity),
        )
        .route(
            "/carts/{user_id}/items/{product_id}",
            delete(routes::carts::remove_item),
        )
        .route("/orders", get(routes::orders::list))
        .route(
            "/orders/delivery-failed",
            get(routes::orders::list_delivery_failed),
        )
        .route("/orders/{id}", get(routes::orders::get))
        .route("/orders/{id}/status", put(routes::orders::change_status))
        .route(
            "/orders/{id}/internal-status",
            put(routes::orders::change_internal_status),
        )
        .route("/users/{user_id}/orders", get(routes::orders::list_by_user))
        .route("/deliveries/{id}", get(routes::deliveries::get))
        .route(
            "/deliveries/{id}/status",
            put(routes::deliveries::change_status),
        )
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(request_timeout))
}
