//! HTTP API server for the online store.
//!
//! REST endpoints for the catalog, the single active cart, and customer
//! capture, with structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod notify;
pub mod routes;
pub mod views;

use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, patch, post, put};
use metrics_exporter_prometheus::PrometheusHandle;
use store::{ActiveCartRegistry, ShopStore};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use notify::LogNotifier;
use routes::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: ShopStore + Clone + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/category", get(routes::categories::list::<S>))
        .route("/category", post(routes::categories::create::<S>))
        .route("/category/{id}", get(routes::categories::get::<S>))
        .route("/category/{id}", put(routes::categories::update::<S>))
        .route("/category/{id}", patch(routes::categories::update::<S>))
        .route("/category/{id}", delete(routes::categories::delete::<S>))
        .route("/product", get(routes::products::list::<S>))
        .route("/product", post(routes::products::create::<S>))
        .route("/product/{id}", get(routes::products::get::<S>))
        .route("/product/{id}", put(routes::products::update::<S>))
        .route("/product/{id}", patch(routes::products::update::<S>))
        .route("/product/{id}", delete(routes::products::delete::<S>))
        .route("/product/{id}/update", put(routes::products::update::<S>))
        .route("/product/{id}/delete", delete(routes::products::delete::<S>))
        .route("/carts", get(routes::carts::list::<S>))
        .route("/carts", post(routes::carts::create::<S>))
        .route("/carts/{id}", get(routes::carts::get::<S>))
        .route("/carts/{id}", put(routes::carts::update::<S>))
        .route("/carts/{id}", patch(routes::carts::update::<S>))
        .route("/cart/{id}/update", put(routes::carts::update::<S>))
        .route("/carts/{cart_id}/items", post(routes::carts::add_item::<S>))
        .route("/carts/{cart_id}/items", get(routes::carts::items::<S>))
        .route("/customers", get(routes::customers::list::<S>))
        .route("/customers", post(routes::customers::create::<S>))
        .route("/customers/{id}", get(routes::customers::get::<S>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the default application state over the given store.
pub fn create_default_state<S: ShopStore + Clone + 'static>(store: S) -> Arc<AppState<S>> {
    let registry = ActiveCartRegistry::new(store.clone());
    Arc::new(AppState {
        store,
        registry,
        notifier: Arc::new(LogNotifier),
    })
}
