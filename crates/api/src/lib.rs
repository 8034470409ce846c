//! HTTP storefront API with observability.
//!
//! Serves the product catalog, session carts and flash-sale admission over
//! the `/get` and `/post` routes the load-test scripts drive, with
//! structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::routing::{get, post};
use cart::{CartService, SessionStore, TokenIssuer};
use catalog::Catalog;
use chrono::TimeDelta;
use flash_sale::FlashSaleController;
use metrics_exporter_prometheus::PrometheusHandle;
use tokio::task::JoinHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use routes::storefront::AppState;

/// Longest pause between two idle-session sweeps.
const MAX_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::ops::metrics))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::ops::health))
        .route("/get", get(routes::storefront::get))
        .route("/post", post(routes::storefront::post))
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

/// Creates the application state: an empty session store, the configured
/// flash-sale stock and the built-in catalog.
pub fn create_default_state(config: &Config) -> Arc<AppState> {
    let flash_sale = FlashSaleController::new(config.flash_sale_stock.iter().cloned());
    for id in flash_sale.products() {
        tracing::info!(product_id = %id, units = flash_sale.remaining(id), "flash-sale stock loaded");
    }

    Arc::new(AppState {
        carts: CartService::new(SessionStore::new()),
        flash_sale,
        catalog: Catalog::default(),
        tokens: TokenIssuer::new(),
    })
}

/// Spawns a background task that drops carts idle for longer than `ttl_secs`.
///
/// The sweep runs every `ttl_secs` or every minute, whichever is shorter.
pub fn spawn_session_sweeper(store: SessionStore, ttl_secs: u32) -> JoinHandle<()> {
    let max_idle = TimeDelta::seconds(i64::from(ttl_secs));
    let period = Duration::from_secs(u64::from(ttl_secs)).min(MAX_SWEEP_INTERVAL);

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        // The first tick completes immediately.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            store.sweep_idle(max_idle);
        }
    })
}
