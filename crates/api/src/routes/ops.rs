//! Operational endpoints: health and Prometheus metrics.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;

use super::storefront::AppState;

#[derive(Serialize)]
pub struct FlashSaleHealth {
    pub product_id: String,
    pub remaining: u32,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub active_sessions: usize,
    pub flash_sale: Vec<FlashSaleHealth>,
}

/// GET /health — liveness plus a summary of in-memory state.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let flash_sale = state
        .flash_sale
        .products()
        .into_iter()
        .filter_map(|id| {
            state.flash_sale.remaining(id).map(|remaining| FlashSaleHealth {
                product_id: id.to_string(),
                remaining,
            })
        })
        .collect();

    Json(HealthResponse {
        status: "ok",
        active_sessions: state.carts.store().active_sessions(),
        flash_sale,
    })
}

/// GET /metrics — Prometheus text exposition.
pub async fn metrics(State(handle): State<PrometheusHandle>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(
            header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        handle.render(),
    )
}
