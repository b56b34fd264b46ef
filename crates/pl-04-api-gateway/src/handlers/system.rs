//! Liveness, chain statistics and Prometheus exposition.

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use ledger_telemetry::encode_metrics;

use crate::domain::error::ApiResult;
use crate::domain::types::{HealthResponse, StatsResponse};
use crate::router::AppState;

/// `GET /api/health`. Also the liveness probe used by peers.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let stats = state.workflow.ledger_stats();
    Json(HealthResponse {
        status: "healthy".to_string(),
        node_id: state.node_id.to_string(),
        timestamp: Utc::now(),
        blocks: stats.chain_length,
        contracts: stats.contract_count,
    })
}

/// `GET /api/stats` and `GET /api/blocks`.
pub async fn stats(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse {
        success: true,
        data: state.workflow.ledger_stats(),
    })
}

/// `GET /metrics`
pub async fn metrics() -> ApiResult<impl IntoResponse> {
    let body = encode_metrics()?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    ))
}
