//! Route table and shared handler state.

use axum::routing::{get, post};
use axum::Router;
use pl_02_contract_workflow::WorkflowApi;
use pl_03_peer_sync::SyncApi;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::domain::config::GatewayConfig;
use crate::handlers::{contracts, p2p, system};
use crate::middleware::create_cors_layer;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub node_id: Arc<str>,
    pub workflow: Arc<dyn WorkflowApi>,
    pub sync: Arc<dyn SyncApi>,
}

impl AppState {
    pub fn new(
        node_id: impl Into<Arc<str>>,
        workflow: Arc<dyn WorkflowApi>,
        sync: Arc<dyn SyncApi>,
    ) -> Self {
        Self {
            node_id: node_id.into(),
            workflow,
            sync,
        }
    }
}

/// Every route of the node, with CORS and request tracing applied.
pub fn build_router(state: AppState, config: &GatewayConfig) -> Router {
    Router::new()
        // System
        .route("/api/health", get(system::health))
        .route("/api/blocks", get(system::stats))
        .route("/api/stats", get(system::stats))
        .route("/metrics", get(system::metrics))
        // Contracts and workflow
        .route(
            "/api/contracts",
            get(contracts::list_contracts).post(contracts::create_contract),
        )
        .route("/api/workflow/steps", get(contracts::steps))
        .route("/api/contracts/:id/workflow", get(contracts::workflow_status))
        .route("/api/contracts/:id/validate-step", post(contracts::validate_step))
        .route("/api/contracts/:id/audit", post(contracts::add_audit_observation))
        .route("/api/contracts/by-status/:status", get(contracts::by_status))
        .route("/api/contracts/by-role/:role", get(contracts::by_role))
        // Peer-to-peer
        .route("/api/p2p/peers", get(p2p::peers))
        .route("/api/p2p/add-peer", post(p2p::add_peer))
        .route("/api/p2p/get-chain", get(p2p::get_chain))
        .route("/api/p2p/receive-block", post(p2p::receive_block))
        .route("/api/p2p/sync", post(p2p::sync))
        .layer(create_cors_layer(&config.cors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
