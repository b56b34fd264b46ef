//! Peer-to-peer endpoints, called by other nodes and by operators.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use pl_01_chain_integrity::Block;
use pl_03_peer_sync::ChainSnapshot;

use crate::domain::error::ApiResult;
use crate::domain::types::{
    AddPeerRequest, MessageResponse, PeersResponse, ReceiveBlockResponse, SyncResponse,
};
use crate::metrics::{record_received, record_sync};
use crate::router::AppState;

/// `GET /api/p2p/peers`
pub async fn peers(State(state): State<AppState>) -> Json<PeersResponse> {
    let peers = state.sync.active_peers();
    Json(PeersResponse {
        count: peers.len(),
        peers,
    })
}

/// `POST /api/p2p/add-peer`
pub async fn add_peer(
    State(state): State<AppState>,
    body: Result<Json<AddPeerRequest>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Json(request) = body?;
    let peer = state
        .sync
        .add_peer(&request.peer_id, &request.address, request.port);
    Ok(Json(MessageResponse::ok(format!(
        "Peer {} added at {}",
        peer.id,
        peer.endpoint()
    ))))
}

/// `GET /api/p2p/get-chain`
pub async fn get_chain(State(state): State<AppState>) -> Json<ChainSnapshot> {
    Json(state.sync.get_chain())
}

/// `POST /api/p2p/receive-block`
pub async fn receive_block(
    State(state): State<AppState>,
    body: Result<Json<Block>, JsonRejection>,
) -> ApiResult<Json<ReceiveBlockResponse>> {
    let Json(block) = body?;
    let index = block.index;
    let result = state.sync.receive_block(block);
    record_received(&result, index);

    let outcome = result?;
    Ok(Json(ReceiveBlockResponse {
        success: true,
        message: format!("Block {index} {}", outcome.as_str()),
        outcome,
    }))
}

/// `POST /api/p2p/sync`
pub async fn sync(State(state): State<AppState>) -> ApiResult<Json<SyncResponse>> {
    let result = state.sync.sync_with_peers().await;
    record_sync(&result);

    let report = result?;
    Ok(Json(SyncResponse {
        success: true,
        message: "Sync completed".to_string(),
        blocks: report.chain_length,
        report,
    }))
}
