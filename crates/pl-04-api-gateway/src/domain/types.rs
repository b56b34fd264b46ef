//! Request and response bodies.
//!
//! Contract, block and workflow types serialize as themselves; this module
//! holds the envelopes around them and the peer-endpoint requests.

use chrono::{DateTime, Utc};
use pl_01_chain_integrity::Block;
use pl_02_contract_workflow::{LedgerStats, WorkflowStepTemplate};
use pl_03_peer_sync::{Peer, ReceiveOutcome, SyncReport};
use serde::{Deserialize, Deserializer, Serialize};
use shared_types::{Contract, ContractId};

/// `GET /api/health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub node_id: String,
    pub timestamp: DateTime<Utc>,
    pub blocks: usize,
    pub contracts: usize,
}

/// `GET /api/blocks`, `GET /api/stats`
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub success: bool,
    pub data: LedgerStats,
}

/// `GET /api/contracts`
#[derive(Debug, Clone, Serialize)]
pub struct ContractListResponse {
    pub success: bool,
    pub count: usize,
    pub data: Vec<Contract>,
}

/// `GET /api/contracts/by-status/:status`, `GET /api/contracts/by-role/:role`
#[derive(Debug, Clone, Serialize)]
pub struct FilteredContractsResponse {
    pub count: usize,
    pub contracts: Vec<Contract>,
}

/// `POST /api/contracts`
#[derive(Debug, Clone, Serialize)]
pub struct ContractCreatedResponse {
    pub success: bool,
    pub message: String,
    pub contract_id: ContractId,
    pub block_index: u64,
}

/// Result of a state-changing workflow call.
#[derive(Debug, Clone, Serialize)]
pub struct BlockRecordedResponse {
    pub success: bool,
    pub message: String,
    pub block_index: u64,
    pub block_hash: String,
}

impl BlockRecordedResponse {
    pub fn new(message: impl Into<String>, block: &Block) -> Self {
        Self {
            success: true,
            message: message.into(),
            block_index: block.index,
            block_hash: block.hash.clone(),
        }
    }
}

/// `GET /api/workflow/steps`
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowStepsResponse {
    pub steps: &'static [WorkflowStepTemplate],
}

/// `GET /api/p2p/peers`
#[derive(Debug, Clone, Serialize)]
pub struct PeersResponse {
    pub count: usize,
    pub peers: Vec<Peer>,
}

/// `POST /api/p2p/add-peer`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddPeerRequest {
    pub peer_id: String,
    pub address: String,
    /// Accepted as a number or a numeric string.
    #[serde(deserialize_with = "port_from_number_or_string")]
    pub port: u16,
}

/// Generic acknowledgement.
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// `POST /api/p2p/receive-block`
#[derive(Debug, Clone, Serialize)]
pub struct ReceiveBlockResponse {
    pub success: bool,
    pub message: String,
    pub outcome: ReceiveOutcome,
}

/// `POST /api/p2p/sync`
#[derive(Debug, Clone, Serialize)]
pub struct SyncResponse {
    pub success: bool,
    pub message: String,
    pub blocks: usize,
    pub report: SyncReport,
}

fn port_from_number_or_string<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawPort {
        Number(u16),
        Text(String),
    }

    match RawPort::deserialize(deserializer)? {
        RawPort::Number(port) => Ok(port),
        RawPort::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid port: {text:?}"))),
    }
}
