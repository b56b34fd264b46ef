//! # Node Container
//!
//! Holds every subsystem instance of a node and wires them together:
//!
//! ```text
//!               ┌────────────── SharedLedger ──────────────┐
//!               │   Chain (pl-01) + ContractRegistry (pl-02)│
//!               └───────▲──────────────────────▲───────────┘
//!                       │                      │
//!               WorkflowEngine           SyncService<T>
//!                  (pl-02)          PeerRegistry + PeerTransport
//!                       │                      │
//!                       └────── AppState ──────┘
//!                             (pl-04 gateway)
//! ```

pub mod config;

pub use config::{ConfigError, NodeConfig, PeerSpec};

use pl_01_chain_integrity::ChainError;
use pl_02_contract_workflow::{LedgerState, SharedLedger, WorkflowEngine};
use pl_03_peer_sync::{
    HttpPeerTransport, PeerRegistry, PeerTransport, SyncApi, SyncService, TransportError,
};
use pl_04_api_gateway::{AppState, GatewayError};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Errors that stop a node from starting or serving.
#[derive(Debug, Error)]
pub enum NodeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to create genesis block: {0}")]
    Genesis(#[from] ChainError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// All subsystems of one node.
pub struct NodeContainer<T: PeerTransport> {
    pub config: NodeConfig,
    pub ledger: SharedLedger,
    pub peers: Arc<PeerRegistry>,
    pub workflow: Arc<WorkflowEngine>,
    pub sync: Arc<SyncService<T>>,
}

impl NodeContainer<HttpPeerTransport> {
    /// Wire a node that talks to its peers over HTTP.
    pub fn with_http(config: NodeConfig) -> Result<Self, NodeError> {
        let transport = HttpPeerTransport::new(config.network.peer_timeout)?;
        Self::new(config, Arc::new(transport))
    }
}

impl<T: PeerTransport> NodeContainer<T> {
    /// Create the ledger from genesis and register the initial peers.
    pub fn new(config: NodeConfig, transport: Arc<T>) -> Result<Self, NodeError> {
        let ledger = LedgerState::new()?.into_shared();
        let peers = Arc::new(PeerRegistry::new());
        let workflow = Arc::new(WorkflowEngine::new(Arc::clone(&ledger)));
        let sync = Arc::new(SyncService::new(
            config.node.id.clone(),
            Arc::clone(&ledger),
            Arc::clone(&peers),
            transport,
            config.sync_config(),
        ));

        if config.network.initial_peers.is_empty() {
            info!("No initial peers configured, waiting for /api/p2p/add-peer");
        }
        for peer in &config.network.initial_peers {
            sync.add_peer(&peer.id, &peer.address, peer.port);
        }

        Ok(Self {
            config,
            ledger,
            peers,
            workflow,
            sync,
        })
    }

    /// Handler state for the API gateway.
    pub fn app_state(&self) -> AppState {
        AppState::new(
            self.config.node.id.as_str(),
            self.workflow.clone(),
            self.sync.clone(),
        )
    }
}
