//! In-process network of ledger nodes for tests.
//!
//! Nodes register under their `address:port` endpoint; the in-memory
//! transport resolves a [`Peer`] to the registered node and calls its
//! [`SyncApi`] directly. Endpoints can be taken down to simulate outages.

use async_trait::async_trait;
use parking_lot::RwLock;
use pl_01_chain_integrity::Block;
use pl_02_contract_workflow::{LedgerState, SharedLedger, WorkflowEngine};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use crate::domain::{ChainSnapshot, Peer, PeerRegistry, SyncConfig, TransportError};
use crate::ports::inbound::SyncApi;
use crate::ports::outbound::PeerTransport;
use crate::service::SyncService;

#[derive(Default)]
pub struct InMemoryNetwork {
    nodes: RwLock<HashMap<String, Arc<dyn SyncApi>>>,
    down: RwLock<HashSet<String>>,
    hanging: RwLock<HashSet<String>>,
    forged: RwLock<HashMap<String, ChainSnapshot>>,
}

impl InMemoryNetwork {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn register(&self, endpoint: &str, node: Arc<dyn SyncApi>) {
        self.nodes.write().insert(endpoint.to_string(), node);
    }

    /// Refuse connections to `endpoint` (or accept them again).
    pub fn set_reachable(&self, endpoint: &str, reachable: bool) {
        let mut down = self.down.write();
        if reachable {
            down.remove(endpoint);
        } else {
            down.insert(endpoint.to_string());
        }
    }

    /// Make every call to `endpoint` hang forever.
    pub fn set_hanging(&self, endpoint: &str) {
        self.hanging.write().insert(endpoint.to_string());
    }

    /// Answer chain requests to `endpoint` with `snapshot` instead of the
    /// registered node's chain.
    pub fn serve_chain(&self, endpoint: &str, snapshot: ChainSnapshot) {
        self.forged.write().insert(endpoint.to_string(), snapshot);
    }

    async fn resolve(&self, peer: &Peer) -> Result<Arc<dyn SyncApi>, TransportError> {
        let endpoint = peer.endpoint();
        let hangs = self.hanging.read().contains(&endpoint);
        if hangs {
            std::future::pending::<()>().await;
        }
        if self.down.read().contains(&endpoint) {
            return Err(TransportError::Connection {
                peer: peer.id.clone(),
                reason: "connection refused".to_string(),
            });
        }
        self.nodes
            .read()
            .get(&endpoint)
            .cloned()
            .ok_or_else(|| TransportError::Connection {
                peer: peer.id.clone(),
                reason: format!("no node listening on {endpoint}"),
            })
    }
}

pub struct InMemoryTransport {
    network: Arc<InMemoryNetwork>,
}

impl InMemoryTransport {
    pub fn new(network: Arc<InMemoryNetwork>) -> Self {
        Self { network }
    }
}

#[async_trait]
impl PeerTransport for InMemoryTransport {
    async fn send_block(&self, peer: &Peer, block: &Block) -> Result<(), TransportError> {
        let node = self.network.resolve(peer).await?;
        node.receive_block(block.clone())
            .map(|_| ())
            .map_err(|_| TransportError::Rejected {
                peer: peer.id.clone(),
                status: 400,
            })
    }

    async fn fetch_chain(&self, peer: &Peer) -> Result<ChainSnapshot, TransportError> {
        let node = self.network.resolve(peer).await?;
        let forged = self.network.forged.read().get(&peer.endpoint()).cloned();
        Ok(forged.unwrap_or_else(|| node.get_chain()))
    }

    async fn probe(&self, peer: &Peer) -> Result<(), TransportError> {
        self.network.resolve(peer).await.map(|_| ())
    }
}

/// A complete node wired to an [`InMemoryNetwork`].
pub struct TestNode {
    pub id: String,
    pub address: String,
    pub port: u16,
    pub ledger: SharedLedger,
    pub workflow: WorkflowEngine,
    pub sync: Arc<SyncService<InMemoryTransport>>,
}

impl TestNode {
    /// Build a node with a fresh ledger and register it on `network` as
    /// `localhost:<port>`.
    pub fn spawn(network: &Arc<InMemoryNetwork>, id: &str, port: u16) -> Self {
        Self::spawn_with_timeout(network, id, port, SyncConfig::default().peer_timeout)
    }

    pub fn spawn_with_timeout(
        network: &Arc<InMemoryNetwork>,
        id: &str,
        port: u16,
        peer_timeout: Duration,
    ) -> Self {
        let ledger = LedgerState::new().expect("genesis").into_shared();
        let sync = Arc::new(SyncService::new(
            id,
            Arc::clone(&ledger),
            Arc::new(PeerRegistry::new()),
            Arc::new(InMemoryTransport::new(Arc::clone(network))),
            SyncConfig { peer_timeout },
        ));
        let address = "localhost".to_string();
        network.register(&format!("{address}:{port}"), sync.clone());
        Self {
            id: id.to_string(),
            address,
            port,
            workflow: WorkflowEngine::new(Arc::clone(&ledger)),
            ledger,
            sync,
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }

    /// Register `other` as a peer of this node.
    pub fn connect(&self, other: &TestNode) {
        self.sync.add_peer(&other.id, &other.address, other.port);
    }

    pub fn chain_len(&self) -> usize {
        self.ledger.read().chain().len()
    }

    pub fn tip_hash(&self) -> String {
        self.ledger.read().chain().latest().hash.clone()
    }
}
