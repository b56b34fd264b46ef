//! # Outbound Ports
//!
//! How the sync service reaches other nodes.

use async_trait::async_trait;
use pl_01_chain_integrity::Block;

use crate::domain::{ChainSnapshot, Peer, TransportError};

/// Peer-to-peer transport.
///
/// Implementations may block for as long as the network does; the sync
/// service bounds every call with its own timeout.
#[async_trait]
pub trait PeerTransport: Send + Sync + 'static {
    /// Push one block to the peer's receive endpoint.
    async fn send_block(&self, peer: &Peer, block: &Block) -> Result<(), TransportError>;

    /// Pull the peer's full chain.
    async fn fetch_chain(&self, peer: &Peer) -> Result<ChainSnapshot, TransportError>;

    /// Liveness probe.
    async fn probe(&self, peer: &Peer) -> Result<(), TransportError>;
}
