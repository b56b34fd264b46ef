//! # Inbound Ports
//!
//! API of the sync subsystem.

use async_trait::async_trait;
use pl_01_chain_integrity::Block;
use tokio::task::JoinHandle;

use crate::domain::{
    ChainSnapshot, HealthReport, Peer, ReceiveOutcome, SyncError, SyncReport, TransportError,
};

#[async_trait]
pub trait SyncApi: Send + Sync {
    /// Register (or refresh) a peer as active.
    fn add_peer(&self, id: &str, address: &str, port: u16) -> Peer;

    fn active_peers(&self) -> Vec<Peer>;

    /// Push `block` to every active peer, one task per peer.
    ///
    /// Fire-and-forget: each handle resolves to that peer's delivery result
    /// for callers that want to wait or count failures. A failed peer is
    /// already marked inactive by then. Must be called from within a tokio
    /// runtime.
    fn broadcast_block(&self, block: Block) -> Vec<JoinHandle<Result<(), TransportError>>>;

    /// Accept a block pushed by a peer.
    ///
    /// # Errors
    /// `InvalidBlock` if the block fails integrity or does not extend the
    /// local tail. The chain is unchanged in that case.
    fn receive_block(&self, block: Block) -> Result<ReceiveOutcome, SyncError>;

    fn get_chain(&self) -> ChainSnapshot;

    /// Pull every active peer's chain and adopt the longest valid one that
    /// is strictly longer than ours.
    ///
    /// # Errors
    /// `Unreachable` only when every contacted peer failed at transport
    /// level. Invalid or shorter chains are reported, not returned as errors.
    async fn sync_with_peers(&self) -> Result<SyncReport, SyncError>;

    /// Probe every known peer and update its liveness.
    async fn health_check(&self) -> HealthReport;
}
