//! # Sync Service
//!
//! Implements [`SyncApi`] over the shared ledger, the peer registry and a
//! [`PeerTransport`].
//!
//! ## Locking
//!
//! Network calls never run under the ledger lock. `sync_with_peers` fetches
//! and validates a peer chain lock-free, then takes the write lock and
//! re-checks "strictly longer" against the chain as it is at that moment
//! before swapping, so a block appended meanwhile is never lost to a chain
//! that is no longer longer.

use async_trait::async_trait;
use futures::future::join_all;
use pl_01_chain_integrity::{Block, Chain};
use pl_02_contract_workflow::SharedLedger;
use std::future::Future;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::domain::{
    ChainSnapshot, HealthReport, Peer, PeerRegistry, PeerSyncOutcome, PeerSyncResult,
    ReceiveOutcome, SyncConfig, SyncError, SyncReport, TransportError,
};
use crate::ports::inbound::SyncApi;
use crate::ports::outbound::PeerTransport;


pub struct SyncService<T: PeerTransport> {
    node_id: String,
    ledger: SharedLedger,
    peers: Arc<PeerRegistry>,
    transport: Arc<T>,
    config: SyncConfig,
}

impl<T: PeerTransport> SyncService<T> {
    pub fn new(
        node_id: impl Into<String>,
        ledger: SharedLedger,
        peers: Arc<PeerRegistry>,
        transport: Arc<T>,
        config: SyncConfig,
    ) -> Self {
        Self {
            node_id: node_id.into(),
            ledger,
            peers,
            transport,
            config,
        }
    }

    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    pub fn peers(&self) -> &Arc<PeerRegistry> {
        &self.peers
    }

    /// Decide on one peer chain: ignore it, or adopt it.
    fn consider_chain(&self, peer_id: &str, blocks: Vec<Block>) -> PeerSyncResult {
        let length = blocks.len();
        if length <= self.ledger.read().chain().len() {
            return PeerSyncResult::NotLonger { length };
        }

        let candidate = match Chain::from_blocks(blocks) {
            Ok(chain) => chain,
            Err(error) => {
                warn!(peer_id, length, %error, "Ignoring invalid chain from peer");
                return PeerSyncResult::Invalid {
                    length,
                    reason: error.to_string(),
                };
            }
        };

        let mut ledger = self.ledger.write();
        let previous_length = ledger.chain().len();
        if length <= previous_length {
            return PeerSyncResult::NotLonger { length };
        }
        ledger.adopt(candidate);
        drop(ledger);

        info!(
            peer_id,
            previous_length, length, "Adopted longer valid chain from peer"
        );
        PeerSyncResult::Adopted {
            length,
            previous_length,
        }
    }
}

/// Bound a peer call by `limit`.
async fn bounded<R>(
    limit: std::time::Duration,
    peer: &Peer,
    call: impl Future<Output = Result<R, TransportError>>,
) -> Result<R, TransportError> {
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(TransportError::Timeout {
            peer: peer.id.clone(),
        }),
    }
}

#[async_trait]
impl<T: PeerTransport> SyncApi for SyncService<T> {
    fn add_peer(&self, id: &str, address: &str, port: u16) -> Peer {
        let peer = self.peers.add_peer(id, address, port);
        info!(peer_id = id, endpoint = %peer.endpoint(), "Peer registered");
        peer
    }

    fn active_peers(&self) -> Vec<Peer> {
        self.peers.active_peers()
    }

    fn broadcast_block(&self, block: Block) -> Vec<JoinHandle<Result<(), TransportError>>> {
        let block = Arc::new(block);
        self.peers
            .active_peers()
            .into_iter()
            .map(|peer| {
                let transport = Arc::clone(&self.transport);
                let peers = Arc::clone(&self.peers);
                let block = Arc::clone(&block);
                let limit = self.config.peer_timeout;
                tokio::spawn(async move {
                    let result = bounded(limit, &peer, transport.send_block(&peer, &block)).await;
                    match &result {
                        Ok(()) => debug!(
                            peer_id = %peer.id,
                            block_index = block.index,
                            "Block delivered"
                        ),
                        Err(error) => {
                            warn!(
                                peer_id = %peer.id,
                                block_index = block.index,
                                %error,
                                "Block delivery failed, marking peer inactive"
                            );
                            peers.mark_inactive(&peer.id);
                        }
                    }
                    result
                })
            })
            .collect()
    }

    fn receive_block(&self, block: Block) -> Result<ReceiveOutcome, SyncError> {
        block.verify_hash()?;

        let mut ledger = self.ledger.write();
        if ledger.chain().has_block(&block.hash) {
            debug!(block_index = block.index, block_hash = %block.hash, "Duplicate block ignored");
            return Ok(ReceiveOutcome::Duplicate);
        }
        let (index, hash) = (block.index, block.hash.clone());
        ledger.accept_block(block)?;
        drop(ledger);

        info!(block_index = index, block_hash = %hash, "Block received from peer");
        Ok(ReceiveOutcome::Appended)
    }

    fn get_chain(&self) -> ChainSnapshot {
        let ledger = self.ledger.read();
        ChainSnapshot {
            chain: ledger.chain().blocks().to_vec(),
            length: ledger.chain().len(),
            node_id: self.node_id.clone(),
        }
    }

    async fn sync_with_peers(&self) -> Result<SyncReport, SyncError> {
        let peers = self.peers.active_peers();
        let limit = self.config.peer_timeout;
        let fetched = join_all(
            peers
                .iter()
                .map(|peer| bounded(limit, peer, self.transport.fetch_chain(peer))),
        )
        .await;

        let mut report = SyncReport {
            peers_contacted: peers.len(),
            ..SyncReport::default()
        };
        let mut last_error = None;
        for (peer, result) in peers.iter().zip(fetched) {
            let result = match result {
                Ok(snapshot) => {
                    self.peers.mark_alive(&peer.id);
                    self.consider_chain(&peer.id, snapshot.chain)
                }
                Err(error) => {
                    warn!(peer_id = %peer.id, %error, "Chain fetch failed, marking peer inactive");
                    self.peers.mark_inactive(&peer.id);
                    let summary = error.to_string();
                    last_error = Some(error);
                    PeerSyncResult::Unreachable { error: summary }
                }
            };
            if matches!(result, PeerSyncResult::Adopted { .. }) {
                report.adopted_from = Some(peer.id.clone());
            }
            report.outcomes.push(PeerSyncOutcome {
                peer_id: peer.id.clone(),
                result,
            });
        }
        report.chain_length = self.ledger.read().chain().len();

        let failures = report.transport_failures();
        if let Some(last_error) = last_error {
            if failures == report.peers_contacted {
                return Err(SyncError::Unreachable {
                    failures,
                    last_error,
                });
            }
        }
        debug!(
            peers = report.peers_contacted,
            failures,
            chain_length = report.chain_length,
            "Sync round finished"
        );
        Ok(report)
    }

    async fn health_check(&self) -> HealthReport {
        let peers = self.peers.all_peers();
        let limit = self.config.peer_timeout;
        let probes = join_all(
            peers
                .iter()
                .map(|peer| bounded(limit, peer, self.transport.probe(peer))),
        )
        .await;

        let mut report = HealthReport::default();
        for (peer, result) in peers.into_iter().zip(probes) {
            match result {
                Ok(()) => {
                    self.peers.mark_alive(&peer.id);
                    report.alive.push(peer.id);
                }
                Err(error) => {
                    debug!(peer_id = %peer.id, %error, "Health probe failed");
                    self.peers.mark_inactive(&peer.id);
                    report.unreachable.push(peer.id);
                }
            }
        }
        report
    }
}
