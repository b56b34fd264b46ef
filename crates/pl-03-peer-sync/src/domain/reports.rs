//! # Reports
//!
//! Results of sync operations and the chain snapshot exchanged between
//! nodes.

use pl_01_chain_integrity::Block;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Sync service settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncConfig {
    /// Upper bound on every single peer call.
    pub peer_timeout: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            peer_timeout: Duration::from_secs(5),
        }
    }
}

/// A node's full chain, as served at `GET /api/p2p/get-chain`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainSnapshot {
    pub chain: Vec<Block>,
    pub length: usize,
    pub node_id: String,
}

/// What happened to a received block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReceiveOutcome {
    Appended,
    /// Already on the chain; nothing changed.
    Duplicate,
}

impl ReceiveOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReceiveOutcome::Appended => "appended",
            ReceiveOutcome::Duplicate => "duplicate",
        }
    }
}

/// Per-peer result of one sync round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum PeerSyncResult {
    /// The peer's chain replaced ours.
    Adopted { length: usize, previous_length: usize },
    /// The peer's chain was not strictly longer than ours.
    NotLonger { length: usize },
    /// The peer's chain failed validation and was ignored.
    Invalid { length: usize, reason: String },
    /// The peer could not be reached; it was marked inactive.
    Unreachable { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerSyncOutcome {
    pub peer_id: String,
    #[serde(flatten)]
    pub result: PeerSyncResult,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SyncReport {
    pub peers_contacted: usize,
    /// Local chain length once the round finished.
    pub chain_length: usize,
    /// Peer whose chain was adopted last, if any.
    pub adopted_from: Option<String>,
    pub outcomes: Vec<PeerSyncOutcome>,
}

impl SyncReport {
    pub fn transport_failures(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.result, PeerSyncResult::Unreachable { .. }))
            .count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HealthReport {
    pub alive: Vec<String>,
    pub unreachable: Vec<String>,
}
