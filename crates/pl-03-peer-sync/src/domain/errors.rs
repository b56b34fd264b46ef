//! # Domain Errors

use pl_01_chain_integrity::ChainError;
use thiserror::Error;

/// Failure talking to one peer. Never fatal: the peer is marked inactive and
/// the operation carries on with the others.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("request to peer {peer} timed out")]
    Timeout { peer: String },

    #[error("could not reach peer {peer}: {reason}")]
    Connection { peer: String, reason: String },

    #[error("peer {peer} answered with status {status}")]
    Rejected { peer: String, status: u16 },

    #[error("malformed response from peer {peer}: {reason}")]
    Decode { peer: String, reason: String },

    #[error("transport setup failed: {0}")]
    Setup(String),
}

/// Errors surfaced by the sync service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    /// A received block failed an integrity check; the chain is unchanged.
    #[error(transparent)]
    InvalidBlock(#[from] ChainError),

    /// Every peer contacted during a sync round failed at transport level.
    #[error("no peer reachable ({failures} contacted): {last_error}")]
    Unreachable {
        failures: usize,
        last_error: TransportError,
    },
}
