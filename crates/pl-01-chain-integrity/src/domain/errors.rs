//! # Domain Errors
//!
//! Chain-integrity failures. None of them mutate the chain: an operation that
//! returns an error leaves the chain exactly as it was.

use thiserror::Error;

/// Errors raised by block construction, append and chain validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    /// A block failed an integrity check.
    #[error("invalid block at index {index}: {reason}")]
    InvalidBlock {
        index: u64,
        reason: InvalidBlockReason,
    },

    /// A candidate chain contained no blocks at all.
    #[error("chain is empty")]
    EmptyChain,

    /// The payload could not be turned into its canonical form.
    #[error("payload encoding failed: {0}")]
    Encoding(String),
}

impl ChainError {
    pub(crate) fn invalid(index: u64, reason: InvalidBlockReason) -> Self {
        ChainError::InvalidBlock { index, reason }
    }
}

/// Why a block was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidBlockReason {
    #[error("hash is empty")]
    EmptyHash,

    #[error("timestamp is unset")]
    MissingTimestamp,

    #[error("hash does not match contents (expected {expected}, found {found})")]
    HashMismatch { expected: String, found: String },

    #[error("previous hash {found} does not match tail hash {expected}")]
    BrokenLink { expected: String, found: String },

    #[error("index {found} does not follow the tail (expected {expected})")]
    IndexMismatch { expected: u64, found: u64 },

    #[error("first block is not a genesis block")]
    MalformedGenesis,
}
