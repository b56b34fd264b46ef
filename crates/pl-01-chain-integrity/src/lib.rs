//! # Chain Integrity (pl-01)
//!
//! The block/chain integrity layer of the procurement ledger: self-hashing
//! blocks, hash-linked append and whole-chain validation.
//!
//! ## Architecture
//!
//! ```text
//!  WorkflowEngine ──append(payload)──→ ┐
//!                                      ├──→ Chain ──→ [genesis]←[1]←[2]←...
//!  SyncService ───append_block(block)─→┤        (each block: hash of canonical
//!              ───replace(blocks)─────→┘         encoding, linked by previous_hash)
//! ```
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Description |
//! |----|-----------|-------------|
//! | 1 | Hash integrity | `hash == SHA256(canonical(data, index, nonce, previous_hash, timestamp, type))` |
//! | 2 | Linkage | `blocks[i].previous_hash == blocks[i-1].hash` for `i > 0` |
//! | 3 | Deterministic genesis | Index 0, empty previous hash, fixed payload and timestamp |
//! | 4 | Append only | The chain grows by append or is swapped wholesale, never edited |
//! | 5 | No proof of work | `nonce` is always 0 |
//!
//! ## Crate Structure
//!
//! - `domain/` - Pure domain logic (block, canonical encoding, chain, errors)
//! - `test_utils` - Sample payloads and chains (feature `test-utils`)
//!
//! ## Usage
//!
//! ```ignore
//! use pl_01_chain_integrity::{BlockPayload, Chain};
//!
//! let mut chain = Chain::new()?;
//! let block = chain.append(payload)?;
//! assert!(chain.is_valid());
//! ```

pub mod domain;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use domain::block::{Block, BlockPayload, BlockType, GENESIS_MESSAGE, GENESIS_TIMESTAMP_SECS};
pub use domain::canonical::{canonical_digest, canonical_json};
pub use domain::chain::{validate_blocks, Chain};
pub use domain::errors::{ChainError, InvalidBlockReason};
