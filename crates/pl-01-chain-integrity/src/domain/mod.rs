//! # Domain Layer
//!
//! Pure chain-integrity logic: no I/O, no locking, no clocks beyond
//! `Utc::now()` at append time.
//!
//! ## Modules
//!
//! - `block` - Block, typed payloads and the wire form
//! - `canonical` - Canonical JSON encoding and digest
//! - `chain` - Append, validation and replacement
//! - `errors` - Chain-integrity errors

pub mod block;
pub mod canonical;
pub mod chain;
pub mod errors;

pub use block::{Block, BlockPayload, BlockType, GENESIS_MESSAGE, GENESIS_TIMESTAMP_SECS};
pub use canonical::{canonical_digest, canonical_json};
pub use chain::{validate_blocks, Chain};
pub use errors::{ChainError, InvalidBlockReason};
