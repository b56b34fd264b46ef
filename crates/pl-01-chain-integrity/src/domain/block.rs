//! # Block
//!
//! The immutable, self-hashing record unit of the ledger.
//!
//! ## Wire Form
//!
//! ```text
//! { "index": 3, "timestamp": "2024-05-01T10:00:00Z", "data": { ... },
//!   "previous_hash": "ab12...", "hash": "cd34...", "nonce": 0,
//!   "type": "VALIDATION" }
//! ```
//!
//! `data` is the record of the block's `type`. The hash covers
//! `data, index, nonce, previous_hash, timestamp (unix seconds), type` in
//! canonical form (see [`canonical`](super::canonical)).

use chrono::{DateTime, SubsecRound, TimeZone, Utc};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{json, Value};
use shared_types::{
    AuditObservationRecord, ContractCreationRecord, ContractId, GenesisRecord, ValidationRecord,
};
use std::fmt;

use super::canonical::canonical_digest;
use super::errors::{ChainError, InvalidBlockReason};

/// Greeting carried by the genesis block.
pub const GENESIS_MESSAGE: &str = "Procurement Ledger Genesis Block";

/// Genesis timestamp (2024-01-01T00:00:00Z). Fixed so that every node derives
/// the same genesis hash.
pub const GENESIS_TIMESTAMP_SECS: i64 = 1_704_067_200;

/// Kind of event a block records. Part of the hash input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlockType {
    Genesis,
    ContractCreation,
    Validation,
    AuditObservation,
}

impl BlockType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockType::Genesis => "GENESIS",
            BlockType::ContractCreation => "CONTRACT_CREATION",
            BlockType::Validation => "VALIDATION",
            BlockType::AuditObservation => "AUDIT_OBSERVATION",
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed block payload, keyed by [`BlockType`].
///
/// Serializes as the bare record; the tag travels in the block's `type` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum BlockPayload {
    Genesis(GenesisRecord),
    ContractCreation(ContractCreationRecord),
    Validation(ValidationRecord),
    AuditObservation(AuditObservationRecord),
}

impl BlockPayload {
    pub fn block_type(&self) -> BlockType {
        match self {
            BlockPayload::Genesis(_) => BlockType::Genesis,
            BlockPayload::ContractCreation(_) => BlockType::ContractCreation,
            BlockPayload::Validation(_) => BlockType::Validation,
            BlockPayload::AuditObservation(_) => BlockType::AuditObservation,
        }
    }

    /// Contract the event belongs to. `None` for genesis.
    pub fn contract_id(&self) -> Option<ContractId> {
        match self {
            BlockPayload::Genesis(_) => None,
            BlockPayload::ContractCreation(record) => Some(record.contract.id),
            BlockPayload::Validation(record) => Some(record.contract_id),
            BlockPayload::AuditObservation(record) => Some(record.contract_id),
        }
    }

    /// Decode the `data` object of a block of the given type.
    pub fn decode(block_type: BlockType, data: Value) -> Result<Self, serde_json::Error> {
        Ok(match block_type {
            BlockType::Genesis => BlockPayload::Genesis(serde_json::from_value(data)?),
            BlockType::ContractCreation => {
                BlockPayload::ContractCreation(serde_json::from_value(data)?)
            }
            BlockType::Validation => BlockPayload::Validation(serde_json::from_value(data)?),
            BlockType::AuditObservation => {
                BlockPayload::AuditObservation(serde_json::from_value(data)?)
            }
        })
    }
}

/// A hash-linked ledger block.
///
/// Fields are public for inspection; a block is never modified after it has
/// been hashed. Any change to a hashed field makes [`Block::verify_hash`] fail.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "WireBlock")]
pub struct Block {
    pub index: u64,
    pub timestamp: DateTime<Utc>,
    pub payload: BlockPayload,
    pub previous_hash: String,
    /// Lowercase hex SHA-256 over the canonical encoding.
    pub hash: String,
    /// Always 0: there is no proof of work.
    pub nonce: u64,
}

impl Block {
    /// Build and hash a block.
    ///
    /// The timestamp is truncated to whole seconds, the precision the hash
    /// covers.
    pub fn new(
        index: u64,
        timestamp: DateTime<Utc>,
        payload: BlockPayload,
        previous_hash: impl Into<String>,
    ) -> Result<Self, ChainError> {
        let mut block = Block {
            index,
            timestamp: timestamp.trunc_subsecs(0),
            payload,
            previous_hash: previous_hash.into(),
            hash: String::new(),
            nonce: 0,
        };
        block.hash = block.calculate_hash()?;
        Ok(block)
    }

    /// The deterministic first block shared by every node.
    pub fn genesis() -> Result<Self, ChainError> {
        let timestamp = Utc
            .timestamp_opt(GENESIS_TIMESTAMP_SECS, 0)
            .single()
            .ok_or_else(|| ChainError::Encoding("genesis timestamp out of range".into()))?;
        let payload = BlockPayload::Genesis(GenesisRecord {
            message: GENESIS_MESSAGE.to_string(),
        });
        Block::new(0, timestamp, payload, "")
    }

    pub fn block_type(&self) -> BlockType {
        self.payload.block_type()
    }

    pub fn is_genesis(&self) -> bool {
        self.index == 0 && self.previous_hash.is_empty() && self.block_type() == BlockType::Genesis
    }

    /// Recompute the hash from the block's current contents.
    pub fn calculate_hash(&self) -> Result<String, ChainError> {
        let data =
            serde_json::to_value(&self.payload).map_err(|e| ChainError::Encoding(e.to_string()))?;
        let preimage = json!({
            "data": data,
            "index": self.index,
            "nonce": self.nonce,
            "previous_hash": self.previous_hash,
            "timestamp": self.timestamp.timestamp(),
            "type": self.block_type().as_str(),
        });
        Ok(canonical_digest(&preimage))
    }

    /// Self-contained checks: the hash is present and recomputes, the
    /// timestamp is set. Linkage to a chain is checked by the chain.
    pub fn verify_hash(&self) -> Result<(), ChainError> {
        if self.hash.is_empty() {
            return Err(ChainError::invalid(self.index, InvalidBlockReason::EmptyHash));
        }
        if self.timestamp.timestamp() <= 0 {
            return Err(ChainError::invalid(
                self.index,
                InvalidBlockReason::MissingTimestamp,
            ));
        }
        let expected = self.calculate_hash()?;
        if expected != self.hash {
            return Err(ChainError::invalid(
                self.index,
                InvalidBlockReason::HashMismatch {
                    expected,
                    found: self.hash.clone(),
                },
            ));
        }
        Ok(())
    }
}

impl Serialize for Block {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Block", 7)?;
        state.serialize_field("index", &self.index)?;
        state.serialize_field("timestamp", &self.timestamp)?;
        state.serialize_field("data", &self.payload)?;
        state.serialize_field("previous_hash", &self.previous_hash)?;
        state.serialize_field("hash", &self.hash)?;
        state.serialize_field("nonce", &self.nonce)?;
        state.serialize_field("type", &self.block_type())?;
        state.end()
    }
}

/// Untyped wire shape; `data` is decoded once `type` is known.
#[derive(Deserialize)]
struct WireBlock {
    index: u64,
    timestamp: DateTime<Utc>,
    data: Value,
    previous_hash: String,
    hash: String,
    #[serde(default)]
    nonce: u64,
    #[serde(rename = "type")]
    block_type: BlockType,
}

impl TryFrom<WireBlock> for Block {
    type Error = serde_json::Error;

    fn try_from(wire: WireBlock) -> Result<Self, Self::Error> {
        Ok(Block {
            index: wire.index,
            timestamp: wire.timestamp,
            payload: BlockPayload::decode(wire.block_type, wire.data)?,
            previous_hash: wire.previous_hash,
            hash: wire.hash,
            nonce: wire.nonce,
        })
    }
}
