//! # Chain
//!
//! Ordered, hash-linked blocks starting at the genesis block.
//!
//! ## Invariants
//!
//! - `blocks[0]` is the genesis block: index 0, empty previous hash.
//! - For every `i > 0`: `blocks[i].index == i`,
//!   `blocks[i].previous_hash == blocks[i - 1].hash` and `blocks[i].hash`
//!   recomputes from its contents.
//! - The chain grows only by [`Chain::append`] / [`Chain::append_block`] and is
//!   otherwise only swapped wholesale by [`Chain::replace`]. A failed call
//!   leaves the chain untouched.

use chrono::{DateTime, Utc};

use super::block::{Block, BlockPayload};
use super::errors::{ChainError, InvalidBlockReason};

/// The local copy of the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain {
    blocks: Vec<Block>,
}

impl Chain {
    /// A chain holding only the genesis block.
    pub fn new() -> Result<Self, ChainError> {
        Ok(Self {
            blocks: vec![Block::genesis()?],
        })
    }

    /// Adopt `blocks` as a chain if they form a valid one.
    pub fn from_blocks(blocks: Vec<Block>) -> Result<Self, ChainError> {
        validate_blocks(&blocks)?;
        Ok(Self { blocks })
    }

    /// Append a new block carrying `payload`, stamped with the current time.
    pub fn append(&mut self, payload: BlockPayload) -> Result<Block, ChainError> {
        self.append_at(payload, Utc::now())
    }

    /// Append a new block carrying `payload` with an explicit timestamp.
    pub fn append_at(
        &mut self,
        payload: BlockPayload,
        timestamp: DateTime<Utc>,
    ) -> Result<Block, ChainError> {
        let tail = self.latest();
        let block = Block::new(tail.index + 1, timestamp, payload, tail.hash.clone())?;
        self.append_block(block.clone())?;
        Ok(block)
    }

    /// Append a block built elsewhere (e.g. received from a peer).
    pub fn append_block(&mut self, block: Block) -> Result<(), ChainError> {
        self.is_valid_block(&block)?;
        self.blocks.push(block);
        Ok(())
    }

    /// Whether `block` may be appended to this chain as it stands.
    ///
    /// Rejects an empty hash, an unset timestamp, a hash that does not
    /// recompute, an index other than the chain length and a previous hash
    /// other than the tail's hash.
    pub fn is_valid_block(&self, block: &Block) -> Result<(), ChainError> {
        block.verify_hash()?;
        let tail = self.latest();
        let expected_index = self.blocks.len() as u64;
        if block.index != expected_index {
            return Err(ChainError::invalid(
                block.index,
                InvalidBlockReason::IndexMismatch {
                    expected: expected_index,
                    found: block.index,
                },
            ));
        }
        check_link(tail, block)
    }

    /// Re-check the whole chain from genesis.
    pub fn validate(&self) -> Result<(), ChainError> {
        validate_blocks(&self.blocks)
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Linear scan for a block with this hash.
    pub fn has_block(&self, hash: &str) -> bool {
        self.blocks.iter().any(|block| block.hash == hash)
    }

    /// Swap in `blocks` wholesale if they form a valid chain.
    ///
    /// Length policy is the caller's business; this only guards integrity.
    pub fn replace(&mut self, blocks: Vec<Block>) -> Result<(), ChainError> {
        validate_blocks(&blocks)?;
        self.blocks = blocks;
        Ok(())
    }

    pub fn latest(&self) -> &Block {
        // never empty: construction always starts from genesis
        &self.blocks[self.blocks.len() - 1]
    }

    pub fn genesis(&self) -> &Block {
        &self.blocks[0]
    }

    pub fn get(&self, index: u64) -> Option<&Block> {
        usize::try_from(index).ok().and_then(|i| self.blocks.get(i))
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Always false; kept for the `len`/`is_empty` pair.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// Check that `blocks` form a valid chain starting from their own genesis.
pub fn validate_blocks(blocks: &[Block]) -> Result<(), ChainError> {
    let genesis = blocks.first().ok_or(ChainError::EmptyChain)?;
    if genesis.index != 0 || !genesis.previous_hash.is_empty() {
        return Err(ChainError::invalid(
            genesis.index,
            InvalidBlockReason::MalformedGenesis,
        ));
    }
    genesis.verify_hash()?;

    for (position, pair) in blocks.windows(2).enumerate() {
        let (previous, current) = (&pair[0], &pair[1]);
        let expected_index = position as u64 + 1;
        if current.index != expected_index {
            return Err(ChainError::invalid(
                current.index,
                InvalidBlockReason::IndexMismatch {
                    expected: expected_index,
                    found: current.index,
                },
            ));
        }
        current.verify_hash()?;
        check_link(previous, current)?;
    }
    Ok(())
}

fn check_link(previous: &Block, current: &Block) -> Result<(), ChainError> {
    if current.previous_hash != previous.hash {
        return Err(ChainError::invalid(
            current.index,
            InvalidBlockReason::BrokenLink {
                expected: previous.hash.clone(),
                found: current.previous_hash.clone(),
            },
        ));
    }
    Ok(())
}
