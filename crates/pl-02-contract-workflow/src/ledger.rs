//! # Ledger State
//!
//! The chain and the contract index it derives, behind one lock.
//!
//! Every chain mutation and the matching index update happen inside a single
//! write-lock scope, so readers never see a block whose effect is missing
//! from the index (or the reverse). Holding the lock across a whole
//! plan-append-apply sequence also serializes transitions of one contract.
//! Callers must not hold the guard across network I/O.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use pl_01_chain_integrity::{Block, BlockPayload, Chain, ChainError};
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

use crate::domain::errors::WorkflowError;
use crate::domain::registry::ContractRegistry;

/// Ledger state shared by the workflow engine, the sync service and the API.
pub type SharedLedger = Arc<RwLock<LedgerState>>;

#[derive(Debug, Clone)]
pub struct LedgerState {
    chain: Chain,
    contracts: ContractRegistry,
}

impl LedgerState {
    /// A ledger holding only the genesis block.
    pub fn new() -> Result<Self, ChainError> {
        Ok(Self {
            chain: Chain::new()?,
            contracts: ContractRegistry::new(),
        })
    }

    pub fn into_shared(self) -> SharedLedger {
        Arc::new(RwLock::new(self))
    }

    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    pub fn contracts(&self) -> &ContractRegistry {
        &self.contracts
    }

    /// Append a locally produced event and apply it to the index.
    ///
    /// The event is staged against the index first, so a payload that would
    /// not apply never reaches the chain.
    pub fn record(&mut self, payload: BlockPayload) -> Result<Block, WorkflowError> {
        let staged = self.contracts.stage(&payload)?;
        let block = self.chain.append(payload)?;
        if let Some(contract) = staged {
            self.contracts.commit(contract);
        }
        Ok(block)
    }

    /// Append a block produced elsewhere.
    ///
    /// Chain integrity decides acceptance. An integral block whose event does
    /// not apply to the index is kept on the chain and skipped by the index,
    /// exactly as a replay would.
    pub fn accept_block(&mut self, block: Block) -> Result<(), ChainError> {
        self.chain.append_block(block.clone())?;
        if let Err(error) = self.contracts.apply(&block) {
            warn!(
                block_index = block.index,
                block_hash = %block.hash,
                %error,
                "Accepted block carries an event that does not apply to the index"
            );
        }
        Ok(())
    }

    /// Swap the chain wholesale and rebuild the index from it.
    pub fn replace_chain(&mut self, blocks: Vec<Block>) -> Result<(), ChainError> {
        self.adopt(Chain::from_blocks(blocks)?);
        Ok(())
    }

    /// Swap in an already validated chain and rebuild the index from it.
    pub fn adopt(&mut self, chain: Chain) {
        self.contracts = ContractRegistry::rebuild(&chain);
        self.chain = chain;
    }

    pub fn stats(&self) -> LedgerStats {
        let latest = self.chain.latest();
        LedgerStats {
            chain_length: self.chain.len(),
            contract_count: self.contracts.len(),
            chain_valid: self.chain.is_valid(),
            latest_block_index: latest.index,
            latest_block_hash: latest.hash.clone(),
            latest_block_timestamp: latest.timestamp,
        }
    }
}

/// Summary served by the stats and health endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerStats {
    pub chain_length: usize,
    pub contract_count: usize,
    pub chain_valid: bool,
    pub latest_block_index: u64,
    pub latest_block_hash: String,
    pub latest_block_timestamp: DateTime<Utc>,
}
