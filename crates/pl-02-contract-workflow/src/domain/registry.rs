//! # Contract Registry
//!
//! Index of contract id to current contract state, derived from the chain.
//!
//! The registry is a left fold of [`ContractRegistry::apply`] over the chain
//! from genesis. The live path applies each new block through the same
//! function, so at any time the registry equals `rebuild(chain)`.

use pl_01_chain_integrity::{Block, BlockPayload, Chain};
use shared_types::{Contract, ContractId};
use std::collections::HashMap;
use tracing::warn;

use super::errors::WorkflowError;
use super::state_machine::{apply_observation, apply_validation};
use super::value_objects::ContractFilter;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContractRegistry {
    contracts: HashMap<ContractId, Contract>,
}

impl ContractRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replay `chain` from genesis.
    ///
    /// A block whose event does not apply (unknown contract, out-of-sequence
    /// step, duplicate creation) is skipped with a warning; it stays on the
    /// chain but has no effect on the index.
    pub fn rebuild(chain: &Chain) -> Self {
        let mut registry = Self::new();
        for block in chain.blocks() {
            if let Err(error) = registry.apply(block) {
                warn!(
                    block_index = block.index,
                    block_hash = %block.hash,
                    %error,
                    "Skipping block with inapplicable event during replay"
                );
            }
        }
        registry
    }

    /// Fold one block into the index. All or nothing.
    pub fn apply(&mut self, block: &Block) -> Result<(), WorkflowError> {
        if let Some(contract) = self.stage(&block.payload)? {
            self.commit(contract);
        }
        Ok(())
    }

    /// Compute the contract state `payload` would produce without touching
    /// the index. `None` for payloads that carry no contract event.
    pub fn stage(&self, payload: &BlockPayload) -> Result<Option<Contract>, WorkflowError> {
        match payload {
            BlockPayload::Genesis(_) => Ok(None),
            BlockPayload::ContractCreation(record) => {
                let id = record.contract.id;
                if self.contracts.contains_key(&id) {
                    return Err(WorkflowError::DuplicateContract(id));
                }
                Ok(Some(record.contract.clone()))
            }
            BlockPayload::Validation(record) => {
                let mut contract = self.cloned(record.contract_id)?;
                apply_validation(&mut contract, record)?;
                Ok(Some(contract))
            }
            BlockPayload::AuditObservation(record) => {
                let mut contract = self.cloned(record.contract_id)?;
                apply_observation(&mut contract, record)?;
                Ok(Some(contract))
            }
        }
    }

    /// Store a staged contract state.
    pub fn commit(&mut self, contract: Contract) {
        self.contracts.insert(contract.id, contract);
    }

    pub fn get(&self, id: &ContractId) -> Option<&Contract> {
        self.contracts.get(id)
    }

    /// Matching contracts, oldest first.
    pub fn list(&self, filter: ContractFilter) -> Vec<Contract> {
        let mut contracts: Vec<Contract> = self
            .contracts
            .values()
            .filter(|contract| filter.matches(contract))
            .cloned()
            .collect();
        contracts.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        contracts
    }

    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }

    fn cloned(&self, id: ContractId) -> Result<Contract, WorkflowError> {
        self.contracts
            .get(&id)
            .cloned()
            .ok_or(WorkflowError::ContractNotFound(id))
    }
}
