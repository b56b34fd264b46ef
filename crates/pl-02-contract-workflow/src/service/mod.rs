//! # Workflow Engine
//!
//! Application service implementing [`WorkflowApi`] over the shared ledger.
//!
//! ## Transition Sequence
//!
//! ```text
//! validate input (no lock)
//!   └─ write lock ─┬─ look up contract
//!                  ├─ plan (guards, event record)
//!                  ├─ stage against index
//!                  ├─ append block
//!                  └─ commit index
//! return block → caller broadcasts (no lock)
//! ```

use chrono::Utc;
use pl_01_chain_integrity::{Block, BlockPayload};
use shared_types::{Contract, ContractCreationRecord, ContractId};
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::errors::WorkflowError;
use crate::domain::state_machine::{initialize_workflow, plan_observation, plan_validation};
use crate::domain::status::WorkflowStatus;
use crate::domain::value_objects::{AuditObservation, ContractFilter, NewContract, StepDecision};
use crate::ledger::{LedgerStats, SharedLedger};
use crate::ports::inbound::WorkflowApi;

#[cfg(test)]
mod tests;

/// The role-gated approval engine.
///
/// Cheap to clone; clones share the same ledger.
#[derive(Clone)]
pub struct WorkflowEngine {
    ledger: SharedLedger,
}

impl WorkflowEngine {
    pub fn new(ledger: SharedLedger) -> Self {
        Self { ledger }
    }

    pub fn ledger(&self) -> &SharedLedger {
        &self.ledger
    }
}

impl WorkflowApi for WorkflowEngine {
    fn create_contract(&self, request: NewContract) -> Result<(Contract, Block), WorkflowError> {
        request.validate()?;

        let now = Utc::now();
        let mut contract = request.into_contract(Uuid::new_v4(), now);
        initialize_workflow(&mut contract, now);

        let payload = BlockPayload::ContractCreation(ContractCreationRecord {
            contract: contract.clone(),
        });
        let block = self.ledger.write().record(payload)?;

        info!(
            contract_id = %contract.id,
            entity_code = %contract.entity_code,
            block_index = block.index,
            "Contract created"
        );
        Ok((contract, block))
    }

    fn validate_step(
        &self,
        contract_id: ContractId,
        decision: StepDecision,
    ) -> Result<Block, WorkflowError> {
        decision.validate()?;

        let mut ledger = self.ledger.write();
        let contract = ledger
            .contracts()
            .get(&contract_id)
            .ok_or(WorkflowError::ContractNotFound(contract_id))?;
        let record = plan_validation(contract, &decision, Utc::now())?;
        let block = ledger.record(BlockPayload::Validation(record))?;
        drop(ledger);

        info!(
            %contract_id,
            step = decision.step_number,
            role = %decision.role,
            approved = decision.approved,
            block_index = block.index,
            "Workflow step validated"
        );
        Ok(block)
    }

    fn add_audit_observation(
        &self,
        contract_id: ContractId,
        observation: AuditObservation,
    ) -> Result<Block, WorkflowError> {
        observation.validate()?;

        let mut ledger = self.ledger.write();
        let contract = ledger
            .contracts()
            .get(&contract_id)
            .ok_or(WorkflowError::ContractNotFound(contract_id))?;
        let record = plan_observation(contract, &observation, Utc::now())?;
        let block = ledger.record(BlockPayload::AuditObservation(record))?;
        drop(ledger);

        info!(
            %contract_id,
            role = %observation.role,
            block_index = block.index,
            "Audit observation recorded"
        );
        Ok(block)
    }

    fn get_contract(&self, contract_id: ContractId) -> Result<Contract, WorkflowError> {
        self.ledger
            .read()
            .contracts()
            .get(&contract_id)
            .cloned()
            .ok_or(WorkflowError::ContractNotFound(contract_id))
    }

    fn get_workflow_status(&self, contract_id: ContractId) -> Result<WorkflowStatus, WorkflowError> {
        let ledger = self.ledger.read();
        let contract = ledger
            .contracts()
            .get(&contract_id)
            .ok_or(WorkflowError::ContractNotFound(contract_id))?;
        Ok(WorkflowStatus::of(contract))
    }

    fn list_contracts(&self, filter: ContractFilter) -> Vec<Contract> {
        let contracts = self.ledger.read().contracts().list(filter);
        debug!(?filter, count = contracts.len(), "Listed contracts");
        contracts
    }

    fn ledger_stats(&self) -> LedgerStats {
        self.ledger.read().stats()
    }
}
