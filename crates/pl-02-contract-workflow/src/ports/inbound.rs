//! Inbound port (API) of the contract workflow subsystem.

use pl_01_chain_integrity::Block;
use shared_types::{Contract, ContractId};

use crate::domain::errors::WorkflowError;
use crate::domain::status::WorkflowStatus;
use crate::domain::value_objects::{AuditObservation, ContractFilter, NewContract, StepDecision};
use crate::ledger::LedgerStats;

/// Primary API of the workflow engine.
///
/// Every state-changing call returns the block it appended so that the
/// caller can broadcast it to peers.
pub trait WorkflowApi: Send + Sync {
    /// Validate the request, assign an id, initialize the workflow and record
    /// a `CONTRACT_CREATION` block.
    fn create_contract(&self, request: NewContract) -> Result<(Contract, Block), WorkflowError>;

    /// Approve or reject the contract's current step.
    ///
    /// # Errors
    /// `ContractNotFound`, `TerminalState`, `StepMismatch`, `RoleMismatch`,
    /// checked in that order. A failed call changes nothing.
    fn validate_step(
        &self,
        contract_id: ContractId,
        decision: StepDecision,
    ) -> Result<Block, WorkflowError>;

    /// Attach an external-audit observation.
    ///
    /// # Errors
    /// `ContractNotFound`, `UnauthorizedRole`.
    fn add_audit_observation(
        &self,
        contract_id: ContractId,
        observation: AuditObservation,
    ) -> Result<Block, WorkflowError>;

    fn get_contract(&self, contract_id: ContractId) -> Result<Contract, WorkflowError>;

    fn get_workflow_status(&self, contract_id: ContractId) -> Result<WorkflowStatus, WorkflowError>;

    fn list_contracts(&self, filter: ContractFilter) -> Vec<Contract>;

    fn ledger_stats(&self) -> LedgerStats;
}
