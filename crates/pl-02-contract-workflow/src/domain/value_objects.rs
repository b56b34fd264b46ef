//! # Value Objects
//!
//! Requests accepted by the workflow engine and the filter used to list
//! contracts. Requests deserialize straight from the HTTP bodies.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared_types::{AdminRole, Contract, ContractId, ContractStatus};

use super::errors::WorkflowError;
use super::template::template_for;

/// A contract to be created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewContract {
    pub entity_code: String,
    pub entity_name: String,
    pub contract_type: String,
    pub description: String,
    pub amount: Decimal,
    pub created_by: String,
}

impl NewContract {
    /// Every text field must be non-blank and the amount strictly positive.
    pub fn validate(&self) -> Result<(), WorkflowError> {
        require("entity_code", &self.entity_code)?;
        require("entity_name", &self.entity_name)?;
        require("contract_type", &self.contract_type)?;
        require("description", &self.description)?;
        require("created_by", &self.created_by)?;
        if self.amount <= Decimal::ZERO {
            return Err(WorkflowError::validation(
                "amount",
                format!("must be positive, got {}", self.amount),
            ));
        }
        Ok(())
    }

    /// The contract before its workflow is initialized.
    pub(crate) fn into_contract(self, id: ContractId, now: DateTime<Utc>) -> Contract {
        Contract {
            id,
            entity_code: self.entity_code,
            entity_name: self.entity_name,
            contract_type: self.contract_type,
            description: self.description,
            amount: self.amount,
            status: ContractStatus::Draft,
            created_by: self.created_by,
            created_at: now,
            updated_at: now,
            current_step: 1,
            validation_steps: Vec::new(),
            audit_trail: Vec::new(),
        }
    }
}

/// An approval or rejection of one workflow step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepDecision {
    pub step_number: u32,
    pub validator_id: String,
    #[serde(default)]
    pub validator_name: String,
    pub role: AdminRole,
    pub approved: bool,
    #[serde(default)]
    pub comments: String,
}

impl StepDecision {
    pub fn validate(&self) -> Result<(), WorkflowError> {
        require("validator_id", &self.validator_id)
    }
}

/// An observation attached by an external auditor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditObservation {
    pub auditor_id: String,
    pub role: AdminRole,
    pub observation: String,
}

impl AuditObservation {
    pub fn validate(&self) -> Result<(), WorkflowError> {
        require("auditor_id", &self.auditor_id)?;
        require("observation", &self.observation)
    }
}

/// Which contracts to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContractFilter {
    #[default]
    All,
    Status(ContractStatus),
    /// An approval role sees the non-terminal contracts whose current step
    /// it owns; an external-audit role sees every contract.
    Role(AdminRole),
}

impl ContractFilter {
    pub fn matches(&self, contract: &Contract) -> bool {
        match self {
            ContractFilter::All => true,
            ContractFilter::Status(status) => contract.status == *status,
            ContractFilter::Role(role) if role.is_external_auditor() => true,
            ContractFilter::Role(role) => {
                !contract.status.is_terminal()
                    && template_for(contract.current_step).map(|t| t.role) == Some(*role)
            }
        }
    }
}

fn require(field: &'static str, value: &str) -> Result<(), WorkflowError> {
    if value.trim().is_empty() {
        return Err(WorkflowError::validation(field, "must not be empty"));
    }
    Ok(())
}
