//! # Workflow Status
//!
//! Read-only progress snapshot of a contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared_types::{AdminRole, AuditEntry, Contract, ContractId, ContractStatus, ValidationStep};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowStatus {
    pub contract_id: ContractId,
    pub current_step: u32,
    pub total_steps: u32,
    /// Number of approved steps.
    pub completed_steps: u32,
    /// `completed_steps / total_steps * 100`.
    pub progress: f64,
    pub status: ContractStatus,
    /// False once the contract is terminal.
    pub can_advance: bool,
    /// Role owning the current step; `None` only past the last step.
    pub next_role: Option<AdminRole>,
    pub validation_steps: Vec<ValidationStep>,
    pub audit_trail: Vec<AuditEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WorkflowStatus {
    pub fn of(contract: &Contract) -> Self {
        let total_steps = contract.validation_steps.len() as u32;
        let completed_steps = contract.completed_steps() as u32;
        let progress = if total_steps == 0 {
            0.0
        } else {
            f64::from(completed_steps) / f64::from(total_steps) * 100.0
        };
        let can_advance = !contract.status.is_terminal();
        let next_role = contract.step(contract.current_step).map(|step| step.role);

        Self {
            contract_id: contract.id,
            current_step: contract.current_step,
            total_steps,
            completed_steps,
            progress,
            status: contract.status,
            can_advance,
            next_role,
            validation_steps: contract.validation_steps.clone(),
            audit_trail: contract.audit_trail.clone(),
            created_at: contract.created_at,
            updated_at: contract.updated_at,
        }
    }
}
