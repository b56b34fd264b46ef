//! # Workflow Template
//!
//! The canonical six-step approval sequence. Every contract carries one
//! `ValidationStep` per entry, in this order.

use serde::Serialize;
use shared_types::{AdminRole, ContractStatus};

/// One entry of the approval sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WorkflowStepTemplate {
    pub step_number: u32,
    pub role: AdminRole,
    pub name: &'static str,
    pub required: bool,
    /// Contract status while this step is awaiting validation.
    #[serde(skip)]
    pub pending_status: ContractStatus,
}

const fn step(
    step_number: u32,
    role: AdminRole,
    name: &'static str,
    pending_status: ContractStatus,
) -> WorkflowStepTemplate {
    WorkflowStepTemplate {
        step_number,
        role,
        name,
        required: true,
        pending_status,
    }
}

pub const WORKFLOW_STEPS: [WorkflowStepTemplate; 6] = [
    step(1, AdminRole::ProjectDeveloper, "Project creation", ContractStatus::Draft),
    step(2, AdminRole::TechnicalCommission, "Technical review", ContractStatus::TechnicalReview),
    step(3, AdminRole::LegalCommission, "Legal review", ContractStatus::LegalReview),
    step(4, AdminRole::ContractsChief, "Contracts chief approval", ContractStatus::ContractsReview),
    step(5, AdminRole::AdminChief, "Administrative chief approval", ContractStatus::AdminReview),
    step(6, AdminRole::BudgetAuthority, "Spending authorization", ContractStatus::BudgetReview),
];

pub const TOTAL_STEPS: u32 = WORKFLOW_STEPS.len() as u32;

/// The approval sequence.
pub fn workflow_steps() -> &'static [WorkflowStepTemplate] {
    &WORKFLOW_STEPS
}

pub fn template_for(step_number: u32) -> Option<&'static WorkflowStepTemplate> {
    WORKFLOW_STEPS
        .iter()
        .find(|template| template.step_number == step_number)
}

/// Status of a contract waiting on `step_number`; past the last step the
/// contract is authorized.
pub fn status_for_step(step_number: u32) -> ContractStatus {
    template_for(step_number)
        .map(|template| template.pending_status)
        .unwrap_or(ContractStatus::AuthorizedForPublication)
}
