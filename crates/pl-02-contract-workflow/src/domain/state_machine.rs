//! # Approval State Machine
//!
//! ```text
//! DRAFT → TECHNICAL_REVIEW → LEGAL_REVIEW → CONTRACTS_REVIEW
//!       → ADMIN_REVIEW → BUDGET_REVIEW → AUTHORIZED_FOR_PUBLICATION
//!   any non-terminal ──reject──→ REJECTED (absorbing)
//! ```
//!
//! Transitions are split in two halves:
//!
//! - `plan_*` checks the guards against the current contract and produces
//!   the event record that will go into a block.
//! - `apply_*` folds a record into a contract. It re-checks the same guards,
//!   then mutates, so it either applies fully or not at all. The live path
//!   and chain replay both go through it.

use chrono::{DateTime, Utc};
use shared_types::{
    AdminRole, AuditAction, AuditEntry, AuditObservationRecord, Contract, ContractStatus,
    ValidationRecord, ValidationStatus, ValidationStep,
};
use uuid::Uuid;

use super::errors::WorkflowError;
use super::template::{status_for_step, workflow_steps};
use super::value_objects::{AuditObservation, StepDecision};

/// Stamp the full step template onto a freshly created contract.
pub fn initialize_workflow(contract: &mut Contract, now: DateTime<Utc>) {
    contract.validation_steps = workflow_steps()
        .iter()
        .map(|template| ValidationStep {
            step_number: template.step_number,
            role: template.role,
            status: ValidationStatus::Pending,
            required: template.required,
            validator_id: String::new(),
            validator_name: String::new(),
            comments: String::new(),
            timestamp: None,
        })
        .collect();
    contract.current_step = 1;
    contract.status = ContractStatus::Draft;
    contract.updated_at = now;
    contract.audit_trail.push(audit_entry(
        AuditAction::WorkflowInitialized,
        &contract.created_by,
        AdminRole::ProjectDeveloper,
        now,
        "Workflow initialized".to_string(),
    ));
}

/// Guards of a step validation, in reporting order: terminal status, step
/// sequencing, role.
pub fn check_step(contract: &Contract, step: u32, role: AdminRole) -> Result<(), WorkflowError> {
    if contract.status.is_terminal() {
        return Err(WorkflowError::TerminalState(contract.status));
    }
    if step != contract.current_step {
        return Err(WorkflowError::StepMismatch {
            current: contract.current_step,
            requested: step,
        });
    }
    let expected = contract
        .step(step)
        .map(|s| s.role)
        .ok_or(WorkflowError::StepMismatch {
            current: contract.current_step,
            requested: step,
        })?;
    if expected != role {
        return Err(WorkflowError::RoleMismatch {
            step,
            expected,
            received: role,
        });
    }
    Ok(())
}

/// Check a decision against `contract` and build the record describing it.
pub fn plan_validation(
    contract: &Contract,
    decision: &StepDecision,
    now: DateTime<Utc>,
) -> Result<ValidationRecord, WorkflowError> {
    check_step(contract, decision.step_number, decision.role)?;

    let step = decision.step_number;
    let mut audit_entries = Vec::with_capacity(2);
    if decision.approved {
        audit_entries.push(audit_entry(
            AuditAction::StepApproved,
            &decision.validator_id,
            decision.role,
            now,
            format!("Step {step} approved: {}", decision.comments),
        ));
        if is_final_step(contract, step) {
            audit_entries.push(audit_entry(
                AuditAction::WorkflowCompleted,
                &decision.validator_id,
                decision.role,
                now,
                "Validation workflow completed".to_string(),
            ));
        }
    } else {
        audit_entries.push(audit_entry(
            AuditAction::StepRejected,
            &decision.validator_id,
            decision.role,
            now,
            format!("Step {step} rejected: {}", decision.comments),
        ));
    }

    Ok(ValidationRecord {
        contract_id: contract.id,
        step,
        validator_id: decision.validator_id.clone(),
        validator_name: decision.validator_name.clone(),
        role: decision.role,
        approved: decision.approved,
        comments: decision.comments.clone(),
        timestamp: now,
        audit_entries,
    })
}

/// Fold a validation record into `contract`.
pub fn apply_validation(
    contract: &mut Contract,
    record: &ValidationRecord,
) -> Result<(), WorkflowError> {
    check_step(contract, record.step, record.role)?;
    let is_final = is_final_step(contract, record.step);

    if let Some(step) = contract
        .validation_steps
        .iter_mut()
        .find(|s| s.step_number == record.step)
    {
        step.validator_id = record.validator_id.clone();
        step.validator_name = record.validator_name.clone();
        step.comments = record.comments.clone();
        step.timestamp = Some(record.timestamp);
        step.status = if record.approved {
            ValidationStatus::Approved
        } else {
            ValidationStatus::Rejected
        };
    }

    contract.status = match (record.approved, is_final) {
        (false, _) => ContractStatus::Rejected,
        (true, true) => ContractStatus::AuthorizedForPublication,
        (true, false) => {
            contract.current_step += 1;
            status_for_step(contract.current_step)
        }
    };
    contract
        .audit_trail
        .extend(record.audit_entries.iter().cloned());
    contract.updated_at = record.timestamp;
    Ok(())
}

/// Observations are open to external auditors only, in any contract status.
pub fn check_observer(role: AdminRole) -> Result<(), WorkflowError> {
    if !role.is_external_auditor() {
        return Err(WorkflowError::UnauthorizedRole(role));
    }
    Ok(())
}

pub fn plan_observation(
    contract: &Contract,
    observation: &AuditObservation,
    now: DateTime<Utc>,
) -> Result<AuditObservationRecord, WorkflowError> {
    check_observer(observation.role)?;
    Ok(AuditObservationRecord {
        contract_id: contract.id,
        auditor: observation.auditor_id.clone(),
        role: observation.role,
        observation: observation.observation.clone(),
        timestamp: now,
        audit_entry: audit_entry(
            AuditAction::AuditObservation,
            &observation.auditor_id,
            observation.role,
            now,
            observation.observation.clone(),
        ),
    })
}

/// Fold an observation into `contract`. Status and current step stay put.
pub fn apply_observation(
    contract: &mut Contract,
    record: &AuditObservationRecord,
) -> Result<(), WorkflowError> {
    check_observer(record.role)?;
    contract.audit_trail.push(record.audit_entry.clone());
    contract.updated_at = record.timestamp;
    Ok(())
}

fn is_final_step(contract: &Contract, step: u32) -> bool {
    step as usize >= contract.validation_steps.len()
}

fn audit_entry(
    action: AuditAction,
    user_id: &str,
    user_role: AdminRole,
    timestamp: DateTime<Utc>,
    description: String,
) -> AuditEntry {
    AuditEntry {
        id: Uuid::new_v4(),
        action,
        user_id: user_id.to_string(),
        user_role,
        timestamp,
        description,
    }
}
