//! # Workflow Engine Tests

use super::*;
use crate::domain::registry::ContractRegistry;
use crate::domain::template::workflow_steps;
use crate::ledger::LedgerState;
use rust_decimal::Decimal;
use shared_types::{AdminRole, AuditAction, ContractStatus, ValidationStatus};

fn make_engine() -> WorkflowEngine {
    WorkflowEngine::new(LedgerState::new().unwrap().into_shared())
}

fn bridge_request() -> NewContract {
    NewContract {
        entity_code: "ALC-MED-001".to_string(),
        entity_name: "Alcaldía de Medellín".to_string(),
        contract_type: "OBRA_PUBLICA".to_string(),
        description: "Construcción de puente peatonal sobre el río Medellín".to_string(),
        amount: Decimal::new(2_500_000_000, 0),
        created_by: "dev-001".to_string(),
    }
}

fn decision(step: u32, role: AdminRole, approved: bool) -> StepDecision {
    StepDecision {
        step_number: step,
        validator_id: format!("{}-1", role.as_str().to_lowercase()),
        validator_name: "Validador".to_string(),
        role,
        approved,
        comments: "Revisado".to_string(),
    }
}

fn chain_len(engine: &WorkflowEngine) -> usize {
    engine.ledger().read().chain().len()
}

#[test]
fn test_create_contract_initializes_workflow_and_appends_block() {
    let engine = make_engine();
    let (contract, block) = engine.create_contract(bridge_request()).unwrap();

    assert_eq!(contract.status, ContractStatus::Draft);
    assert_eq!(contract.current_step, 1);
    assert_eq!(contract.validation_steps.len(), 6);
    assert_eq!(block.index, 1);
    assert_eq!(block.payload.contract_id(), Some(contract.id));
    assert_eq!(engine.get_contract(contract.id).unwrap(), contract);
}

#[test]
fn test_create_contract_rejects_invalid_input_without_appending() {
    let engine = make_engine();
    let mut request = bridge_request();
    request.amount = Decimal::ZERO;
    assert!(matches!(
        engine.create_contract(request),
        Err(WorkflowError::Validation { field: "amount", .. })
    ));
    assert_eq!(chain_len(&engine), 1);
    assert!(engine.list_contracts(ContractFilter::All).is_empty());
}

#[test]
fn test_full_approval_path_appends_one_block_per_step() {
    let engine = make_engine();
    let (contract, _) = engine.create_contract(bridge_request()).unwrap();

    for template in workflow_steps() {
        engine
            .validate_step(contract.id, decision(template.step_number, template.role, true))
            .unwrap();
    }

    let status = engine.get_workflow_status(contract.id).unwrap();
    assert_eq!(status.status, ContractStatus::AuthorizedForPublication);
    assert_eq!(status.completed_steps, 6);
    assert_eq!(status.progress, 100.0);
    assert!(!status.can_advance);
    // the last step stays current once authorized
    assert_eq!(status.current_step, 6);
    assert_eq!(status.next_role, Some(AdminRole::BudgetAuthority));
    assert_eq!(
        status.audit_trail.last().map(|e| e.action),
        Some(AuditAction::WorkflowCompleted)
    );
    // genesis + creation + six validations
    assert_eq!(chain_len(&engine), 8);
}

#[test]
fn test_validate_step_unknown_contract() {
    let engine = make_engine();
    let id = Uuid::new_v4();
    assert_eq!(
        engine.validate_step(id, decision(1, AdminRole::ProjectDeveloper, true)),
        Err(WorkflowError::ContractNotFound(id))
    );
}

#[test]
fn test_failed_validations_leave_state_unchanged() {
    let engine = make_engine();
    let (contract, _) = engine.create_contract(bridge_request()).unwrap();
    let before = engine.get_contract(contract.id).unwrap();

    assert!(matches!(
        engine.validate_step(contract.id, decision(2, AdminRole::TechnicalCommission, true)),
        Err(WorkflowError::StepMismatch {
            current: 1,
            requested: 2
        })
    ));
    assert!(matches!(
        engine.validate_step(contract.id, decision(1, AdminRole::Citizen, true)),
        Err(WorkflowError::RoleMismatch { .. })
    ));

    assert_eq!(engine.get_contract(contract.id).unwrap(), before);
    assert_eq!(chain_len(&engine), 2);
}

#[test]
fn test_rejected_contract_accepts_no_further_steps() {
    let engine = make_engine();
    let (contract, _) = engine.create_contract(bridge_request()).unwrap();
    engine
        .validate_step(contract.id, decision(1, AdminRole::ProjectDeveloper, true))
        .unwrap();
    engine
        .validate_step(
            contract.id,
            decision(2, AdminRole::TechnicalCommission, false),
        )
        .unwrap();

    let status = engine.get_workflow_status(contract.id).unwrap();
    assert_eq!(status.status, ContractStatus::Rejected);
    assert_eq!(status.validation_steps[1].status, ValidationStatus::Rejected);
    assert!(!status.can_advance);

    let length = chain_len(&engine);
    assert_eq!(
        engine.validate_step(contract.id, decision(2, AdminRole::TechnicalCommission, true)),
        Err(WorkflowError::TerminalState(ContractStatus::Rejected))
    );
    assert_eq!(chain_len(&engine), length);
}

#[test]
fn test_authorized_contract_is_terminal_too() {
    let engine = make_engine();
    let (contract, _) = engine.create_contract(bridge_request()).unwrap();
    for template in workflow_steps() {
        engine
            .validate_step(contract.id, decision(template.step_number, template.role, true))
            .unwrap();
    }
    assert_eq!(
        engine.validate_step(contract.id, decision(6, AdminRole::BudgetAuthority, true)),
        Err(WorkflowError::TerminalState(
            ContractStatus::AuthorizedForPublication
        ))
    );
}

#[test]
fn test_audit_observation_by_external_auditor() {
    let engine = make_engine();
    let (contract, _) = engine.create_contract(bridge_request()).unwrap();

    let block = engine
        .add_audit_observation(
            contract.id,
            AuditObservation {
                auditor_id: "personeria-3".to_string(),
                role: AdminRole::Prosecutor,
                observation: "Solicito estudios previos".to_string(),
            },
        )
        .unwrap();
    assert_eq!(block.block_type(), pl_01_chain_integrity::BlockType::AuditObservation);

    let status = engine.get_workflow_status(contract.id).unwrap();
    assert_eq!(status.status, ContractStatus::Draft);
    assert_eq!(status.current_step, 1);
    assert_eq!(status.audit_trail.len(), 2);
}

#[test]
fn test_audit_observation_by_approval_role_is_unauthorized() {
    let engine = make_engine();
    let (contract, _) = engine.create_contract(bridge_request()).unwrap();
    assert_eq!(
        engine.add_audit_observation(
            contract.id,
            AuditObservation {
                auditor_id: "jefe-1".to_string(),
                role: AdminRole::ContractsChief,
                observation: "Todo en orden".to_string(),
            },
        ),
        Err(WorkflowError::UnauthorizedRole(AdminRole::ContractsChief))
    );
    assert_eq!(chain_len(&engine), 2);
}

#[test]
fn test_workflow_status_mid_flow() {
    let engine = make_engine();
    let (contract, _) = engine.create_contract(bridge_request()).unwrap();
    for step in &workflow_steps()[..2] {
        engine
            .validate_step(contract.id, decision(step.step_number, step.role, true))
            .unwrap();
    }
    let status = engine.get_workflow_status(contract.id).unwrap();
    assert_eq!(status.current_step, 3);
    assert_eq!(status.status, ContractStatus::LegalReview);
    assert_eq!(status.completed_steps, 2);
    assert!((status.progress - 100.0 / 3.0).abs() < 1e-9);
    assert!(status.can_advance);
    assert_eq!(status.next_role, Some(AdminRole::LegalCommission));
}

#[test]
fn test_workflow_status_of_rejected_contract_keeps_step_role() {
    let engine = make_engine();
    let (contract, _) = engine.create_contract(bridge_request()).unwrap();
    engine
        .validate_step(contract.id, decision(1, AdminRole::ProjectDeveloper, true))
        .unwrap();
    engine
        .validate_step(contract.id, decision(2, AdminRole::TechnicalCommission, false))
        .unwrap();

    let status = engine.get_workflow_status(contract.id).unwrap();
    assert_eq!(status.status, ContractStatus::Rejected);
    assert_eq!(status.current_step, 2);
    assert!(!status.can_advance);
    assert_eq!(status.next_role, Some(AdminRole::TechnicalCommission));
}

#[test]
fn test_live_index_equals_replay_of_chain() {
    let engine = make_engine();
    let (first, _) = engine.create_contract(bridge_request()).unwrap();
    let (second, _) = engine.create_contract(bridge_request()).unwrap();
    engine
        .validate_step(first.id, decision(1, AdminRole::ProjectDeveloper, true))
        .unwrap();
    engine
        .validate_step(second.id, decision(1, AdminRole::ProjectDeveloper, false))
        .unwrap();
    engine
        .add_audit_observation(
            second.id,
            AuditObservation {
                auditor_id: "ciudadano-9".to_string(),
                role: AdminRole::Citizen,
                observation: "¿Por qué se rechazó?".to_string(),
            },
        )
        .unwrap();

    let ledger = engine.ledger().read();
    assert_eq!(
        &ContractRegistry::rebuild(ledger.chain()),
        ledger.contracts()
    );
}

#[test]
fn test_list_by_role_follows_current_step() {
    let engine = make_engine();
    let (advanced, _) = engine.create_contract(bridge_request()).unwrap();
    engine.create_contract(bridge_request()).unwrap();
    engine
        .validate_step(advanced.id, decision(1, AdminRole::ProjectDeveloper, true))
        .unwrap();

    let technical = engine.list_contracts(ContractFilter::Role(AdminRole::TechnicalCommission));
    assert_eq!(technical.len(), 1);
    assert_eq!(technical[0].id, advanced.id);
    assert_eq!(
        engine
            .list_contracts(ContractFilter::Role(AdminRole::ProjectDeveloper))
            .len(),
        1
    );
    assert_eq!(
        engine
            .list_contracts(ContractFilter::Status(ContractStatus::TechnicalReview))
            .len(),
        1
    );
    assert_eq!(
        engine
            .list_contracts(ContractFilter::Role(AdminRole::Comptroller))
            .len(),
        2
    );
}

#[test]
fn test_concurrent_validations_of_one_step_apply_once() {
    let engine = make_engine();
    let (contract, _) = engine.create_contract(bridge_request()).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let engine = engine.clone();
            std::thread::spawn(move || {
                engine.validate_step(contract.id, decision(1, AdminRole::ProjectDeveloper, true))
            })
        })
        .collect();
    let successes = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(Result::is_ok)
        .count();

    assert_eq!(successes, 1);
    assert_eq!(engine.get_contract(contract.id).unwrap().current_step, 2);
    assert_eq!(chain_len(&engine), 3);
}
