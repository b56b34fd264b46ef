//! Sample payloads and pre-built chains for tests.

use chrono::Utc;
use rust_decimal::Decimal;
use shared_types::{
    AdminRole, Contract, ContractCreationRecord, ContractStatus, ValidationRecord,
};
use uuid::Uuid;

use crate::domain::{BlockPayload, Chain};

/// A bare contract in `Draft`, without workflow steps.
pub fn sample_contract() -> Contract {
    let now = Utc::now();
    Contract {
        id: Uuid::new_v4(),
        entity_code: "ALC-MED-001".to_string(),
        entity_name: "Alcaldía de Medellín".to_string(),
        contract_type: "OBRA_PUBLICA".to_string(),
        description: "Construcción de puente peatonal".to_string(),
        amount: Decimal::new(2_500_000_000, 0),
        status: ContractStatus::Draft,
        created_by: "dev-001".to_string(),
        created_at: now,
        updated_at: now,
        current_step: 1,
        validation_steps: Vec::new(),
        audit_trail: Vec::new(),
    }
}

pub fn creation_payload() -> BlockPayload {
    BlockPayload::ContractCreation(ContractCreationRecord {
        contract: sample_contract(),
    })
}

pub fn validation_payload() -> BlockPayload {
    BlockPayload::Validation(ValidationRecord {
        contract_id: Uuid::new_v4(),
        step: 1,
        validator_id: "dev-001".to_string(),
        validator_name: "Ana Restrepo".to_string(),
        role: AdminRole::ProjectDeveloper,
        approved: true,
        comments: "Documentación completa".to_string(),
        timestamp: Utc::now(),
        audit_entries: Vec::new(),
    })
}

/// Genesis followed by `extra` contract-creation blocks.
pub fn chain_with_blocks(extra: usize) -> Chain {
    let mut chain = Chain::new().expect("genesis");
    for _ in 0..extra {
        chain.append(creation_payload()).expect("append");
    }
    chain
}
