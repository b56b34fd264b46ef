//! Example contracts for demonstration nodes.

use ledger_telemetry::log_block_event;
use pl_02_contract_workflow::{NewContract, WorkflowApi, WorkflowError};
use pl_04_api_gateway::metrics::record_local_block;
use rust_decimal::Decimal;
use shared_types::{AuditAction, Contract};

/// A public-works bridge and a school equipment purchase.
pub fn example_contracts() -> Vec<NewContract> {
    vec![
        NewContract {
            entity_code: "08001".to_string(),
            entity_name: "Alcaldía de Medellín".to_string(),
            contract_type: "OBRA_PUBLICA".to_string(),
            description: "Construcción de puente peatonal en la Comuna 1".to_string(),
            amount: Decimal::new(2_500_000_000, 0),
            created_by: "funcionario.obras@medellin.gov.co".to_string(),
        },
        NewContract {
            entity_code: "11001".to_string(),
            entity_name: "Secretaría de Educación de Bogotá".to_string(),
            contract_type: "SUMINISTRO".to_string(),
            description: "Adquisición de 500 computadores para colegios públicos".to_string(),
            amount: Decimal::new(800_000_000, 0),
            created_by: "compras.educacion@educacionbogota.edu.co".to_string(),
        },
    ]
}

/// Create the example contracts. Peers pick them up on their next sync.
pub fn seed_example_contracts(workflow: &dyn WorkflowApi) -> Result<Vec<Contract>, WorkflowError> {
    let mut created = Vec::new();
    for request in example_contracts() {
        let (contract, block) = workflow.create_contract(request)?;
        record_local_block(AuditAction::WorkflowInitialized, &block);
        log_block_event!(
            info,
            "genesis",
            "Example contract created",
            block.index,
            block.hash,
            contract_id = %contract.id,
            entity = %contract.entity_name
        );
        created.push(contract);
    }
    Ok(created)
}
