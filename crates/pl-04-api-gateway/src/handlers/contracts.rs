//! Contract and workflow endpoints.
//!
//! Every state-changing call broadcasts the block it appended to the
//! active peers before answering.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use pl_02_contract_workflow::{
    workflow_steps, AuditObservation, ContractFilter, NewContract, StepDecision, WorkflowStatus,
};
use shared_types::{AdminRole, AuditAction, ContractStatus};
use tracing::info;

use super::parse_contract_id;
use crate::domain::error::ApiResult;
use crate::domain::types::{
    BlockRecordedResponse, ContractCreatedResponse, ContractListResponse,
    FilteredContractsResponse, WorkflowStepsResponse,
};
use crate::metrics::{broadcast_and_count, record_local_block};
use crate::router::AppState;

/// `GET /api/contracts`
pub async fn list_contracts(State(state): State<AppState>) -> Json<ContractListResponse> {
    let contracts = state.workflow.list_contracts(ContractFilter::All);
    Json(ContractListResponse {
        success: true,
        count: contracts.len(),
        data: contracts,
    })
}

/// `POST /api/contracts`
pub async fn create_contract(
    State(state): State<AppState>,
    body: Result<Json<NewContract>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ContractCreatedResponse>)> {
    let Json(request) = body?;
    let (contract, block) = state.workflow.create_contract(request)?;

    record_local_block(AuditAction::WorkflowInitialized, &block);
    info!(contract_id = %contract.id, block_index = block.index, "Broadcasting new contract");
    let block_index = block.index;
    broadcast_and_count(state.sync.as_ref(), block);

    Ok((
        StatusCode::CREATED,
        Json(ContractCreatedResponse {
            success: true,
            message: "Contract created".to_string(),
            contract_id: contract.id,
            block_index,
        }),
    ))
}

/// `GET /api/workflow/steps`
pub async fn steps() -> Json<WorkflowStepsResponse> {
    Json(WorkflowStepsResponse {
        steps: workflow_steps(),
    })
}

/// `GET /api/contracts/:id/workflow`
pub async fn workflow_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<WorkflowStatus>> {
    let contract_id = parse_contract_id(&id)?;
    Ok(Json(state.workflow.get_workflow_status(contract_id)?))
}

/// `POST /api/contracts/:id/validate-step`
pub async fn validate_step(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<StepDecision>, JsonRejection>,
) -> ApiResult<Json<BlockRecordedResponse>> {
    let contract_id = parse_contract_id(&id)?;
    let Json(decision) = body?;
    let action = if decision.approved {
        AuditAction::StepApproved
    } else {
        AuditAction::StepRejected
    };
    let block = state.workflow.validate_step(contract_id, decision)?;

    record_local_block(action, &block);
    let response = BlockRecordedResponse::new("Step validated", &block);
    broadcast_and_count(state.sync.as_ref(), block);
    Ok(Json(response))
}

/// `POST /api/contracts/:id/audit`
pub async fn add_audit_observation(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<AuditObservation>, JsonRejection>,
) -> ApiResult<Json<BlockRecordedResponse>> {
    let contract_id = parse_contract_id(&id)?;
    let Json(observation) = body?;
    let block = state.workflow.add_audit_observation(contract_id, observation)?;

    record_local_block(AuditAction::AuditObservation, &block);
    let response = BlockRecordedResponse::new("Audit observation added", &block);
    broadcast_and_count(state.sync.as_ref(), block);
    Ok(Json(response))
}

/// `GET /api/contracts/by-status/:status`
pub async fn by_status(
    State(state): State<AppState>,
    Path(status): Path<String>,
) -> ApiResult<Json<FilteredContractsResponse>> {
    let status: ContractStatus = status.parse()?;
    Ok(filtered(&state, ContractFilter::Status(status)))
}

/// `GET /api/contracts/by-role/:role`
pub async fn by_role(
    State(state): State<AppState>,
    Path(role): Path<String>,
) -> ApiResult<Json<FilteredContractsResponse>> {
    let role: AdminRole = role.parse()?;
    Ok(filtered(&state, ContractFilter::Role(role)))
}

fn filtered(state: &AppState, filter: ContractFilter) -> Json<FilteredContractsResponse> {
    let contracts = state.workflow.list_contracts(filter);
    Json(FilteredContractsResponse {
        count: contracts.len(),
        contracts,
    })
}
