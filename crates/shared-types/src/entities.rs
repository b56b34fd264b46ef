//! # Core Domain Entities
//!
//! ## Clusters
//!
//! - **Vocabulary**: `AdminRole`, `ContractStatus`, `ValidationStatus`, `AuditAction`
//! - **Contract**: `Contract`, `ValidationStep`, `AuditEntry`

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::errors::ParseEnumError;

/// Identifier of a contract, assigned at creation.
pub type ContractId = Uuid;

// =============================================================================
// CLUSTER A: VOCABULARY
// =============================================================================

/// Administrative role of an actor in the approval workflow.
///
/// The first six roles approve one workflow step each, in declaration order.
/// The last three are external auditors: they cannot approve anything and may
/// only attach observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdminRole {
    ProjectDeveloper,
    TechnicalCommission,
    LegalCommission,
    ContractsChief,
    AdminChief,
    BudgetAuthority,
    Comptroller,
    Prosecutor,
    Citizen,
}

impl AdminRole {
    /// Every role, approval roles first.
    pub const ALL: [AdminRole; 9] = [
        AdminRole::ProjectDeveloper,
        AdminRole::TechnicalCommission,
        AdminRole::LegalCommission,
        AdminRole::ContractsChief,
        AdminRole::AdminChief,
        AdminRole::BudgetAuthority,
        AdminRole::Comptroller,
        AdminRole::Prosecutor,
        AdminRole::Citizen,
    ];

    /// Wire name of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            AdminRole::ProjectDeveloper => "PROJECT_DEVELOPER",
            AdminRole::TechnicalCommission => "TECHNICAL_COMMISSION",
            AdminRole::LegalCommission => "LEGAL_COMMISSION",
            AdminRole::ContractsChief => "CONTRACTS_CHIEF",
            AdminRole::AdminChief => "ADMIN_CHIEF",
            AdminRole::BudgetAuthority => "BUDGET_AUTHORITY",
            AdminRole::Comptroller => "COMPTROLLER",
            AdminRole::Prosecutor => "PROSECUTOR",
            AdminRole::Citizen => "CITIZEN",
        }
    }

    /// Roles allowed to attach audit observations (and nothing else).
    pub fn is_external_auditor(&self) -> bool {
        matches!(
            self,
            AdminRole::Comptroller | AdminRole::Prosecutor | AdminRole::Citizen
        )
    }

    /// Roles that own one approval step.
    pub fn is_approval_role(&self) -> bool {
        !self.is_external_auditor()
    }
}

impl fmt::Display for AdminRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdminRole {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        AdminRole::ALL
            .into_iter()
            .find(|role| role.as_str() == wanted)
            .ok_or_else(|| ParseEnumError::new("role", s))
    }
}

/// Lifecycle status of a contract.
///
/// `Draft` is initial. `AuthorizedForPublication` and `Rejected` are terminal;
/// `Rejected` is reachable from every non-terminal status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContractStatus {
    Draft,
    TechnicalReview,
    LegalReview,
    ContractsReview,
    AdminReview,
    BudgetReview,
    AuthorizedForPublication,
    Rejected,
}

impl ContractStatus {
    pub const ALL: [ContractStatus; 8] = [
        ContractStatus::Draft,
        ContractStatus::TechnicalReview,
        ContractStatus::LegalReview,
        ContractStatus::ContractsReview,
        ContractStatus::AdminReview,
        ContractStatus::BudgetReview,
        ContractStatus::AuthorizedForPublication,
        ContractStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContractStatus::Draft => "DRAFT",
            ContractStatus::TechnicalReview => "TECHNICAL_REVIEW",
            ContractStatus::LegalReview => "LEGAL_REVIEW",
            ContractStatus::ContractsReview => "CONTRACTS_REVIEW",
            ContractStatus::AdminReview => "ADMIN_REVIEW",
            ContractStatus::BudgetReview => "BUDGET_REVIEW",
            ContractStatus::AuthorizedForPublication => "AUTHORIZED_FOR_PUBLICATION",
            ContractStatus::Rejected => "REJECTED",
        }
    }

    /// No further validation is accepted in a terminal status.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ContractStatus::AuthorizedForPublication | ContractStatus::Rejected
        )
    }
}

impl fmt::Display for ContractStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContractStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        ContractStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == wanted)
            .ok_or_else(|| ParseEnumError::new("contract status", s))
    }
}

/// Outcome of a single workflow step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

/// What an audit trail entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    WorkflowInitialized,
    StepApproved,
    StepRejected,
    WorkflowCompleted,
    AuditObservation,
}

// =============================================================================
// CLUSTER B: CONTRACT
// =============================================================================

/// One slot of a contract's approval workflow.
///
/// Created `Pending` at workflow initialization and mutated exactly once,
/// by the validation of its step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationStep {
    /// 1-based position in the workflow.
    pub step_number: u32,
    /// The only role allowed to validate this step.
    pub role: AdminRole,
    pub status: ValidationStatus,
    pub required: bool,
    /// Empty until validated.
    pub validator_id: String,
    /// Empty until validated.
    pub validator_name: String,
    pub comments: String,
    /// Unset until validated.
    pub timestamp: Option<DateTime<Utc>>,
}

/// An append-only record of something that happened to a contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: Uuid,
    pub action: AuditAction,
    pub user_id: String,
    pub user_role: AdminRole,
    pub timestamp: DateTime<Utc>,
    pub description: String,
}

/// A procurement contract going through administrative approval.
///
/// Contracts are never deleted, only status-transitioned. `validation_steps`
/// always holds the full workflow template and `audit_trail` only grows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contract {
    pub id: ContractId,
    /// Code of the public entity that owns the contract.
    pub entity_code: String,
    pub entity_name: String,
    /// Procurement modality (e.g. `OBRA_PUBLICA`, `SUMINISTRO`).
    pub contract_type: String,
    pub description: String,
    /// Strictly positive.
    pub amount: Decimal,
    pub status: ContractStatus,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// 1-based index of the step awaiting validation.
    pub current_step: u32,
    pub validation_steps: Vec<ValidationStep>,
    pub audit_trail: Vec<AuditEntry>,
}

impl Contract {
    /// The step with the given 1-based number, if it exists.
    pub fn step(&self, step_number: u32) -> Option<&ValidationStep> {
        self.validation_steps
            .iter()
            .find(|step| step.step_number == step_number)
    }

    /// Number of steps already approved.
    pub fn completed_steps(&self) -> usize {
        self.validation_steps
            .iter()
            .filter(|step| step.status == ValidationStatus::Approved)
            .count()
    }
}
