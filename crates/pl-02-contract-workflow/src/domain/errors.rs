//! # Domain Errors
//!
//! Input validation, workflow sequencing and lookup failures. Every variant
//! is returned before any state is touched.

use pl_01_chain_integrity::ChainError;
use shared_types::{AdminRole, ContractId, ContractStatus};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    /// A request field is missing or out of range.
    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("contract not found: {0}")]
    ContractNotFound(ContractId),

    /// A creation event for an id that is already indexed.
    #[error("contract already exists: {0}")]
    DuplicateContract(ContractId),

    /// The contract is `Rejected` or `AuthorizedForPublication`.
    #[error("contract is in terminal status {0}")]
    TerminalState(ContractStatus),

    #[error("step {requested} is not the current step (current step is {current})")]
    StepMismatch { current: u32, requested: u32 },

    #[error("step {step} must be validated by {expected}, not {received}")]
    RoleMismatch {
        step: u32,
        expected: AdminRole,
        received: AdminRole,
    },

    /// Only external-audit roles may attach observations.
    #[error("role {0} is not authorized to add audit observations")]
    UnauthorizedRole(AdminRole),

    #[error(transparent)]
    Chain(#[from] ChainError),
}

impl WorkflowError {
    pub(crate) fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        WorkflowError::Validation {
            field,
            reason: reason.into(),
        }
    }
}
