//! # Ledger Event Records
//!
//! The `data` object of each block type. Every state-changing record carries
//! everything needed to replay its effect on the contract index, including the
//! audit entries the transition produced, so that replaying a chain from
//! genesis reproduces the live contract state exactly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{AdminRole, AuditEntry, Contract, ContractId};

/// Payload of the genesis block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisRecord {
    pub message: String,
}

/// A contract entered the ledger with its workflow initialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractCreationRecord {
    pub contract: Contract,
}

/// A workflow step was approved or rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationRecord {
    pub contract_id: ContractId,
    pub step: u32,
    pub validator_id: String,
    pub validator_name: String,
    pub role: AdminRole,
    pub approved: bool,
    pub comments: String,
    pub timestamp: DateTime<Utc>,
    /// `STEP_APPROVED` or `STEP_REJECTED`, followed by `WORKFLOW_COMPLETED`
    /// when the final step was approved.
    pub audit_entries: Vec<AuditEntry>,
}

/// An external auditor attached an observation to a contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditObservationRecord {
    pub contract_id: ContractId,
    pub auditor: String,
    pub role: AdminRole,
    pub observation: String,
    pub timestamp: DateTime<Utc>,
    pub audit_entry: AuditEntry,
}
