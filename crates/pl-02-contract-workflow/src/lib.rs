//! # Contract Workflow (pl-02)
//!
//! The role-gated approval state machine for procurement contracts, the
//! audit trail it writes and the contract index derived from the chain.
//!
//! ## Architecture
//!
//! ```text
//!  API Gateway ──WorkflowApi──→ WorkflowEngine
//!                                   │ plan (guards) → record
//!                                   ↓
//!                 ┌──────── LedgerState (one RwLock) ────────┐
//!                 │  Chain (pl-01)  ──fold──→  ContractRegistry │
//!                 └──────────────────────────────────────────┘
//!                                   ↑ accept_block / replace_chain
//!                              Peer Sync (pl-03)
//! ```
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Description |
//! |----|-----------|-------------|
//! | 1 | Ordered steps | Only `current_step` can be validated |
//! | 2 | Role gating | Each step is validated by its fixed role only |
//! | 3 | Terminal states | `Rejected` and `AuthorizedForPublication` accept no validation |
//! | 4 | Auditors observe | External auditors add observations, never change status |
//! | 5 | Derived index | The registry always equals the replay of the chain |
//! | 6 | No partial failure | A rejected request changes neither chain nor index |
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Pure domain logic (template, state machine, registry, errors)
//! - `ledger` - Chain plus index under one lock
//! - `ports/` - Inbound API trait
//! - `service/` - `WorkflowEngine` implementing the API

pub mod domain;
pub mod ledger;
pub mod ports;
pub mod service;

pub use domain::errors::WorkflowError;
pub use domain::registry::ContractRegistry;
pub use domain::state_machine::{
    apply_observation, apply_validation, initialize_workflow, plan_observation, plan_validation,
};
pub use domain::status::WorkflowStatus;
pub use domain::template::{
    status_for_step, template_for, workflow_steps, WorkflowStepTemplate, TOTAL_STEPS,
    WORKFLOW_STEPS,
};
pub use domain::value_objects::{AuditObservation, ContractFilter, NewContract, StepDecision};
pub use ledger::{LedgerState, LedgerStats, SharedLedger};
pub use ports::inbound::WorkflowApi;
pub use service::WorkflowEngine;
