//! # Shared Types Crate
//!
//! This crate contains the procurement domain entities and the ledger event
//! records that travel inside blocks.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: every type that crosses a crate boundary
//!   (chain, workflow, sync, gateway) is defined here.
//! - **Closed vocabularies**: roles, statuses and audit actions are enums,
//!   never free-form strings.
//! - **Stable wire names**: enums serialize in `SCREAMING_SNAKE_CASE`, struct
//!   fields in `snake_case`, amounts as decimal strings and instants as
//!   RFC 3339 UTC. Block hashes are computed over this encoding, so changing
//!   a name here is a protocol break.

pub mod entities;
pub mod errors;
pub mod events;

pub use entities::*;
pub use errors::*;
pub use events::*;
