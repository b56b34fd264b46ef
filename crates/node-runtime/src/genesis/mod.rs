//! # Genesis Module
//!
//! The genesis block itself is deterministic and created by the ledger
//! (`Block::genesis`). This module seeds a fresh ledger with the example
//! contracts served by the designated node.

pub mod seed;

pub use seed::{example_contracts, seed_example_contracts};
