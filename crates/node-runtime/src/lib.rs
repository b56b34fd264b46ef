//! # Node Runtime Library
//!
//! This library exposes the internal modules of the node runtime for testing.
//! The main entry point is the `main.rs` binary.
//!
//! ## Modular Structure
//!
//! - `container/` - Configuration and dependency wiring
//! - `genesis/` - Example contracts seeded on a fresh ledger
//! - `handlers/` - Periodic sync and health-check tasks
//! - `runtime` - Lifecycle: start tasks, serve, shut down

pub mod container;
pub mod genesis;
pub mod handlers;
pub mod runtime;

pub use container::{ConfigError, NodeConfig, NodeContainer, NodeError};
pub use runtime::NodeRuntime;
