//! # Background Tasks
//!
//! Periodic peer maintenance. Both loops survive every error and stop only
//! on the shutdown signal.

pub mod periodic;

pub use periodic::{run_health_loop, run_sync_loop};
