//! # Domain Layer
//!
//! Pure workflow logic over `shared_types::Contract`.
//!
//! ## Modules
//!
//! - `template` - The six-step approval sequence
//! - `state_machine` - Guards and transitions (plan / apply)
//! - `registry` - Contract index folded from the chain
//! - `status` - Progress snapshot
//! - `value_objects` - Requests and list filters
//! - `errors` - Domain error types

pub mod errors;
pub mod registry;
pub mod state_machine;
pub mod status;
pub mod template;
pub mod value_objects;
