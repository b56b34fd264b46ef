//! # Ports
//!
//! - `inbound` - API offered to the gateway and the node runtime
//! - `outbound` - Transport to remote nodes

pub mod inbound;
pub mod outbound;
