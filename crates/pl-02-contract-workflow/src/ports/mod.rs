//! # Ports
//!
//! - `inbound` - API offered to the gateway and the node runtime

pub mod inbound;
