//! # Domain Layer
//!
//! ## Modules
//!
//! - `peer` - Peer entity and the peer registry
//! - `reports` - Sync settings, outcomes and the chain snapshot
//! - `errors` - Transport and sync errors

pub mod errors;
pub mod peer;
pub mod reports;

pub use errors::{SyncError, TransportError};
pub use peer::{Peer, PeerRegistry};
pub use reports::{
    ChainSnapshot, HealthReport, PeerSyncOutcome, PeerSyncResult, ReceiveOutcome, SyncConfig,
    SyncReport,
};
