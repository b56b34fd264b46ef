//! # Peer Sync (pl-03)
//!
//! Replication between ledger nodes: peer bookkeeping, block broadcast,
//! longest-valid-chain reconciliation and liveness probing.
//!
//! ## Architecture
//!
//! ```text
//!                 ┌──────────── SyncService ────────────┐
//!  new block ────→│ broadcast_block ──one task per peer──┼──→ PeerTransport ──→ peers
//!  peer push ────→│ receive_block  ──verify, dedupe──→ LedgerState.accept_block
//!  every 30 s ───→│ sync_with_peers ──fetch (no lock)──→ validate ──→ adopt if longer
//!  every 60 s ───→│ health_check   ──probe all (join)──→ PeerRegistry liveness
//!                 └──────────────────────────────────────┘
//! ```
//!
//! ## Protocol Rules
//!
//! | ID | Rule | Description |
//! |----|------|-------------|
//! | 1 | Longest valid chain | Adopt a peer chain only if strictly longer and valid from its genesis |
//! | 2 | Deduplication | A block already on the chain is a no-op success |
//! | 3 | Failure isolation | A failing peer is marked inactive; others are unaffected |
//! | 4 | Bounded calls | Every peer call is bounded by `SyncConfig::peer_timeout` |
//! | 5 | No lock across I/O | Ledger and peer locks are released before any network call |
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Peers, reports, errors
//! - `ports/` - `SyncApi` (inbound), `PeerTransport` (outbound)
//! - `service/` - `SyncService`
//! - `adapters/` - `HttpPeerTransport` (feature `http`)
//! - `test_utils` - In-memory network of nodes (feature `test-utils`)

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

#[cfg(feature = "http")]
pub use adapters::HttpPeerTransport;
pub use domain::{
    ChainSnapshot, HealthReport, Peer, PeerRegistry, PeerSyncOutcome, PeerSyncResult,
    ReceiveOutcome, SyncConfig, SyncError, SyncReport, TransportError,
};
pub use ports::inbound::SyncApi;
pub use ports::outbound::PeerTransport;
pub use service::SyncService;
