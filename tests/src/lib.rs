//! # Procurement Ledger Test Suite
//!
//! Cross-subsystem tests that need more than one node.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── replication.rs   # In-memory multi-node workflow replication
//!     └── http_cluster.rs  # Real nodes talking HTTP on localhost
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p pl-tests
//! cargo test -p pl-tests integration::replication::
//! ```

pub mod integration;
