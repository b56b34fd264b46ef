//! Multi-node integration flows.

pub mod http_cluster;
pub mod replication;
