//! # Peers
//!
//! Known remote nodes and their liveness. The registry has its own lock,
//! independent of the ledger lock, and is never held across network I/O.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Peer {
    pub id: String,
    pub address: String,
    pub port: u16,
    pub last_seen: DateTime<Utc>,
    pub active: bool,
}

impl Peer {
    /// `address:port`.
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.endpoint())
    }
}

#[derive(Debug, Default)]
pub struct PeerRegistry {
    peers: RwLock<HashMap<String, Peer>>,
}

impl PeerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a peer, marking it active and seen now.
    pub fn add_peer(&self, id: &str, address: &str, port: u16) -> Peer {
        let peer = Peer {
            id: id.to_string(),
            address: address.to_string(),
            port,
            last_seen: Utc::now(),
            active: true,
        };
        self.peers.write().insert(peer.id.clone(), peer.clone());
        peer
    }

    pub fn get(&self, id: &str) -> Option<Peer> {
        self.peers.read().get(id).cloned()
    }

    /// Active peers, ordered by id.
    pub fn active_peers(&self) -> Vec<Peer> {
        self.sorted(|peer| peer.active)
    }

    /// Every known peer, ordered by id.
    pub fn all_peers(&self) -> Vec<Peer> {
        self.sorted(|_| true)
    }

    pub fn mark_inactive(&self, id: &str) {
        if let Some(peer) = self.peers.write().get_mut(id) {
            peer.active = false;
        }
    }

    /// Mark a peer active and refresh `last_seen`.
    pub fn mark_alive(&self, id: &str) {
        if let Some(peer) = self.peers.write().get_mut(id) {
            peer.active = true;
            peer.last_seen = Utc::now();
        }
    }

    pub fn len(&self) -> usize {
        self.peers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.read().is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.peers.read().values().filter(|p| p.active).count()
    }

    fn sorted(&self, keep: impl Fn(&Peer) -> bool) -> Vec<Peer> {
        let mut peers: Vec<Peer> = self
            .peers
            .read()
            .values()
            .filter(|peer| keep(peer))
            .cloned()
            .collect();
        peers.sort_by(|a, b| a.id.cmp(&b.id));
        peers
    }
}
