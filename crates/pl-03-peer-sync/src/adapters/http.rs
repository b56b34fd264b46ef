//! # HTTP Peer Transport
//!
//! Talks to other nodes through their gateway:
//!
//! | Call | Request |
//! |------|---------|
//! | `send_block` | `POST /api/p2p/receive-block` with the block as JSON |
//! | `fetch_chain` | `GET /api/p2p/get-chain` |
//! | `probe` | `GET /api/health` |

use async_trait::async_trait;
use pl_01_chain_integrity::Block;
use std::time::Duration;

use crate::domain::{ChainSnapshot, Peer, TransportError};
use crate::ports::outbound::PeerTransport;

pub const RECEIVE_BLOCK_PATH: &str = "/api/p2p/receive-block";
pub const GET_CHAIN_PATH: &str = "/api/p2p/get-chain";
pub const HEALTH_PATH: &str = "/api/health";

#[derive(Debug, Clone)]
pub struct HttpPeerTransport {
    client: reqwest::Client,
}

impl HttpPeerTransport {
    /// A transport whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(|e| TransportError::Setup(e.to_string()))?;
        Ok(Self { client })
    }

    fn url(peer: &Peer, path: &str) -> String {
        format!("{}{}", peer.base_url(), path)
    }

    fn check_status(peer: &Peer, response: &reqwest::Response) -> Result<(), TransportError> {
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Rejected {
                peer: peer.id.clone(),
                status: status.as_u16(),
            });
        }
        Ok(())
    }
}

fn map_error(peer: &Peer, error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout {
            peer: peer.id.clone(),
        }
    } else if error.is_decode() {
        TransportError::Decode {
            peer: peer.id.clone(),
            reason: error.to_string(),
        }
    } else {
        TransportError::Connection {
            peer: peer.id.clone(),
            reason: error.to_string(),
        }
    }
}

#[async_trait]
impl PeerTransport for HttpPeerTransport {
    async fn send_block(&self, peer: &Peer, block: &Block) -> Result<(), TransportError> {
        let response = self
            .client
            .post(Self::url(peer, RECEIVE_BLOCK_PATH))
            .json(block)
            .send()
            .await
            .map_err(|e| map_error(peer, e))?;
        Self::check_status(peer, &response)
    }

    async fn fetch_chain(&self, peer: &Peer) -> Result<ChainSnapshot, TransportError> {
        let response = self
            .client
            .get(Self::url(peer, GET_CHAIN_PATH))
            .send()
            .await
            .map_err(|e| map_error(peer, e))?;
        Self::check_status(peer, &response)?;
        response
            .json::<ChainSnapshot>()
            .await
            .map_err(|e| TransportError::Decode {
                peer: peer.id.clone(),
                reason: e.to_string(),
            })
    }

    async fn probe(&self, peer: &Peer) -> Result<(), TransportError> {
        let response = self
            .client
            .get(Self::url(peer, HEALTH_PATH))
            .send()
            .await
            .map_err(|e| map_error(peer, e))?;
        Self::check_status(peer, &response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn peer(port: u16) -> Peer {
        Peer {
            id: "NODE-X".to_string(),
            address: "127.0.0.1".to_string(),
            port,
            last_seen: Utc::now(),
            active: true,
        }
    }

    #[test]
    fn test_urls() {
        assert_eq!(
            HttpPeerTransport::url(&peer(8081), RECEIVE_BLOCK_PATH),
            "http://127.0.0.1:8081/api/p2p/receive-block"
        );
    }

    #[tokio::test]
    async fn test_unreachable_peer_is_a_transport_error() {
        let transport = HttpPeerTransport::new(Duration::from_millis(500)).unwrap();
        // port 9 (discard) is closed on test machines
        let result = transport.probe(&peer(9)).await;
        assert!(matches!(
            result,
            Err(TransportError::Connection { .. }) | Err(TransportError::Timeout { .. })
        ));
    }
}
