//! # Adapters
//!
//! - `http` - `PeerTransport` over the peers' JSON HTTP API (feature `http`)

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "http")]
pub use http::HttpPeerTransport;
