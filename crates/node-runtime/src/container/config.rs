//! # Node Configuration
//!
//! Every runtime parameter, read from the environment with a default for
//! each. Empty variables count as unset.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `NODE_ID` | `DNP-NODE` |
//! | `NODE_ADDRESS` | `localhost` |
//! | `NODE_PORT` | `8080` |
//! | `INITIAL_PEERS` | none (`ID:host:port,ID:host:port`) |
//! | `PEER_TIMEOUT_SECS` | `5` |
//! | `SYNC_INTERVAL_SECS` | `30` |
//! | `HEALTH_CHECK_INTERVAL_SECS` | `60` |
//! | `CORS_ALLOWED_ORIGINS` | `*` |
//! | `SEED_EXAMPLES` | `true` on `DNP-NODE` only |

use pl_03_peer_sync::SyncConfig;
use pl_04_api_gateway::{CorsConfig, GatewayConfig};
use std::env;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Node that seeds the example contracts unless told otherwise.
pub const SEED_NODE_ID: &str = "DNP-NODE";

/// Complete node configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeConfig {
    /// Identity and listening endpoint.
    pub node: NodeIdentity,
    /// Peers and peer-call bounds.
    pub network: NetworkConfig,
    /// Background task periods.
    pub sync: SyncSchedule,
    /// HTTP API configuration.
    pub api: ApiConfig,
    /// Seed the example contracts at startup.
    pub seed_examples: bool,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            node: NodeIdentity::default(),
            network: NetworkConfig::default(),
            sync: SyncSchedule::default(),
            api: ApiConfig::default(),
            seed_examples: true,
        }
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid {key}={value:?}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("malformed peer entry {entry:?}, expected ID:host:port")]
    MalformedPeer { entry: String },

    #[error("{key} must be greater than zero")]
    ZeroDuration { key: &'static str },
}

/// Identity of this node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeIdentity {
    pub id: String,
    /// Address peers use to reach this node.
    pub address: String,
    /// HTTP port.
    pub port: u16,
}

impl Default for NodeIdentity {
    fn default() -> Self {
        Self {
            id: SEED_NODE_ID.to_string(),
            address: "localhost".to_string(),
            port: 8080,
        }
    }
}

/// A peer given at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerSpec {
    pub id: String,
    pub address: String,
    pub port: u16,
}

impl FromStr for PeerSpec {
    type Err = ConfigError;

    /// `ID:host:port`
    fn from_str(entry: &str) -> Result<Self, Self::Err> {
        let malformed = || ConfigError::MalformedPeer {
            entry: entry.to_string(),
        };
        let parts: Vec<&str> = entry.trim().split(':').map(str::trim).collect();
        let [id, address, port] = parts.as_slice() else {
            return Err(malformed());
        };
        if id.is_empty() || address.is_empty() {
            return Err(malformed());
        }
        let port = port.parse().map_err(|_| malformed())?;
        Ok(Self {
            id: id.to_string(),
            address: address.to_string(),
            port,
        })
    }
}

/// Network configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    /// Peers registered at startup.
    pub initial_peers: Vec<PeerSpec>,
    /// Upper bound on every single peer call.
    pub peer_timeout: Duration,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            initial_peers: Vec::new(),
            peer_timeout: SyncConfig::default().peer_timeout,
        }
    }
}

/// Periods of the background tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncSchedule {
    pub sync_interval: Duration,
    pub health_check_interval: Duration,
}

impl Default for SyncSchedule {
    fn default() -> Self {
        Self {
            sync_interval: Duration::from_secs(30),
            health_check_interval: Duration::from_secs(60),
        }
    }
}

/// HTTP API configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub cors_allowed_origins: Vec<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            cors_allowed_origins: CorsConfig::default().allowed_origins,
        }
    }
}

impl NodeConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read the configuration through `lookup`, which returns the value of
    /// a variable if set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let node = NodeIdentity {
            id: get("NODE_ID").unwrap_or(defaults.node.id),
            address: get("NODE_ADDRESS").unwrap_or(defaults.node.address),
            port: parse_or("NODE_PORT", get("NODE_PORT"), defaults.node.port)?,
        };

        let initial_peers = match get("INITIAL_PEERS") {
            Some(list) => list
                .split(',')
                .filter(|entry| !entry.trim().is_empty())
                .map(PeerSpec::from_str)
                .collect::<Result<Vec<_>, ConfigError>>()?,
            None => Vec::new(),
        };
        let network = NetworkConfig {
            initial_peers,
            peer_timeout: secs_or(
                "PEER_TIMEOUT_SECS",
                get("PEER_TIMEOUT_SECS"),
                defaults.network.peer_timeout,
            )?,
        };

        let sync = SyncSchedule {
            sync_interval: secs_or(
                "SYNC_INTERVAL_SECS",
                get("SYNC_INTERVAL_SECS"),
                defaults.sync.sync_interval,
            )?,
            health_check_interval: secs_or(
                "HEALTH_CHECK_INTERVAL_SECS",
                get("HEALTH_CHECK_INTERVAL_SECS"),
                defaults.sync.health_check_interval,
            )?,
        };

        let api = ApiConfig {
            cors_allowed_origins: match get("CORS_ALLOWED_ORIGINS") {
                Some(list) => list
                    .split(',')
                    .map(str::trim)
                    .filter(|o| !o.is_empty())
                    .map(String::from)
                    .collect(),
                None => defaults.api.cors_allowed_origins,
            },
        };

        let seed_examples = match get("SEED_EXAMPLES") {
            Some(value) => parse_bool("SEED_EXAMPLES", &value)?,
            None => node.id == SEED_NODE_ID,
        };

        Ok(Self {
            node,
            network,
            sync,
            api,
            seed_examples,
        })
    }

    /// Reject settings the node cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let durations = [
            ("PEER_TIMEOUT_SECS", self.network.peer_timeout),
            ("SYNC_INTERVAL_SECS", self.sync.sync_interval),
            ("HEALTH_CHECK_INTERVAL_SECS", self.sync.health_check_interval),
        ];
        for (key, duration) in durations {
            if duration.is_zero() {
                return Err(ConfigError::ZeroDuration { key });
            }
        }
        if self.node.id.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "NODE_ID",
                value: self.node.id.clone(),
                reason: "must not be empty".to_string(),
            });
        }
        if self.api.cors_allowed_origins.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "CORS_ALLOWED_ORIGINS",
                value: String::new(),
                reason: "at least one origin is required".to_string(),
            });
        }
        Ok(())
    }

    pub fn sync_config(&self) -> SyncConfig {
        SyncConfig {
            peer_timeout: self.network.peer_timeout,
        }
    }

    pub fn gateway_config(&self) -> GatewayConfig {
        let mut gateway = GatewayConfig::on_port(self.node.port);
        gateway.cors.allowed_origins = self.api.cors_allowed_origins.clone();
        gateway
    }
}

fn parse_or<T: FromStr>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match raw {
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key,
            reason: e.to_string(),
            value,
        }),
        None => Ok(default),
    }
}

fn secs_or(key: &'static str, raw: Option<String>, default: Duration) -> Result<Duration, ConfigError> {
    parse_or(key, raw, default.as_secs()).map(Duration::from_secs)
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: value.to_string(),
            reason: "expected true or false".to_string(),
        }),
    }
}
