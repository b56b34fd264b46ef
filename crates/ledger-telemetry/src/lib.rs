//! # Ledger Telemetry
//!
//! Logs and metrics for a procurement ledger node.
//!
//! ## Components
//!
//! - **Logs**: `tracing` events rendered by `tracing-subscriber`, either as
//!   human-readable lines or as one JSON object per line for log shippers.
//! - **Metrics**: Prometheus counters and gauges in a crate-global registry,
//!   exposed in text format by the API gateway at `GET /metrics`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ledger_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     let _guard = init_telemetry(TelemetryConfig::from_env()).expect("telemetry");
//!     // Application code here
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `PL_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `PL_JSON_LOGS` | `true` in containers | JSON log lines |
//! | `PL_CONSOLE_OUTPUT` | `true` | Write logs to stdout |
//! | `PL_SERVICE_NAME` | `procurement-ledger` | Service name attached to logs |

mod config;
mod logging;
pub mod metrics;

pub use config::TelemetryConfig;
pub use logging::init_logging;
pub use metrics::{
    encode_metrics, register_metrics, MetricsHandle, BLOCKS_APPENDED, BLOCKS_RECEIVED,
    CHAIN_HEIGHT, CHAIN_REPLACEMENTS, HEALTH_PROBES, PEERS_ACTIVE, PEERS_KNOWN,
    PEER_DELIVERY_FAILURES, SYNC_CYCLES, SYNC_DURATION, WORKFLOW_TRANSITIONS,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize log subscriber: {0}")]
    LoggingInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Install the log subscriber and register every metric.
///
/// Returns a guard to be held for the lifetime of the process.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    let metrics = register_metrics()?;
    init_logging(&config)?;

    tracing::info!(
        service = %config.service_name,
        log_level = %config.log_level,
        json_logs = config.json_logs,
        "Telemetry initialized"
    );

    Ok(TelemetryGuard { _metrics: metrics })
}

/// Keeps telemetry active; logs on shutdown.
pub struct TelemetryGuard {
    _metrics: MetricsHandle,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!("Shutting down telemetry");
    }
}

/// Increment a counter, optionally selecting label values first.
#[macro_export]
macro_rules! metric_inc {
    ($metric:expr) => {
        $metric.inc()
    };
    ($metric:expr, $labels:expr) => {
        $metric.with_label_values($labels).inc()
    };
}
