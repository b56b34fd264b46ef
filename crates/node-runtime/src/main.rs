//! # Procurement Ledger Node
//!
//! The main entry point for a procurement ledger node.
//!
//! ## Startup Sequence
//!
//! 1. Initialize telemetry (logs, metrics)
//! 2. Load and validate configuration from the environment
//! 3. Create the ledger from the genesis block, register initial peers
//! 4. Seed the example contracts (designated node only)
//! 5. Start the periodic sync and health-check tasks
//! 6. Serve the API gateway until Ctrl-C

use anyhow::{Context, Result};
use ledger_telemetry::{init_telemetry, TelemetryConfig};
use tracing::{info, warn};

use node_runtime::{NodeConfig, NodeContainer, NodeRuntime};

#[tokio::main]
async fn main() -> Result<()> {
    let _telemetry = init_telemetry(TelemetryConfig::from_env())
        .context("Failed to initialize telemetry")?;

    let config = NodeConfig::from_env().context("Invalid node configuration")?;
    config.validate().context("Invalid node configuration")?;

    info!(
        node_id = %config.node.id,
        address = %config.node.address,
        port = config.node.port,
        "Starting procurement ledger node"
    );

    let container = NodeContainer::with_http(config).context("Failed to wire node")?;
    let runtime = NodeRuntime::new(container);

    runtime
        .run(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "Failed to listen for Ctrl-C, running until killed");
                std::future::pending::<()>().await;
            }
            info!("Shutdown signal received");
        })
        .await
        .context("Node stopped with an error")?;

    Ok(())
}
