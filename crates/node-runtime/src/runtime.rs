//! # Node Runtime
//!
//! Lifecycle of a running node: seed, start the background tasks, serve the
//! API gateway, then stop everything in order once the shutdown future
//! completes.

use ledger_telemetry::{log_event, CHAIN_HEIGHT};
use pl_03_peer_sync::{PeerTransport, SyncApi};
use pl_04_api_gateway::metrics::record_peers;
use pl_04_api_gateway::ApiGatewayService;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::container::{NodeContainer, NodeError};
use crate::genesis::seed_example_contracts;
use crate::handlers::{run_health_loop, run_sync_loop};

pub struct NodeRuntime<T: PeerTransport> {
    container: NodeContainer<T>,
}

impl<T: PeerTransport> NodeRuntime<T> {
    pub fn new(container: NodeContainer<T>) -> Self {
        Self { container }
    }

    pub fn container(&self) -> &NodeContainer<T> {
        &self.container
    }

    /// Seed the example contracts when configured and publish the initial
    /// gauges. Seeding only happens on an empty ledger.
    pub fn prepare(&self) -> Result<(), NodeError> {
        let config = &self.container.config;
        let fresh = self.container.ledger.read().chain().len() == 1;
        if config.seed_examples && fresh {
            match seed_example_contracts(self.container.workflow.as_ref()) {
                Ok(created) => info!(count = created.len(), "Example contracts seeded"),
                // the node stays usable without the examples
                Err(error) => warn!(%error, "Failed to seed example contracts"),
            }
        }

        CHAIN_HEIGHT.set(self.container.ledger.read().chain().len() as f64);
        record_peers(&self.container.peers);
        Ok(())
    }

    /// Spawn the periodic sync and health-check tasks.
    pub fn start_background_tasks(&self, shutdown: watch::Receiver<bool>) -> Vec<JoinHandle<()>> {
        let schedule = &self.container.config.sync;
        let sync: Arc<dyn SyncApi> = self.container.sync.clone();
        let peers = Arc::clone(&self.container.peers);

        info!(
            sync_interval = ?schedule.sync_interval,
            health_check_interval = ?schedule.health_check_interval,
            "Starting background tasks"
        );
        vec![
            tokio::spawn(run_sync_loop(
                Arc::clone(&sync),
                Arc::clone(&peers),
                schedule.sync_interval,
                shutdown.clone(),
            )),
            tokio::spawn(run_health_loop(
                sync,
                peers,
                schedule.health_check_interval,
                shutdown,
            )),
        ]
    }

    /// Bind the configured port and run until `shutdown` completes.
    pub async fn run(
        self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(), NodeError> {
        let gateway = ApiGatewayService::new(
            self.container.config.gateway_config(),
            self.container.app_state(),
        )?;
        let listener = gateway.bind().await?;
        self.serve_on(gateway, listener, shutdown).await
    }

    /// Run on an already bound listener.
    pub async fn serve_on(
        self,
        gateway: ApiGatewayService,
        listener: TcpListener,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(), NodeError> {
        self.prepare()?;

        let (stop_tx, stop_rx) = watch::channel(false);
        let tasks = self.start_background_tasks(stop_rx);

        log_event!(
            info,
            "node-runtime",
            "Node ready",
            node_id = %self.container.config.node.id,
            peers = self.container.peers.len()
        );
        let served = gateway.serve(listener, shutdown).await;

        let _ = stop_tx.send(true);
        for task in tasks {
            if let Err(error) = task.await {
                warn!(%error, "Background task ended abnormally");
            }
        }
        log_event!(info, "node-runtime", "Node stopped");

        served.map_err(NodeError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::NodeConfig;
    use pl_03_peer_sync::test_utils::{InMemoryNetwork, InMemoryTransport};
    use pl_04_api_gateway::GatewayConfig;
    use std::time::Duration;
    use tokio::sync::oneshot;

    fn runtime(seed_examples: bool) -> NodeRuntime<InMemoryTransport> {
        let config = NodeConfig {
            seed_examples,
            ..NodeConfig::default()
        };
        let transport = Arc::new(InMemoryTransport::new(InMemoryNetwork::new()));
        NodeRuntime::new(NodeContainer::new(config, transport).unwrap())
    }

    #[test]
    fn test_prepare_seeds_designated_node_once() {
        let runtime = runtime(true);
        runtime.prepare().unwrap();
        runtime.prepare().unwrap();
        let ledger = runtime.container().ledger.read();
        assert_eq!(ledger.contracts().len(), 2);
        assert_eq!(ledger.chain().len(), 3);
    }

    #[test]
    fn test_prepare_without_seeding_leaves_genesis_only() {
        let runtime = runtime(false);
        runtime.prepare().unwrap();
        assert_eq!(runtime.container().ledger.read().chain().len(), 1);
    }

    #[tokio::test]
    async fn test_serve_stops_on_shutdown() {
        let runtime = runtime(false);
        let gateway = ApiGatewayService::new(
            GatewayConfig::default(),
            runtime.container().app_state(),
        )
        .unwrap();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (tx, rx) = oneshot::channel::<()>();
        let node = tokio::spawn(runtime.serve_on(gateway, listener, async move {
            let _ = rx.await;
        }));

        let response = reqwest::get(format!("http://{addr}/api/health")).await.unwrap();
        assert_eq!(response.status(), 200);
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["node_id"], "DNP-NODE");

        tx.send(()).unwrap();
        tokio::time::timeout(Duration::from_secs(5), node)
            .await
            .unwrap()
            .unwrap()
            .unwrap();
    }
}
