//! Periodic sync and health-check loops.

use ledger_telemetry::metrics::HistogramTimer;
use ledger_telemetry::SYNC_DURATION;
use pl_03_peer_sync::{PeerRegistry, SyncApi};
use pl_04_api_gateway::metrics::{record_health, record_peers, record_sync};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Pull peer chains every `period` until shutdown.
pub async fn run_sync_loop(
    sync: Arc<dyn SyncApi>,
    peers: Arc<PeerRegistry>,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // the first tick completes immediately
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                debug!("Periodic sync started");
                let result = {
                    let _timer = HistogramTimer::new(&SYNC_DURATION);
                    sync.sync_with_peers().await
                };
                record_sync(&result);
                record_peers(&peers);
                match result {
                    Ok(report) if report.adopted_from.is_some() => info!(
                        adopted_from = ?report.adopted_from,
                        chain_length = report.chain_length,
                        "Periodic sync adopted a longer chain"
                    ),
                    Ok(report) => debug!(
                        peers = report.peers_contacted,
                        chain_length = report.chain_length,
                        "Periodic sync finished"
                    ),
                    Err(error) => warn!(%error, "Periodic sync failed"),
                }
            }
            _ = shutdown.changed() => {
                info!("Sync task received shutdown signal");
                break;
            }
        }
    }
}

/// Probe every known peer every `period` until shutdown.
pub async fn run_health_loop(
    sync: Arc<dyn SyncApi>,
    peers: Arc<PeerRegistry>,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let report = sync.health_check().await;
                record_health(&report);
                record_peers(&peers);
                if report.unreachable.is_empty() {
                    debug!(alive = report.alive.len(), "Health check finished");
                } else {
                    warn!(
                        alive = report.alive.len(),
                        unreachable = ?report.unreachable,
                        "Health check found unreachable peers"
                    );
                }
            }
            _ = shutdown.changed() => {
                info!("Health check task received shutdown signal");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pl_02_contract_workflow::{NewContract, WorkflowApi};
    use pl_03_peer_sync::test_utils::{InMemoryNetwork, TestNode};
    use rust_decimal::Decimal;

    fn request() -> NewContract {
        NewContract {
            entity_code: "08001".to_string(),
            entity_name: "Alcaldía de Medellín".to_string(),
            contract_type: "OBRA_PUBLICA".to_string(),
            description: "Puente peatonal".to_string(),
            amount: Decimal::new(2_500_000_000, 0),
            created_by: "dev-001".to_string(),
        }
    }

    async fn eventually(mut done: impl FnMut() -> bool) {
        for _ in 0..200 {
            if done() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("condition not reached");
    }

    #[tokio::test]
    async fn test_sync_loop_catches_up_and_stops_on_shutdown() {
        let network = InMemoryNetwork::new();
        let a = TestNode::spawn(&network, "NODE-A", 8080);
        let b = TestNode::spawn(&network, "NODE-B", 8081);
        b.connect(&a);
        a.workflow.create_contract(request()).unwrap();

        let (tx, rx) = watch::channel(false);
        let task = tokio::spawn(run_sync_loop(
            b.sync.clone(),
            b.sync.peers().clone(),
            Duration::from_millis(20),
            rx,
        ));

        eventually(|| b.chain_len() == 2).await;
        assert_eq!(b.tip_hash(), a.tip_hash());

        tx.send(true).unwrap();
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_sync_loop_survives_unreachable_peers() {
        let network = InMemoryNetwork::new();
        let a = TestNode::spawn(&network, "NODE-A", 8080);
        let b = TestNode::spawn(&network, "NODE-B", 8081);
        b.connect(&a);
        network.set_reachable(&a.endpoint(), false);

        let (tx, rx) = watch::channel(false);
        let task = tokio::spawn(run_sync_loop(
            b.sync.clone(),
            b.sync.peers().clone(),
            Duration::from_millis(20),
            rx,
        ));
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(!task.is_finished());
        assert!(b.sync.active_peers().is_empty());

        tx.send(true).unwrap();
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_health_loop_revives_peer() {
        let network = InMemoryNetwork::new();
        let a = TestNode::spawn(&network, "NODE-A", 8080);
        let b = TestNode::spawn(&network, "NODE-B", 8081);
        b.connect(&a);
        b.sync.peers().mark_inactive("NODE-A");

        let (tx, rx) = watch::channel(false);
        let task = tokio::spawn(run_health_loop(
            b.sync.clone(),
            b.sync.peers().clone(),
            Duration::from_millis(20),
            rx,
        ));

        eventually(|| b.sync.active_peers().len() == 1).await;
        tx.send(true).unwrap();
        task.await.unwrap();
    }
}
