//! Metric recording shared by the request handlers and the node's
//! background tasks.

use ledger_telemetry::{
    metric_inc, BLOCKS_APPENDED, BLOCKS_RECEIVED, CHAIN_HEIGHT, CHAIN_REPLACEMENTS, HEALTH_PROBES,
    PEERS_ACTIVE, PEERS_KNOWN, PEER_DELIVERY_FAILURES, SYNC_CYCLES, WORKFLOW_TRANSITIONS,
};
use pl_01_chain_integrity::Block;
use pl_03_peer_sync::{
    HealthReport, PeerRegistry, ReceiveOutcome, SyncApi, SyncError, SyncReport, TransportError,
};
use shared_types::AuditAction;
use tokio::task::JoinHandle;

/// A block appended locally by a workflow operation.
pub fn record_local_block(action: AuditAction, block: &Block) {
    metric_inc!(BLOCKS_APPENDED);
    metric_inc!(WORKFLOW_TRANSITIONS, &[action_label(action)]);
    CHAIN_HEIGHT.set((block.index + 1) as f64);
}

/// A block pushed by a peer, whatever became of it.
pub fn record_received(result: &Result<ReceiveOutcome, SyncError>, block_index: u64) {
    let outcome = match result {
        Ok(outcome) => outcome.as_str(),
        Err(_) => "rejected",
    };
    metric_inc!(BLOCKS_RECEIVED, &[outcome]);
    if let Ok(ReceiveOutcome::Appended) = result {
        CHAIN_HEIGHT.set((block_index + 1) as f64);
    }
}

pub fn record_sync(result: &Result<SyncReport, SyncError>) {
    let label = match result {
        Ok(report) if report.adopted_from.is_some() => {
            metric_inc!(CHAIN_REPLACEMENTS);
            CHAIN_HEIGHT.set(report.chain_length as f64);
            "adopted"
        }
        Ok(report) => {
            CHAIN_HEIGHT.set(report.chain_length as f64);
            "unchanged"
        }
        Err(_) => "unreachable",
    };
    metric_inc!(SYNC_CYCLES, &[label]);
}

pub fn record_health(report: &HealthReport) {
    HEALTH_PROBES
        .with_label_values(&["alive"])
        .inc_by(report.alive.len() as f64);
    HEALTH_PROBES
        .with_label_values(&["unreachable"])
        .inc_by(report.unreachable.len() as f64);
}

pub fn record_peers(peers: &PeerRegistry) {
    PEERS_KNOWN.set(peers.len() as f64);
    PEERS_ACTIVE.set(peers.active_count() as f64);
}

/// Broadcast `block` and count failed deliveries in the background.
pub fn broadcast_and_count(sync: &dyn SyncApi, block: Block) {
    let handles = sync.broadcast_block(block);
    if handles.is_empty() {
        return;
    }
    tokio::spawn(count_failures(handles));
}

async fn count_failures(handles: Vec<JoinHandle<Result<(), TransportError>>>) {
    for handle in handles {
        if let Ok(Err(_)) = handle.await {
            metric_inc!(PEER_DELIVERY_FAILURES);
        }
    }
}

fn action_label(action: AuditAction) -> &'static str {
    match action {
        AuditAction::WorkflowInitialized => "workflow_initialized",
        AuditAction::StepApproved => "step_approved",
        AuditAction::StepRejected => "step_rejected",
        AuditAction::WorkflowCompleted => "workflow_completed",
        AuditAction::AuditObservation => "audit_observation",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_sync_counts_by_result() {
        let before = SYNC_CYCLES.with_label_values(&["unchanged"]).get();
        record_sync(&Ok(SyncReport {
            chain_length: 3,
            ..SyncReport::default()
        }));
        assert_eq!(
            SYNC_CYCLES.with_label_values(&["unchanged"]).get(),
            before + 1.0
        );
    }

    #[test]
    fn test_record_local_block_counts_append_and_transition() {
        let block = Block::genesis().unwrap();
        let appended = BLOCKS_APPENDED.get();
        let rejected = WORKFLOW_TRANSITIONS
            .with_label_values(&["step_rejected"])
            .get();
        record_local_block(AuditAction::StepRejected, &block);
        assert!(BLOCKS_APPENDED.get() >= appended + 1.0);
        assert!(
            WORKFLOW_TRANSITIONS
                .with_label_values(&["step_rejected"])
                .get()
                >= rejected + 1.0
        );
    }

    #[test]
    fn test_record_received_labels_rejections() {
        let before = BLOCKS_RECEIVED.with_label_values(&["rejected"]).get();
        let error = SyncError::Unreachable {
            failures: 1,
            last_error: TransportError::Setup("x".to_string()),
        };
        record_received(&Err(error), 4);
        assert_eq!(
            BLOCKS_RECEIVED.with_label_values(&["rejected"]).get(),
            before + 1.0
        );
    }
}
