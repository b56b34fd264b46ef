//! Prometheus metrics for the ledger node.
//!
//! All metrics follow the naming convention: `pl_<area>_<metric>_<unit>`

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Counter, CounterVec, Encoder, Gauge, Histogram, HistogramOpts, Opts,
    Registry, TextEncoder,
};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // CHAIN METRICS
    // =========================================================================

    /// Blocks appended by local workflow operations
    pub static ref BLOCKS_APPENDED: Counter = Counter::new(
        "pl_chain_blocks_appended_total",
        "Blocks appended by local workflow operations"
    ).expect("metric creation failed");

    /// Blocks received from peers
    pub static ref BLOCKS_RECEIVED: CounterVec = CounterVec::new(
        Opts::new("pl_chain_blocks_received_total", "Blocks received from peers"),
        &["outcome"]  // outcome: appended/duplicate/rejected
    ).expect("metric creation failed");

    /// Local chain replaced by a longer peer chain
    pub static ref CHAIN_REPLACEMENTS: Counter = Counter::new(
        "pl_chain_replacements_total",
        "Times the local chain was replaced by a longer valid peer chain"
    ).expect("metric creation failed");

    /// Current chain length, genesis included
    pub static ref CHAIN_HEIGHT: Gauge = Gauge::new(
        "pl_chain_height",
        "Current chain length including genesis"
    ).expect("metric creation failed");

    // =========================================================================
    // WORKFLOW METRICS
    // =========================================================================

    /// Workflow transitions by audit action
    pub static ref WORKFLOW_TRANSITIONS: CounterVec = CounterVec::new(
        Opts::new("pl_workflow_transitions_total", "Workflow transitions recorded locally"),
        &["action"]  // action: workflow_initialized/step_approved/step_rejected/audit_observation
    ).expect("metric creation failed");

    // =========================================================================
    // PEER METRICS
    // =========================================================================

    /// Known peers
    pub static ref PEERS_KNOWN: Gauge = Gauge::new(
        "pl_peers_known",
        "Number of registered peers"
    ).expect("metric creation failed");

    /// Active peers
    pub static ref PEERS_ACTIVE: Gauge = Gauge::new(
        "pl_peers_active",
        "Number of peers currently marked active"
    ).expect("metric creation failed");

    /// Failed block deliveries
    pub static ref PEER_DELIVERY_FAILURES: Counter = Counter::new(
        "pl_peers_delivery_failures_total",
        "Block deliveries that failed and marked a peer inactive"
    ).expect("metric creation failed");

    /// Health probes by result
    pub static ref HEALTH_PROBES: CounterVec = CounterVec::new(
        Opts::new("pl_peers_health_probes_total", "Peer health probes"),
        &["result"]  // result: alive/unreachable
    ).expect("metric creation failed");

    // =========================================================================
    // SYNC METRICS
    // =========================================================================

    /// Sync rounds by result
    pub static ref SYNC_CYCLES: CounterVec = CounterVec::new(
        Opts::new("pl_sync_cycles_total", "Sync rounds with peers"),
        &["result"]  // result: adopted/unchanged/unreachable
    ).expect("metric creation failed");

    /// Sync round duration
    pub static ref SYNC_DURATION: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "pl_sync_duration_seconds",
            "Time spent in one sync round"
        ).buckets(exponential_buckets(0.001, 2.0, 14).expect("valid buckets"))
    ).expect("metric creation failed");
}

/// Proof that the metrics are registered.
pub struct MetricsHandle {
    _private: (),
}

/// Register all metrics with the global registry.
///
/// Calling it again is harmless: already registered metrics are skipped.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        // Chain
        Box::new(BLOCKS_APPENDED.clone()),
        Box::new(BLOCKS_RECEIVED.clone()),
        Box::new(CHAIN_REPLACEMENTS.clone()),
        Box::new(CHAIN_HEIGHT.clone()),
        // Workflow
        Box::new(WORKFLOW_TRANSITIONS.clone()),
        // Peers
        Box::new(PEERS_KNOWN.clone()),
        Box::new(PEERS_ACTIVE.clone()),
        Box::new(PEER_DELIVERY_FAILURES.clone()),
        Box::new(HEALTH_PROBES.clone()),
        // Sync
        Box::new(SYNC_CYCLES.clone()),
        Box::new(SYNC_DURATION.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }

    Ok(MetricsHandle { _private: () })
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Timer guard for automatic histogram observation.
pub struct HistogramTimer {
    histogram: Histogram,
    start: std::time::Instant,
}

impl HistogramTimer {
    /// Start a new timer for the given histogram.
    pub fn new(histogram: &Histogram) -> Self {
        Self {
            histogram: histogram.clone(),
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        self.histogram.observe(self.start.elapsed().as_secs_f64());
    }
}
