//! Prometheus metrics for the custody core.
//!
//! All metrics follow the naming convention: `qc_<component>_<metric>_<unit>`

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Counter, CounterVec, Encoder, Gauge, Histogram, HistogramOpts, Opts,
    Registry, TextEncoder,
};
use std::sync::{Arc, OnceLock};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // CONSORTIUM METRICS
    // =========================================================================

    /// Payloads that passed quorum verification
    pub static ref PAYLOADS_VERIFIED: CounterVec = CounterVec::new(
        Opts::new("qc_consortium_payloads_verified_total", "Payloads that met quorum"),
        &["action"]
    ).expect("metric creation failed");

    /// Rejected proofs by failure reason
    pub static ref PROOF_FAILURES: CounterVec = CounterVec::new(
        Opts::new("qc_consortium_proof_failures_total", "Rejected proofs by reason"),
        &["reason"]  // bad_proof, not_enough_signatures, signature_count_mismatch, schema
    ).expect("metric creation failed");

    /// Current validator-set epoch
    pub static ref VALIDATOR_EPOCH: Gauge = Gauge::new(
        "qc_consortium_validator_epoch",
        "Epoch of the current validator set"
    ).expect("metric creation failed");

    // =========================================================================
    // REPLAY LEDGER METRICS
    // =========================================================================

    /// Payload hashes consumed, by scope owner
    pub static ref PAYLOADS_CONSUMED: CounterVec = CounterVec::new(
        Opts::new("qc_replay_payloads_consumed_total", "Payload hashes consumed"),
        &["module"]
    ).expect("metric creation failed");

    /// Batch items skipped as replays
    pub static ref BATCH_SKIPS: Counter = Counter::new(
        "qc_replay_batch_skips_total",
        "Batch items skipped because they were already consumed"
    ).expect("metric creation failed");

    // =========================================================================
    // BASCULE METRICS
    // =========================================================================

    /// Deposits moved to reported
    pub static ref DEPOSITS_REPORTED: Counter = Counter::new(
        "qc_bascule_deposits_reported_total",
        "Deposits reported to the Bascule"
    ).expect("metric creation failed");

    /// Withdrawals by outcome
    pub static ref WITHDRAWALS: CounterVec = CounterVec::new(
        Opts::new("qc_bascule_withdrawals_total", "Withdrawals by outcome"),
        &["outcome"]  // validated, not_validated, rejected
    ).expect("metric creation failed");

    // =========================================================================
    // DISPATCH METRICS
    // =========================================================================

    /// Mailbox envelope handling time
    pub static ref DISPATCH_DURATION: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "qc_dispatch_duration_seconds",
            "Time spent handling one mailbox envelope"
        ).buckets(exponential_buckets(0.0001, 2.0, 14).expect("static buckets"))
    ).expect("metric creation failed");

    /// Dispatch errors by module and type
    pub static ref DISPATCH_ERRORS: CounterVec = CounterVec::new(
        Opts::new("qc_dispatch_errors_total", "Errors by module and type"),
        &["module", "error_type"]
    ).expect("metric creation failed");
}

static REGISTERED: OnceLock<Result<(), String>> = OnceLock::new();

/// Handle proving the metrics were registered
pub struct MetricsHandle {
    _registry: Arc<Registry>,
}

/// Register all metrics with the global registry. Idempotent.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    REGISTERED
        .get_or_init(register_all)
        .clone()
        .map_err(TelemetryError::MetricsInit)?;
    Ok(MetricsHandle {
        _registry: Arc::new(REGISTRY.clone()),
    })
}

fn register_all() -> Result<(), String> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        // Consortium
        Box::new(PAYLOADS_VERIFIED.clone()),
        Box::new(PROOF_FAILURES.clone()),
        Box::new(VALIDATOR_EPOCH.clone()),
        // Replay
        Box::new(PAYLOADS_CONSUMED.clone()),
        Box::new(BATCH_SKIPS.clone()),
        // Bascule
        Box::new(DEPOSITS_REPORTED.clone()),
        Box::new(WITHDRAWALS.clone()),
        // Dispatch
        Box::new(DISPATCH_DURATION.clone()),
        Box::new(DISPATCH_ERRORS.clone()),
    ];

    for metric in metrics {
        REGISTRY.register(metric).map_err(|e| e.to_string())?;
    }
    Ok(())
}

/// Encode all metrics as Prometheus text format.
pub fn gather_metrics() -> Result<String, TelemetryError> {
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
        let duration = self.start.elapsed().as_secs_f64();
        self.histogram.observe(duration);
    }
}

/// Start timing for a histogram. Observation happens on drop.
#[macro_export]
macro_rules! time_histogram {
    ($histogram:expr) => {
        $crate::HistogramTimer::new(&$histogram)
    };
}
