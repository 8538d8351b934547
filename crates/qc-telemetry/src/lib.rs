//! # QC Telemetry
//!
//! Logging and metrics for the custody runtime.
//!
//! - **Logs**: `tracing-subscriber` with `EnvFilter`, pretty or JSON lines
//! - **Metrics**: Prometheus counters and gauges in a global registry,
//!   rendered with [`gather_metrics`]
//!
//! ## Usage
//!
//! ```rust,ignore
//! use qc_telemetry::{init_telemetry, TelemetryConfig};
//!
//! let _guard = init_telemetry(TelemetryConfig::from_env())?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `QC_LOG_LEVEL` | `info` | Log level filter (falls back to `RUST_LOG`) |
//! | `QC_JSON_LOGS` | `false` | JSON output |
//! | `QC_CONSOLE_OUTPUT` | `true` | Write logs to stdout |
//! | `QC_SERVICE_NAME` | `quorum-custody` | Service name |
//! | `QC_NETWORK` | `devnet` | Network name |

mod config;
mod logging;
mod metrics;

pub use config::TelemetryConfig;
pub use logging::init_logging;
pub use metrics::{
    gather_metrics, register_metrics, HistogramTimer, MetricsHandle, BATCH_SKIPS,
    DEPOSITS_REPORTED, DISPATCH_DURATION, DISPATCH_ERRORS, PAYLOADS_CONSUMED, PAYLOADS_VERIFIED,
    PROOF_FAILURES, REGISTRY, VALIDATOR_EPOCH, WITHDRAWALS,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize logging and register metrics.
///
/// Returns a guard to be held for the lifetime of the application.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    let metrics = register_metrics()?;
    init_logging(&config)?;
    Ok(TelemetryGuard { _metrics: metrics })
}

/// Guard that keeps telemetry active.
pub struct TelemetryGuard {
    _metrics: MetricsHandle,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!("Shutting down telemetry...");
    }
}

/// Convenience macro for recording a metric increment.
#[macro_export]
macro_rules! metric_inc {
    ($metric:expr) => {
        $metric.inc()
    };
    ($metric:expr, $labels:expr) => {
        $metric.with_label_values($labels).inc()
    };
}
