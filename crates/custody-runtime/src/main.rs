//! # Quorum Custody Runtime
//!
//! Reads mailbox envelopes (NDJSON) from stdin and honours them.
//!
//! ## Startup Sequence
//!
//! 1. Load configuration from the environment and validate it
//! 2. Initialize telemetry
//! 3. Wire components (Level 0 → Level 3)
//! 4. Dispatch envelopes until stdin closes or Ctrl+C

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};

use custody_runtime::{CustodyConfig, CustodyContainer, Dispatcher, Envelope};
use qc_telemetry::{gather_metrics, init_telemetry};

/// Owns the wired components for the lifetime of the process.
struct CustodyRuntime {
    dispatcher: Dispatcher,
}

impl CustodyRuntime {
    fn new(config: CustodyConfig) -> Result<Self> {
        info!("===========================================");
        info!("  Quorum Custody Runtime v{}", env!("CARGO_PKG_VERSION"));
        info!("===========================================");

        let container = CustodyContainer::new(config).context("failed to wire components")?;
        Ok(Self {
            dispatcher: Dispatcher::new(Arc::new(container)),
        })
    }

    /// Dispatch every line until EOF.
    async fn run(&self) -> Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut line_no = 0u64;
        while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
            line_no += 1;
            if line.trim().is_empty() {
                continue;
            }
            let envelope = match Envelope::parse(&line) {
                Ok(envelope) => envelope,
                Err(e) => {
                    warn!(line = line_no, error = %e, "[runtime] Skipping malformed envelope");
                    continue;
                }
            };
            match self.dispatcher.dispatch(&envelope) {
                Ok(outcome) => info!(line = line_no, ?outcome, "[runtime] Envelope dispatched"),
                Err(e) => warn!(line = line_no, error = %e, "[runtime] Envelope rejected"),
            }
        }
        Ok(())
    }

    fn shutdown(&self) {
        info!("[runtime] Shutting down");
        match gather_metrics() {
            Ok(text) => info!(metrics = %text, "[runtime] Final metrics"),
            Err(e) => error!(error = %e, "[runtime] Failed to render metrics"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = CustodyConfig::from_env().context("failed to load configuration")?;
    config.validate().context("invalid configuration")?;

    let _telemetry = init_telemetry(config.telemetry.clone()).context("failed to initialize telemetry")?;

    let runtime = CustodyRuntime::new(config)?;
    info!("Runtime is reading envelopes from stdin. Press Ctrl+C to stop.");

    tokio::select! {
        result = runtime.run() => result?,
        signal = tokio::signal::ctrl_c() => signal.context("failed to listen for Ctrl+C")?,
    }

    runtime.shutdown();
    Ok(())
}
