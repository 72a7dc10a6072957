//! # Air Anchor Transaction Processor
//!
//! Loads configuration and the trusted CA key, starts the processor runtime
//! and runs until Ctrl+C.

use anchor_telemetry::{init_telemetry, TelemetryConfig};
use anyhow::{Context, Result};
use processor_runtime::{ProcessorConfig, ProcessorRuntime};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let _telemetry =
        init_telemetry(TelemetryConfig::from_env()).context("Failed to initialize telemetry")?;

    info!("===========================================");
    info!("  Air Anchor transaction processor v{}", env!("CARGO_PKG_VERSION"));
    info!("===========================================");

    let config = ProcessorConfig::from_env();
    let runtime = ProcessorRuntime::from_config(&config).context("Failed to start processor")?;
    runtime.start();

    info!("Processor is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl+C")?;

    runtime.shutdown().await;
    Ok(())
}
