//! Structured logging for the benchmark binary.
//!
//! Logs are JSON lines on stderr so that stdout carries only the report.
//!
//! # Telemetry invariants
//!
//! - **No key material, IVs or plaintext** appear in any log field.
//! - Log level is configurable via `CIPHERBENCH_LOG_LEVEL` (default: `warn`);
//!   `RUST_LOG` takes precedence when set.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Initialise the global tracing subscriber.
///
/// # Errors
///
/// Returns an error if the subscriber has already been set.
pub fn init(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialise tracing subscriber: {e}"))
}
