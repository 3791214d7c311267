//! Telemetry logic.
//! Logs are emitted with `tracing`, the subscriber is up to the caller.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::prelude::*;

const DEFAULT_DIRECTIVE: &str = "info";

/// Install a global fmt subscriber filtered by `RUST_LOG`, `info` when unset.
pub fn setup_logging() -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .try_init()
}
