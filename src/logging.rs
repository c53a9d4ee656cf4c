//! waypoint/src/logging.rs
//! Logging initialization.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{filter::EnvFilter, fmt};

/// Installs the global subscriber: `RUST_LOG` wins, otherwise `default`.
/// Safe to call more than once (tests share a process).
pub fn init(default: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .try_init();
}
