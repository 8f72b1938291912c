//! Tracing subscriber setup for binaries built on Parkrace.
//!
//! Library code only emits `tracing` events; installing a subscriber is
//! left to the process entry point.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "info";

/// Installs a global fmt subscriber filtered by `RUST_LOG`.
///
/// # Errors
/// Returns [`TryInitError`] if a global subscriber is already set.
pub fn init() -> Result<(), TryInitError> {
    init_with_default(DEFAULT_FILTER)
}

/// Like [`init`], with a custom fallback filter (e.g. `"parkrace=debug"`).
pub fn init_with_default(default_filter: &str) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init()
}
