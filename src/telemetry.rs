//! Tracing subscriber set-up for the binary.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::{SubscriberInitExt as _, TryInitError};

const DEFAULT_DIRECTIVE: &str = "info";

/// Builds the log filter.
///
/// An explicit `level` wins; otherwise `RUST_LOG` is used, falling back to
/// `info`.
#[must_use]
pub fn filter(level: Option<&str>) -> EnvFilter {
    match level {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE)),
    }
}

/// Installs the global fmt subscriber.
///
/// # Errors
///
/// Returns [`TryInitError`] when a global subscriber is already set.
pub fn init(level: Option<&str>) -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(filter(level))
        .try_init()
}
