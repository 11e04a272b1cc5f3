//! Errors shared by desktop capabilities.

use std::sync::Arc;
use thiserror::Error;

/// Result type for capability calls.
pub type CapabilityResult<T> = Result<T, CapabilityError>;

/// Failure of an external capability such as a dialog or a timer.
#[derive(Debug, Clone, Error)]
pub enum CapabilityError {
    /// The capability could not be launched.
    #[error("{capability} unavailable: {source}")]
    Unavailable {
        /// Capability name.
        capability: &'static str,
        /// Launch error.
        source: Arc<std::io::Error>,
    },
    /// The capability ran and reported failure.
    #[error("{capability} failed: {message}")]
    Failed {
        /// Capability name.
        capability: &'static str,
        /// Diagnostic output.
        message: String,
    },
}

impl CapabilityError {
    /// Wraps a launch error.
    #[must_use]
    pub fn unavailable(capability: &'static str, err: std::io::Error) -> Self {
        Self::Unavailable {
            capability,
            source: Arc::new(err),
        }
    }
}
