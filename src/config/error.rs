//! Configuration errors.

use camino::Utf8Path;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while assembling configuration.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config '{path}': {source}")]
    Read {
        /// File that was read.
        path: String,
        /// Underlying I/O failure.
        source: Arc<std::io::Error>,
    },
    /// The configuration text is malformed.
    #[error("invalid config in {source_name}: {reason}")]
    Parse {
        /// File name or other label for the text.
        source_name: String,
        /// Parser message.
        reason: String,
    },
    /// An environment override has an unusable value.
    #[error("invalid value '{value}' for {name}")]
    InvalidEnv {
        /// Variable name.
        name: &'static str,
        /// Rejected value.
        value: String,
    },
}

impl ConfigError {
    /// Wraps an I/O failure reading `path`.
    #[must_use]
    pub fn read(path: &Utf8Path, err: std::io::Error) -> Self {
        Self::Read {
            path: path.to_string(),
            source: Arc::new(err),
        }
    }
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;
