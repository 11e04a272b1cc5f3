//! Runtime configuration.
//!
//! Settings come from an optional JSON file, then environment overrides,
//! then command-line flags applied by the binary. Every field has a
//! default, so an empty object is a valid file.

mod error;

pub use error::{ConfigError, ConfigResult};

use crate::kanban::services::OrderKey;
use crate::lifecycle::{
    adapters::desktop::ShortcutNames, domain::PromptTemplates, services::SyncPolicy,
};
use crate::scheduler::WeeklySchedule;
use crate::storage::DocumentPath;
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::SocketAddr;

/// Environment variable overriding [`ReallifeConfig::board_path`].
pub const BOARD_PATH_ENV: &str = "REALLIFE_BOARD_PATH";
/// Environment variable overriding [`ReallifeConfig::listen`].
pub const LISTEN_ENV: &str = "REALLIFE_LISTEN";
/// Port served when nothing else is configured.
pub const DEFAULT_PORT: u16 = 8021;

/// Complete client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReallifeConfig {
    /// Kanban markdown document.
    pub board_path: Utf8PathBuf,
    /// HTTP listen address.
    pub listen: SocketAddr,
    /// Capacities for the rebuild paths.
    pub policy: SyncPolicy,
    /// Ready pool sort key.
    pub order_key: OrderKey,
    /// Full rebuild cadence.
    pub schedule: WeeklySchedule,
    /// Whether the binary starts the scheduler.
    pub scheduler_enabled: bool,
    /// Timer shortcut names.
    pub shortcuts: ShortcutNames,
    /// Dialog texts.
    pub prompts: PromptTemplates,
    /// Repository key to canvas document.
    pub canvases: BTreeMap<String, Utf8PathBuf>,
}

impl Default for ReallifeConfig {
    fn default() -> Self {
        Self {
            board_path: Utf8PathBuf::from("kanban.md"),
            listen: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            policy: SyncPolicy::default(),
            order_key: OrderKey::default(),
            schedule: WeeklySchedule::default(),
            scheduler_enabled: true,
            shortcuts: ShortcutNames::default(),
            prompts: PromptTemplates::default(),
            canvases: BTreeMap::new(),
        }
    }
}

impl ReallifeConfig {
    /// Parses configuration JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the text is not a valid config.
    pub fn from_json(source: &str, text: &str) -> ConfigResult<Self> {
        serde_json::from_str(text).map_err(|err| ConfigError::Parse {
            source_name: source.to_owned(),
            reason: err.to_string(),
        })
    }

    /// Reads `path`, or returns the defaults when no path is given.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] when the file cannot be read or
    /// [`ConfigError::Parse`] when it is malformed.
    pub fn load(path: Option<&Utf8Path>) -> ConfigResult<Self> {
        let Some(file) = path else {
            return Ok(Self::default());
        };
        let text = DocumentPath::new(file)
            .and_then(|document| document.read())
            .map_err(|err| ConfigError::read(file, err))?;
        let config = Self::from_json(file.as_str(), &text)?;
        tracing::debug!(path = %file, "configuration loaded");
        Ok(config)
    }

    /// Applies environment overrides read through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnv`] when a variable cannot be parsed.
    pub fn apply_env<F>(mut self, lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(BOARD_PATH_ENV).filter(|value| !value.trim().is_empty()) {
            self.board_path = Utf8PathBuf::from(path.trim());
        }
        if let Some(value) = lookup(LISTEN_ENV) {
            self.listen = value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                name: LISTEN_ENV,
                value: value.clone(),
            })?;
        }
        Ok(self)
    }

    /// Applies environment overrides from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnv`] when a variable cannot be parsed.
    pub fn apply_process_env(self) -> ConfigResult<Self> {
        self.apply_env(|name| std::env::var(name).ok())
    }

    /// Replaces the listen port, keeping the host.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.listen.set_port(port);
        self
    }
}

#[cfg(test)]
mod tests;
