//! [`SessionTimer`] adapter running macOS Shortcuts.

use super::{CommandRunner, OsaScript, ScriptOutcome, TokioCommandRunner, applescript_quote};
use crate::lifecycle::ports::{CapabilityError, CapabilityResult, SessionTimer};
use crate::task::domain::DurationUnits;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const CAPABILITY: &str = "shortcuts";

/// Names of the shortcuts that start and stop the session timer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShortcutNames {
    /// Shortcut taking `<name>$<minutes>` as input.
    pub start: String,
    /// Shortcut that abandons the running session.
    pub stop: String,
}

impl Default for ShortcutNames {
    fn default() -> Self {
        Self {
            start: "Session计时".to_owned(),
            stop: "Session停止计时".to_owned(),
        }
    }
}

/// Timer backed by the `Session计时` family of shortcuts.
#[derive(Debug, Clone)]
pub struct ShortcutsTimer<R = TokioCommandRunner>
where
    R: CommandRunner,
{
    script: OsaScript<R>,
    names: ShortcutNames,
}

impl<R> ShortcutsTimer<R>
where
    R: CommandRunner,
{
    /// Creates a timer running `names` through `script`.
    #[must_use]
    pub const fn new(script: OsaScript<R>, names: ShortcutNames) -> Self {
        Self { script, names }
    }

    async fn run_shortcut(&self, name: &str, input: Option<&str>) -> CapabilityResult<()> {
        let mut script = format!(
            "tell application \"Shortcuts Events\" to run the shortcut named {}",
            applescript_quote(name)
        );
        if let Some(value) = input {
            script.push_str(" with input ");
            script.push_str(&applescript_quote(value));
        }
        match self.script.run(CAPABILITY, &script).await? {
            ScriptOutcome::Completed(_) => Ok(()),
            ScriptOutcome::Cancelled => Err(CapabilityError::Failed {
                capability: CAPABILITY,
                message: format!("shortcut '{name}' was cancelled"),
            }),
        }
    }
}

/// Returns the start shortcut input: `<name>$<minutes>`.
#[must_use]
pub fn timer_input(name: &str, duration: DurationUnits) -> String {
    format!("{name}${}", duration.minutes())
}

#[async_trait]
impl<R> SessionTimer for ShortcutsTimer<R>
where
    R: CommandRunner,
{
    async fn start_timer(&self, name: &str, duration: DurationUnits) -> CapabilityResult<()> {
        let input = timer_input(name, duration);
        tracing::info!(shortcut = %self.names.start, %input, "starting session timer");
        self.run_shortcut(&self.names.start, Some(&input)).await
    }

    async fn stop_timer(&self) -> CapabilityResult<()> {
        tracing::info!(shortcut = %self.names.stop, "stopping session timer");
        self.run_shortcut(&self.names.stop, None).await
    }
}
