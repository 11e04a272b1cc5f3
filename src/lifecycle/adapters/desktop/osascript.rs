//! Thin wrapper around the `osascript` interpreter.

use super::{CommandRunner, TokioCommandRunner};
use crate::lifecycle::ports::{CapabilityError, CapabilityResult};
use std::sync::Arc;

const OSASCRIPT: &str = "osascript";
const USER_CANCELED: &str = "-128";

/// How a script run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptOutcome {
    /// The script finished; holds its trimmed output.
    Completed(String),
    /// The user cancelled a dialog (AppleScript error -128).
    Cancelled,
}

/// Runs AppleScript snippets.
#[derive(Debug, Clone)]
pub struct OsaScript<R = TokioCommandRunner>
where
    R: CommandRunner,
{
    runner: Arc<R>,
}

impl OsaScript<TokioCommandRunner> {
    /// Creates an interpreter that spawns real processes.
    #[must_use]
    pub fn system() -> Self {
        Self::new(Arc::new(TokioCommandRunner))
    }
}

impl<R> OsaScript<R>
where
    R: CommandRunner,
{
    /// Creates an interpreter over `runner`.
    #[must_use]
    pub const fn new(runner: Arc<R>) -> Self {
        Self { runner }
    }

    /// Runs `script` on behalf of `capability`.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityError`] when `osascript` cannot be spawned or the
    /// script fails for a reason other than user cancellation.
    pub async fn run(
        &self,
        capability: &'static str,
        script: &str,
    ) -> CapabilityResult<ScriptOutcome> {
        let args = vec!["-e".to_owned(), script.to_owned()];
        let output = self
            .runner
            .run(OSASCRIPT, &args)
            .await
            .map_err(|err| CapabilityError::unavailable(capability, err))?;
        if output.success {
            return Ok(ScriptOutcome::Completed(output.stdout.trim().to_owned()));
        }
        if output.stderr.contains(USER_CANCELED) {
            return Ok(ScriptOutcome::Cancelled);
        }
        Err(CapabilityError::Failed {
            capability,
            message: output.stderr.trim().to_owned(),
        })
    }
}
