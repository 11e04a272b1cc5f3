//! macOS desktop capabilities driven through `osascript`.
//!
//! Dialogs use AppleScript `display dialog`; timers run Shortcuts through
//! the `Shortcuts Events` scripting target.

mod dialog;
mod osascript;
mod quote;
mod runner;
mod shortcuts;

pub use dialog::DialogPrompt;
pub use osascript::{OsaScript, ScriptOutcome};
pub use quote::applescript_quote;
pub use runner::{CommandOutput, CommandRunner, TokioCommandRunner};
pub use shortcuts::{ShortcutNames, ShortcutsTimer, timer_input};
