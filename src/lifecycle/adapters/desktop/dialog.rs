//! [`Prompt`] adapter using AppleScript `display dialog`.

use super::{CommandRunner, OsaScript, ScriptOutcome, TokioCommandRunner, applescript_quote};
use crate::lifecycle::{
    domain::{PromptReply, PromptRequest},
    ports::{CapabilityResult, Prompt},
};
use async_trait::async_trait;

const CAPABILITY: &str = "dialog";
const BUTTON_RETURNED: &str = "button returned:";

/// Desktop dialog prompt.
#[derive(Debug, Clone)]
pub struct DialogPrompt<R = TokioCommandRunner>
where
    R: CommandRunner,
{
    script: OsaScript<R>,
}

impl<R> DialogPrompt<R>
where
    R: CommandRunner,
{
    /// Creates a prompt running through `script`.
    #[must_use]
    pub const fn new(script: OsaScript<R>) -> Self {
        Self { script }
    }
}

/// Builds the `display dialog` statement for `request`.
fn dialog_script(request: &PromptRequest) -> String {
    let accept = applescript_quote(&request.accept);
    let buttons = request.decline.as_deref().map_or_else(
        || accept.clone(),
        |decline| format!("{}, {accept}", applescript_quote(decline)),
    );
    format!(
        "display dialog {} with title {} buttons {{{buttons}}} default button {accept}",
        applescript_quote(&request.message),
        applescript_quote(&request.title),
    )
}

fn interpret(request: &PromptRequest, output: &str) -> PromptReply {
    let pressed = output
        .split(',')
        .find_map(|field| field.trim().strip_prefix(BUTTON_RETURNED))
        .unwrap_or_default();
    if pressed == request.accept {
        PromptReply::Accepted
    } else if request.decline.as_deref() == Some(pressed) {
        PromptReply::Declined
    } else {
        PromptReply::Dismissed
    }
}

#[async_trait]
impl<R> Prompt for DialogPrompt<R>
where
    R: CommandRunner,
{
    async fn confirm(&self, request: &PromptRequest) -> CapabilityResult<PromptReply> {
        let script = dialog_script(request);
        let reply = match self.script.run(CAPABILITY, &script).await? {
            ScriptOutcome::Completed(output) => interpret(request, &output),
            ScriptOutcome::Cancelled => PromptReply::Dismissed,
        };
        tracing::debug!(title = %request.title, ?reply, "dialog answered");
        Ok(reply)
    }
}
