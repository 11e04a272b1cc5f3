//! Operator dialog port.

use super::CapabilityResult;
use crate::lifecycle::domain::{PromptReply, PromptRequest};
use async_trait::async_trait;

/// Blocking, operator-facing confirmation dialog.
#[async_trait]
pub trait Prompt: Send + Sync {
    /// Shows `request` and waits for the operator.
    ///
    /// # Errors
    ///
    /// Returns [`super::CapabilityError`] when the dialog cannot be shown.
    async fn confirm(&self, request: &PromptRequest) -> CapabilityResult<PromptReply>;
}
