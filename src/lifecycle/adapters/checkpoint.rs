//! Ordering checkpoint answered through an operator prompt.

use crate::kanban::ports::{CheckpointDecision, CheckpointError, OrderCheckpoint};
use crate::lifecycle::{
    domain::{PromptContext, PromptKind, PromptReply, PromptTemplates},
    ports::Prompt,
};
use async_trait::async_trait;
use std::sync::Arc;

/// Asks the operator to confirm the ready pool order before promotion.
pub struct PromptCheckpoint<P>
where
    P: Prompt,
{
    prompt: Arc<P>,
    templates: Arc<PromptTemplates>,
}

impl<P> PromptCheckpoint<P>
where
    P: Prompt,
{
    /// Creates a checkpoint asking through `prompt`.
    #[must_use]
    pub const fn new(prompt: Arc<P>, templates: Arc<PromptTemplates>) -> Self {
        Self { prompt, templates }
    }
}

#[async_trait]
impl<P> OrderCheckpoint for PromptCheckpoint<P>
where
    P: Prompt,
{
    async fn review_order(&self, ready: &[String]) -> Result<CheckpointDecision, CheckpointError> {
        let context = PromptContext {
            ready: ready.to_vec(),
            ..PromptContext::default()
        };
        let request = self
            .templates
            .render(PromptKind::OrderCheckpoint, &context)
            .map_err(|err| CheckpointError(err.to_string()))?;
        let reply = self
            .prompt
            .confirm(&request)
            .await
            .map_err(|err| CheckpointError(err.to_string()))?;
        Ok(match reply {
            PromptReply::Accepted => CheckpointDecision::Proceed,
            PromptReply::Declined | PromptReply::Dismissed => CheckpointDecision::Abort,
        })
    }
}
