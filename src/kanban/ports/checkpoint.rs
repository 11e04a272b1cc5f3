//! Human checkpoint between ordering and promotion.

use async_trait::async_trait;
use thiserror::Error;

/// Operator decision at the ordering checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckpointDecision {
    /// Continue with promotion using whatever order the board now holds.
    Proceed,
    /// Stop the rebuild before promotion.
    Abort,
}

/// Suspend point giving the operator a chance to reorder the ready pool.
#[async_trait]
pub trait OrderCheckpoint: Send + Sync {
    /// Blocks until the operator has reviewed `ready`.
    ///
    /// # Errors
    ///
    /// Returns [`CheckpointError`] when the confirmation backend fails.
    async fn review_order(&self, ready: &[String]) -> Result<CheckpointDecision, CheckpointError>;
}

/// Error returned when the checkpoint cannot reach the operator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("order checkpoint unavailable: {0}")]
pub struct CheckpointError(pub String);
