//! Three-phase reconciliation of the board pools.

use super::gate::{BoardGate, TransactionError};
use crate::kanban::{
    domain::{Board, KanbanDomainError, Pool, tags},
    ports::{BoardStore, CheckpointDecision, CheckpointError, OrderCheckpoint, ReadinessPredicate},
};
use crate::task::domain::{ACTION_PREFIX, TaskDescriptor, strip_action_prefix};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Sort key applied to the ready pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderKey {
    /// Group by repository name; items that do not parse sort last.
    #[default]
    Code,
    /// Ascending `#p<n>` priority; untagged items sort last.
    Priority,
}

impl OrderKey {
    fn code_key(text: &str) -> (bool, String) {
        TaskDescriptor::parse(strip_action_prefix(text)).map_or_else(
            |_| (true, String::new()),
            |descriptor| (false, descriptor.repository().to_owned()),
        )
    }

    fn priority_key(text: &str) -> (bool, u8) {
        tags::priority(text).map_or((true, u8::MAX), |level| (false, level))
    }

    fn sort(self, board: &mut Board) {
        match self {
            Self::Code => board.sort_pool_by_key(Pool::Ready, |text| Self::code_key(text)),
            Self::Priority => {
                board.sort_pool_by_key(Pool::Ready, |text| Self::priority_key(text));
            }
        }
    }
}

/// Errors returned by the sync engine.
#[derive(Debug, Clone, Error)]
pub enum SyncError {
    /// A phase transaction failed; later phases did not run.
    #[error(transparent)]
    Transaction(#[from] TransactionError),
    /// The ordering checkpoint could not reach the operator.
    #[error(transparent)]
    Checkpoint(#[from] CheckpointError),
}

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Counts reported by a rebuild.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// Backlog items promoted to ready.
    pub readied: usize,
    /// Ready items promoted to running.
    pub promoted: usize,
    /// Running items that gained the action prefix.
    pub published: usize,
    /// Whether the operator aborted at the ordering checkpoint.
    pub aborted: bool,
}

/// Promotes items between pools by readiness, order and capacity.
pub struct SyncEngine<S, C>
where
    S: BoardStore,
    C: Clock + Send + Sync,
{
    gate: Arc<BoardGate<S>>,
    clock: Arc<C>,
    readiness: Arc<dyn ReadinessPredicate>,
    order_key: OrderKey,
}

impl<S, C> SyncEngine<S, C>
where
    S: BoardStore,
    C: Clock + Send + Sync,
{
    /// Creates an engine over `gate`.
    #[must_use]
    pub fn new(
        gate: Arc<BoardGate<S>>,
        clock: Arc<C>,
        readiness: Arc<dyn ReadinessPredicate>,
        order_key: OrderKey,
    ) -> Self {
        Self {
            gate,
            clock,
            readiness,
            order_key,
        }
    }

    /// Returns the transaction gate.
    #[must_use]
    pub const fn gate(&self) -> &Arc<BoardGate<S>> {
        &self.gate
    }

    /// Promotes backlog items accepted by the configured predicate.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Transaction`] when the board cannot be updated.
    pub async fn sync_ready(&self) -> SyncResult<usize> {
        self.sync_ready_with(self.readiness.as_ref()).await
    }

    /// Promotes backlog items accepted by `predicate`, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Transaction`] when the board cannot be updated.
    pub async fn sync_ready_with(&self, predicate: &dyn ReadinessPredicate) -> SyncResult<usize> {
        let today = self.clock.local().date_naive();
        let promoted = self
            .gate
            .transact(|board| {
                let ready: Vec<String> = board
                    .get_tasks_in(Pool::Backlog)
                    .iter()
                    .filter(|item| predicate.is_ready(item, today))
                    .cloned()
                    .collect();
                for item in &ready {
                    board.move_item(item, Pool::Backlog, Pool::Ready)?;
                }
                Ok(ready.len())
            })
            .await?;
        tracing::info!(promoted, %today, "backlog synced to ready");
        Ok(promoted)
    }

    /// Stable-sorts the ready pool by `key`.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Transaction`] when the board cannot be updated.
    pub async fn sync_order(&self, key: OrderKey) -> SyncResult<()> {
        self.gate
            .transact(|board| {
                key.sort(board);
                Ok(())
            })
            .await?;
        tracing::info!(?key, "ready pool ordered");
        Ok(())
    }

    /// Promotes ready items from the head into the running pool.
    ///
    /// `Some(n)` promotes at most `n` items; `None` promotes them all.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Transaction`] when the board cannot be updated.
    pub async fn sync_run(&self, max_p: Option<usize>) -> SyncResult<usize> {
        let promoted = self
            .gate
            .transact(|board| {
                let available = board.len(Pool::Ready);
                let take = max_p.map_or(available, |limit| limit.min(available));
                let heads: Vec<String> = board
                    .get_tasks_in(Pool::Ready)
                    .iter()
                    .take(take)
                    .cloned()
                    .collect();
                for item in &heads {
                    board.move_item(item, Pool::Ready, Pool::Running)?;
                }
                Ok(take)
            })
            .await?;
        tracing::info!(promoted, ?max_p, "ready synced to running");
        Ok(promoted)
    }

    /// Prefixes every running item that lacks it with `A!`.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Transaction`] when the board cannot be updated.
    pub async fn publish(&self) -> SyncResult<usize> {
        let published = self
            .gate
            .transact(|board| {
                let pending: Vec<String> = board
                    .get_tasks_in(Pool::Running)
                    .iter()
                    .filter(|item| !item.starts_with(ACTION_PREFIX))
                    .cloned()
                    .collect();
                for item in &pending {
                    board.replace(Pool::Running, item, &format!("{ACTION_PREFIX}{item}"))?;
                }
                Ok(pending.len())
            })
            .await?;
        tracing::debug!(published, "running pool published");
        Ok(published)
    }

    /// Full rebuild: ready, order, operator checkpoint, run, publish.
    ///
    /// An abort at the checkpoint leaves the ready and order phases committed
    /// and skips promotion.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError`] from the first failing phase.
    pub async fn rebuild(
        &self,
        checkpoint: &dyn OrderCheckpoint,
        capacity: Option<usize>,
    ) -> SyncResult<SyncReport> {
        let readied = self.sync_ready().await?;
        self.sync_order(self.order_key).await?;
        let ready = self.gate.snapshot().await?.get_tasks_in(Pool::Ready).to_vec();
        if checkpoint.review_order(&ready).await? == CheckpointDecision::Abort {
            tracing::info!("rebuild aborted at ordering checkpoint");
            return Ok(SyncReport {
                readied,
                aborted: true,
                ..SyncReport::default()
            });
        }
        self.finish(readied, capacity).await
    }

    /// Bounded rebuild without a checkpoint.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError`] from the first failing phase.
    pub async fn add(&self, capacity: usize) -> SyncResult<SyncReport> {
        let readied = self.sync_ready().await?;
        self.sync_order(self.order_key).await?;
        self.finish(readied, Some(capacity)).await
    }

    /// Replaces the running pool with `tasks`.
    ///
    /// Listed items found elsewhere on the board (with or without the action
    /// prefix) are pulled out of their pool. Running items that are not
    /// listed go back to the head of the ready pool.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Transaction`] when the board cannot be updated.
    pub async fn update_running(&self, tasks: &[String]) -> SyncResult<usize> {
        let written = self
            .gate
            .transact(|board| replace_running(board, tasks))
            .await?;
        tracing::info!(written, "running pool replaced");
        Ok(written)
    }

    async fn finish(&self, readied: usize, capacity: Option<usize>) -> SyncResult<SyncReport> {
        let promoted = self.sync_run(capacity).await?;
        let published = self.publish().await?;
        Ok(SyncReport {
            readied,
            promoted,
            published,
            aborted: false,
        })
    }
}

fn replace_running(board: &mut Board, tasks: &[String]) -> Result<usize, KanbanDomainError> {
    let wanted: Vec<&str> = tasks
        .iter()
        .map(|task| task.trim())
        .filter(|task| !task.is_empty())
        .collect();
    let listed = |item: &str| {
        wanted
            .iter()
            .any(|task| strip_action_prefix(task) == strip_action_prefix(item))
    };

    let previous = board.drain(Pool::Running);
    for item in previous.iter().rev().filter(|item| !listed(item)) {
        board.insert_front(strip_action_prefix(item), Pool::Ready)?;
    }
    for task in &wanted {
        for candidate in [*task, strip_action_prefix(task)] {
            if let Some(pool) = board.locate(candidate).filter(|pool| *pool != Pool::Done) {
                board.pop(candidate, pool)?;
            }
        }
        if board.locate(task).is_none() {
            board.insert(task, Pool::Running)?;
        }
    }
    Ok(board.len(Pool::Running))
}
