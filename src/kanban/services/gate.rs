//! Scoped read-modify-write access to the board store.

use crate::kanban::{
    domain::{Board, KanbanDomainError},
    ports::{BoardSnapshot, BoardStore, BoardStoreError},
};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

/// Errors returned by a board transaction.
#[derive(Debug, Clone, Error)]
pub enum TransactionError {
    /// A pool operation inside the transaction failed; nothing was persisted.
    #[error(transparent)]
    Domain(#[from] KanbanDomainError),
    /// Loading or persisting the board failed.
    #[error(transparent)]
    Store(#[from] BoardStoreError),
}

/// Result type for board transactions.
pub type TransactionResult<T> = Result<T, TransactionError>;

/// The only sanctioned path for mutating the board store.
///
/// Each transaction holds the gate's mutex for its whole duration, loads a
/// fresh board, applies the closure and persists the result only when the
/// closure succeeds and the board changed.
pub struct BoardGate<S>
where
    S: BoardStore,
{
    store: Arc<S>,
    lock: Mutex<()>,
}

impl<S> BoardGate<S>
where
    S: BoardStore,
{
    /// Wraps `store`.
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            lock: Mutex::new(()),
        }
    }

    /// Returns the underlying store.
    #[must_use]
    pub const fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Loads the current board without mutating it.
    ///
    /// # Errors
    ///
    /// Returns [`TransactionError::Store`] when loading fails.
    pub async fn snapshot(&self) -> TransactionResult<Board> {
        let _guard = self.lock.lock().await;
        Ok(self.store.load().await?.board)
    }

    /// Runs `apply` against a freshly loaded board and persists on success.
    ///
    /// On `Err` the working copy is dropped and the store keeps its last
    /// committed state. An unchanged board is not written back.
    ///
    /// # Errors
    ///
    /// Returns [`TransactionError`] when loading, the closure or persisting
    /// fails.
    pub async fn transact<T, F>(&self, apply: F) -> TransactionResult<T>
    where
        F: FnOnce(&mut Board) -> Result<T, KanbanDomainError> + Send,
        T: Send,
    {
        let _guard = self.lock.lock().await;
        let BoardSnapshot {
            mut board,
            revision,
        } = self.store.load().await?;
        let loaded = board.clone();
        let value = match apply(&mut board) {
            Ok(value) => value,
            Err(err) => {
                tracing::debug!(error = %err, "board transaction rolled back");
                return Err(err.into());
            }
        };
        if board == loaded {
            tracing::trace!(revision = %revision, "board unchanged, nothing to persist");
            return Ok(value);
        }
        let committed = self.store.persist(&board, &revision).await?;
        tracing::trace!(revision = %committed, "board transaction committed");
        Ok(value)
    }
}
