//! Store port for loading and persisting the board.

use crate::kanban::domain::Board;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Result type for board store operations.
pub type BoardStoreResult<T> = Result<T, BoardStoreError>;

/// Opaque version of the backing document observed at load time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BoardRevision(String);

impl BoardRevision {
    /// Wraps a store-specific revision token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the revision token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BoardRevision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Board contents together with the revision they were read at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSnapshot {
    /// Loaded board.
    pub board: Board,
    /// Revision of the backing document.
    pub revision: BoardRevision,
}

/// Board persistence contract.
#[async_trait]
pub trait BoardStore: Send + Sync {
    /// Loads the board from the backing document.
    ///
    /// # Errors
    ///
    /// Returns [`BoardStoreError`] when the document cannot be read or parsed.
    async fn load(&self) -> BoardStoreResult<BoardSnapshot>;

    /// Writes `board` back, provided the document is still at `expected`.
    ///
    /// # Errors
    ///
    /// Returns [`BoardStoreError::Conflict`] when the document changed since
    /// it was loaded, or [`BoardStoreError::Persistence`] on write failure.
    async fn persist(
        &self,
        board: &Board,
        expected: &BoardRevision,
    ) -> BoardStoreResult<BoardRevision>;
}

/// Errors returned by board store implementations.
#[derive(Debug, Clone, Error)]
pub enum BoardStoreError {
    /// The backing document changed between load and persist.
    #[error("board changed on disk: expected revision {expected}, found {found}")]
    Conflict {
        /// Revision observed at load time.
        expected: BoardRevision,
        /// Revision found at persist time.
        found: BoardRevision,
    },

    /// The backing document could not be interpreted as a board.
    #[error("malformed board document: {0}")]
    Format(String),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl BoardStoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
