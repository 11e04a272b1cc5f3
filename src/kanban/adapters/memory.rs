//! In-memory board store for tests and ephemeral runs.

use crate::kanban::{
    domain::Board,
    ports::{BoardRevision, BoardSnapshot, BoardStore, BoardStoreError, BoardStoreResult},
};
use async_trait::async_trait;
use std::sync::{Arc, RwLock};

/// Thread-safe in-memory board store.
///
/// Revisions are a counter bumped on every successful persist.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBoardStore {
    state: Arc<RwLock<InMemoryBoardState>>,
}

#[derive(Debug, Default)]
struct InMemoryBoardState {
    board: Board,
    version: u64,
    persists: usize,
    locked: bool,
}

impl InMemoryBoardStore {
    /// Creates a store holding an empty board.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with `board`.
    #[must_use]
    pub fn with_board(board: Board) -> Self {
        Self {
            state: Arc::new(RwLock::new(InMemoryBoardState {
                board,
                version: 0,
                persists: 0,
                locked: false,
            })),
        }
    }

    /// Returns a copy of the stored board.
    ///
    /// # Errors
    ///
    /// Returns [`BoardStoreError::Persistence`] when the lock is poisoned.
    pub fn board(&self) -> BoardStoreResult<Board> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.board.clone())
    }

    /// Returns how many times the board has been persisted.
    ///
    /// # Errors
    ///
    /// Returns [`BoardStoreError::Persistence`] when the lock is poisoned.
    pub fn persist_count(&self) -> BoardStoreResult<usize> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.persists)
    }

    /// Makes every later persist fail with a conflict until unlocked.
    ///
    /// # Errors
    ///
    /// Returns [`BoardStoreError::Persistence`] when the lock is poisoned.
    pub fn set_locked(&self, locked: bool) -> BoardStoreResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        state.locked = locked;
        Ok(())
    }

    /// Replaces the board out of band, as an external editor would.
    ///
    /// # Errors
    ///
    /// Returns [`BoardStoreError::Persistence`] when the lock is poisoned.
    pub fn overwrite(&self, board: Board) -> BoardStoreResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        state.board = board;
        state.version += 1;
        Ok(())
    }
}

fn poisoned<E: std::fmt::Display>(err: E) -> BoardStoreError {
    BoardStoreError::persistence(std::io::Error::other(err.to_string()))
}

fn revision(version: u64) -> BoardRevision {
    BoardRevision::new(format!("mem-{version}"))
}

#[async_trait]
impl BoardStore for InMemoryBoardStore {
    async fn load(&self) -> BoardStoreResult<BoardSnapshot> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(BoardSnapshot {
            board: state.board.clone(),
            revision: revision(state.version),
        })
    }

    async fn persist(
        &self,
        board: &Board,
        expected: &BoardRevision,
    ) -> BoardStoreResult<BoardRevision> {
        let mut state = self.state.write().map_err(poisoned)?;
        let found = revision(state.version);
        if state.locked || &found != expected {
            return Err(BoardStoreError::Conflict {
                expected: expected.clone(),
                found,
            });
        }
        state.board = board.clone();
        state.version += 1;
        state.persists += 1;
        Ok(revision(state.version))
    }
}
