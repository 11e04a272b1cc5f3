//! Error types for pool transitions.

use super::Pool;
use thiserror::Error;

/// Errors returned by pool operations on a [`super::Board`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum KanbanDomainError {
    /// The item is not in the pool it was popped from.
    #[error("item '{item}' not found in {pool}")]
    NotFound {
        /// Text that was looked up.
        item: String,
        /// Pool that was searched.
        pool: Pool,
    },

    /// The item already sits in a pool; pools are disjoint.
    #[error("item '{item}' already present in {pool}")]
    AlreadyPresent {
        /// Text that was inserted.
        item: String,
        /// Pool that already holds it.
        pool: Pool,
    },

    /// Blank text cannot be stored as an item.
    #[error("item text must not be empty")]
    EmptyItem,
}

/// Error returned while parsing a pool name.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown pool: {0}")]
pub struct ParsePoolError(pub String);
