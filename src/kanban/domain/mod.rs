//! Domain model for the kanban pool state machine.
//!
//! A [`Board`] owns four ordered, disjoint [`Pool`]s. Items move between
//! pools only through explicit `pop`/`insert` pairs; nothing mutates pool
//! membership in place.

mod board;
mod error;
mod pool;
pub mod tags;

pub use board::Board;
pub use error::{KanbanDomainError, ParsePoolError};
pub use pool::Pool;
