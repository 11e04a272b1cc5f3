//! Board store backed by a kanban-plugin markdown note.

mod document;
mod store;

pub use document::{DocumentError, KanbanDocument};
pub use store::MarkdownBoardStore;
