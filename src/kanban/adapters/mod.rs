//! Adapter implementations for the board store port.

pub mod markdown;
pub mod memory;

pub use markdown::MarkdownBoardStore;
pub use memory::InMemoryBoardStore;
