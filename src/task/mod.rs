//! Task descriptors for the kanban client.
//!
//! A task is stored on the board as a single line of text. The
//! [`domain`] module parses that line into its duration, repository, title
//! and status, and renders it back without loss.

pub mod domain;

#[cfg(test)]
mod tests;
