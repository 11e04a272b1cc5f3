//! Task lifecycle: start, timed session, close and resolution follow-up.
//!
//! The controller reads the current task from the head of the running pool,
//! drives operator-facing capabilities in a background session, and records
//! the outcome on the board and on the repository canvas. The module
//! follows the same hexagonal layout as [`crate::kanban`]:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
