//! Kanban pool state machine and synchronisation.
//!
//! The board moves items through four pools: backlog, ready, running and
//! done. The module follows the hexagonal layout used across the crate:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Transaction gate and sync engine in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
