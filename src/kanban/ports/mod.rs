//! Port contracts for the kanban board.
//!
//! Ports define infrastructure-agnostic interfaces used by kanban services.

pub mod checkpoint;
pub mod readiness;
pub mod store;

pub use checkpoint::{CheckpointDecision, CheckpointError, OrderCheckpoint};
pub use readiness::{ReadinessPredicate, ScheduledDateReadiness};
pub use store::{BoardRevision, BoardSnapshot, BoardStore, BoardStoreError, BoardStoreResult};
