//! Orchestration services for the kanban board.

mod gate;
mod sync;

pub use gate::{BoardGate, TransactionError, TransactionResult};
pub use sync::{OrderKey, SyncEngine, SyncError, SyncReport, SyncResult};
