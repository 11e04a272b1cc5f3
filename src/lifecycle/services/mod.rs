//! Lifecycle orchestration services.

mod controller;
mod session;
mod tracker;

pub use controller::{
    Capabilities, FlexibleKind, LifecycleController, LifecycleError, LifecycleResult, SyncPolicy,
};
pub use tracker::{SessionLedger, SessionTracker};
