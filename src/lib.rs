//! Reallife: a personal kanban task-orchestration client.
//!
//! The client mirrors tasks from a kanban markdown board into a single
//! "current task" slot served over HTTP, and drives desktop automation
//! (dialogs, timers, canvas annotations) as tasks start and finish.
//!
//! # Architecture
//!
//! Reallife follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (markdown, osascript, canvas)
//!
//! # Modules
//!
//! - [`task`]: Task string codec
//! - [`kanban`]: Pool state machine, board stores and the sync engine
//! - [`lifecycle`]: Start/close lifecycle and automation capabilities
//! - [`server`]: HTTP surface
//! - [`scheduler`]: Weekly rebuild trigger
//! - [`config`]: Configuration loading
//! - [`telemetry`]: Tracing subscriber set-up

pub mod config;
pub mod kanban;
pub mod lifecycle;
pub mod scheduler;
pub mod server;
pub mod storage;
pub mod task;
pub mod telemetry;

#[cfg(test)]
mod test_support;
