//! Results reported by lifecycle operations.

use super::{Marker, SessionId};
use crate::kanban::services::SyncReport;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Human-readable outcome of a controller entry point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum LifecycleOutcome {
    /// The current task is not pending, or there is none.
    NothingToStart,
    /// The current task is not running, or there is none.
    NothingToClose,
    /// No task is pending or running.
    AllComplete,
    /// A session was dispatched for `task`.
    Started {
        /// Current-task message of the started task.
        task: String,
        /// Background session handling it.
        session: SessionId,
    },
    /// `task` moved to the done pool.
    Closed {
        /// Current-task message of the closed task.
        task: String,
    },
    /// A rebuild ran to completion.
    Rebuilt(SyncReport),
    /// The operator aborted the rebuild at the ordering checkpoint.
    RebuildAborted,
    /// The running pool was replaced.
    TasksUpdated {
        /// Items now in the running pool.
        count: usize,
    },
    /// A tip card was added.
    TipAdded {
        /// Repository whose canvas received the card.
        repository: String,
    },
}

impl fmt::Display for LifecycleOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NothingToStart => f.write_str("nothing to start"),
            Self::NothingToClose => f.write_str("nothing to close"),
            Self::AllComplete => f.write_str("all tasks complete"),
            Self::Started { task, .. } => write!(f, "task: {task} started"),
            Self::Closed { task } => write!(f, "task: {task} closed"),
            Self::Rebuilt(report) => write!(
                f,
                "kanban rebuilt: {} readied, {} promoted",
                report.readied, report.promoted
            ),
            Self::RebuildAborted => f.write_str("kanban rebuild aborted"),
            Self::TasksUpdated { count } => write!(f, "running pool holds {count} tasks"),
            Self::TipAdded { repository } => write!(f, "tip added to {repository}"),
        }
    }
}

/// Where a background session stopped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "stage", content = "detail", rename_all = "snake_case")]
pub enum SessionStage {
    /// The operator dismissed a prompt before completion.
    Dismissed,
    /// A capability failed before completion.
    CapabilityFailed(String),
    /// The task was already completed by another path.
    AlreadySettled,
    /// The board could not record completion.
    BoardFailed(String),
    /// The task moved to the done pool.
    Completed,
}

/// Summary of one background session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionReport {
    /// Session identifier.
    pub session: SessionId,
    /// Stored text of the task the session ran for.
    pub task: String,
    /// Where the session stopped.
    pub stage: SessionStage,
    /// Resolution recorded after completion.
    pub marker: Option<Marker>,
    /// Annotation failure, if any. Never fatal.
    pub annotation_error: Option<String>,
}

impl SessionReport {
    /// Creates a report for a session that stopped at `stage`.
    #[must_use]
    pub const fn new(session: SessionId, task: String, stage: SessionStage) -> Self {
        Self {
            session,
            task,
            stage,
            marker: None,
            annotation_error: None,
        }
    }
}

/// Board summary for the operator view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusView {
    /// Item count per pool, keyed by pool name.
    pub pools: BTreeMap<String, usize>,
    /// Current-task message, if any.
    pub current: Option<String>,
    /// Sessions still running in the background.
    pub active_sessions: usize,
}
