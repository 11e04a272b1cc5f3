//! Bookkeeping for background sessions.

use crate::lifecycle::domain::{SessionId, SessionReport};
use std::collections::HashSet;
use std::sync::Mutex;
use tokio::task::JoinHandle;

/// Records which sessions have completed their task.
///
/// Completion is exactly-once per [`SessionId`]: the first `settle` wins.
#[derive(Debug, Default)]
pub struct SessionLedger {
    settled: Mutex<HashSet<SessionId>>,
}

impl SessionLedger {
    /// Marks `session` settled. Returns `false` if it already was.
    pub fn settle(&self, session: SessionId) -> bool {
        self.settled
            .lock()
            .map(|mut settled| settled.insert(session))
            .unwrap_or(false)
    }

    /// Returns whether `session` has settled.
    #[must_use]
    pub fn is_settled(&self, session: SessionId) -> bool {
        self.settled
            .lock()
            .is_ok_and(|settled| settled.contains(&session))
    }
}

/// Holds the join handles of sessions dispatched by the controller.
#[derive(Debug, Default)]
pub struct SessionTracker {
    handles: Mutex<Vec<JoinHandle<SessionReport>>>,
}

impl SessionTracker {
    /// Tracks `handle`, dropping handles of sessions that already finished.
    pub fn track(&self, handle: JoinHandle<SessionReport>) {
        if let Ok(mut handles) = self.handles.lock() {
            handles.retain(|existing| !existing.is_finished());
            handles.push(handle);
        }
    }

    /// Returns how many tracked sessions are still running.
    #[must_use]
    pub fn active(&self) -> usize {
        self.handles.lock().map_or(0, |handles| {
            handles.iter().filter(|handle| !handle.is_finished()).count()
        })
    }

    /// Waits for every tracked session and returns their reports.
    pub async fn wait_all(&self) -> Vec<SessionReport> {
        let pending: Vec<_> = self
            .handles
            .lock()
            .map(|mut handles| handles.drain(..).collect())
            .unwrap_or_default();
        let mut reports = Vec::with_capacity(pending.len());
        for handle in pending {
            match handle.await {
                Ok(report) => reports.push(report),
                Err(err) => tracing::error!(error = %err, "session task panicked or was aborted"),
            }
        }
        reports
    }
}
