//! Task status markers and duration units.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status literal marking a task that has not been started.
pub const PENDING_LABEL: &str = "待办";

/// Status literal marking a task whose session is underway.
pub const RUNNING_LABEL: &str = "进行中";

/// Minutes represented by one duration unit (`1P`).
pub const MINUTES_PER_UNIT: u32 = 20;

/// Duration used when the `<digits>P` segment is malformed.
pub const DEFAULT_DURATION_UNITS: u32 = 1;

/// Task status derived from the trailing marker text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Marked `(待办)`.
    Pending,
    /// Marked `(进行中)`.
    Running,
    /// No marker, or a marker that is neither pending nor running.
    Done,
}

impl TaskStatus {
    /// Classifies the inner text of a status suffix.
    ///
    /// `进行中` takes precedence over `待办` when both substrings occur.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        if label.contains(RUNNING_LABEL) {
            Self::Running
        } else if label.contains(PENDING_LABEL) {
            Self::Pending
        } else {
            Self::Done
        }
    }

    /// Returns the canonical marker literal, or `None` for done.
    #[must_use]
    pub const fn label(self) -> Option<&'static str> {
        match self {
            Self::Pending => Some(PENDING_LABEL),
            Self::Running => Some(RUNNING_LABEL),
            Self::Done => None,
        }
    }

    /// Returns the storage name of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Number of 20-minute units a task is budgeted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DurationUnits(u32);

impl DurationUnits {
    /// Wraps a raw unit count.
    #[must_use]
    pub const fn new(units: u32) -> Self {
        Self(units)
    }

    /// Returns the unit count.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Returns the budget in minutes.
    #[must_use]
    pub const fn minutes(self) -> u32 {
        self.0.saturating_mul(MINUTES_PER_UNIT)
    }
}

impl Default for DurationUnits {
    fn default() -> Self {
        Self(DEFAULT_DURATION_UNITS)
    }
}

impl fmt::Display for DurationUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}P", self.0)
    }
}
