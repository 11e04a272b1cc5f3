//! Kanban pools.

use super::ParsePoolError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Pipeline stage an item sits in.
///
/// The derived ordering follows the pipeline: backlog, ready, running, done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pool {
    /// `酱油池`: miscellaneous backlog.
    Backlog,
    /// `就绪池`: ready to be scheduled.
    Ready,
    /// `执行池`: the running slot consumed by "receive current task".
    Running,
    /// `完成池`: finished work.
    Done,
}

impl Pool {
    /// Every pool in pipeline order.
    pub const ALL: [Self; 4] = [Self::Backlog, Self::Ready, Self::Running, Self::Done];

    /// Returns the board heading that names this pool.
    #[must_use]
    pub const fn heading(self) -> &'static str {
        match self {
            Self::Backlog => "酱油池",
            Self::Ready => "就绪池",
            Self::Running => "执行池",
            Self::Done => "完成池",
        }
    }

    /// Returns the English storage name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Backlog => "backlog",
            Self::Ready => "ready",
            Self::Running => "running",
            Self::Done => "done",
        }
    }
}

impl TryFrom<&str> for Pool {
    type Error = ParsePoolError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|pool| pool.heading() == trimmed || pool.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParsePoolError(value.to_owned()))
    }
}

impl fmt::Display for Pool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.heading())
    }
}
