//! Readiness criteria gating backlog to ready promotion.

use crate::kanban::domain::tags;
use chrono::NaiveDate;

/// Decides whether a backlog item may be promoted to the ready pool.
pub trait ReadinessPredicate: Send + Sync {
    /// Returns `true` when `item` is ready on `today`.
    fn is_ready(&self, item: &str, today: NaiveDate) -> bool;
}

/// Ready once the item's `@{YYYY-MM-DD}` date has been reached.
///
/// Undated items stay in the backlog.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScheduledDateReadiness;

impl ReadinessPredicate for ScheduledDateReadiness {
    fn is_ready(&self, item: &str, today: NaiveDate) -> bool {
        tags::scheduled_date(item).is_some_and(|date| date <= today)
    }
}

impl<F> ReadinessPredicate for F
where
    F: Fn(&str, NaiveDate) -> bool + Send + Sync,
{
    fn is_ready(&self, item: &str, today: NaiveDate) -> bool {
        self(item, today)
    }
}
