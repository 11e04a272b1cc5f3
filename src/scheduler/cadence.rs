//! Weekday-and-time cadence.

use chrono::{DateTime, Datelike, Days, TimeZone, Weekday};
use serde::{Deserialize, Serialize};

const LOOKAHEAD_DAYS: u64 = 7;

/// Fires at `hour:minute` local time on each of `days`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeeklySchedule {
    /// Days the rebuild runs on.
    pub days: Vec<Weekday>,
    /// Hour of day, 0 to 23.
    pub hour: u32,
    /// Minute of hour, 0 to 59.
    pub minute: u32,
}

impl Default for WeeklySchedule {
    fn default() -> Self {
        Self {
            days: vec![
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
            ],
            hour: 9,
            minute: 40,
        }
    }
}

impl WeeklySchedule {
    /// Returns the first fire time strictly after `after`.
    ///
    /// Returns `None` when no day is selected or the time of day is invalid.
    #[must_use]
    pub fn next_fire<Tz>(&self, after: &DateTime<Tz>) -> Option<DateTime<Tz>>
    where
        Tz: TimeZone,
    {
        let start = after.date_naive();
        (0..=LOOKAHEAD_DAYS)
            .filter_map(|offset| start.checked_add_days(Days::new(offset)))
            .filter(|date| self.days.contains(&date.weekday()))
            .filter_map(|date| date.and_hms_opt(self.hour, self.minute, 0))
            .filter_map(|naive| after.timezone().from_local_datetime(&naive).earliest())
            .find(|candidate| candidate > after)
    }
}
