//! Shared fixtures for unit tests.

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use mockable::Clock;

/// Clock pinned to a fixed local instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: DateTime<Local>,
}

impl FixedClock {
    /// Noon on the given date.
    pub fn on(year: i32, month: u32, day: u32) -> Self {
        Self::at(year, month, day, (12, 0, 0))
    }

    /// The given local date and time of day.
    pub fn at(year: i32, month: u32, day: u32, (hour, minute, second): (u32, u32, u32)) -> Self {
        let instant = NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|date| date.and_hms_opt(hour, minute, second))
            .expect("valid calendar date");
        let now = Local
            .from_local_datetime(&instant)
            .earliest()
            .expect("instant exists in the local zone");
        Self { now }
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.now
    }

    fn utc(&self) -> DateTime<Utc> {
        self.now.with_timezone(&Utc)
    }
}
