//! Inline tags recognised in board item text.
//!
//! Dates use the kanban plugin's `@{YYYY-MM-DD}` form; priorities use a
//! `#p<digit>` hashtag where lower numbers are more urgent.

use chrono::NaiveDate;

const DATE_OPEN: &str = "@{";
const DATE_FORMAT: &str = "%Y-%m-%d";
const PRIORITY_PREFIX: &str = "#p";

/// Returns the first `@{YYYY-MM-DD}` date in `text`.
#[must_use]
pub fn scheduled_date(text: &str) -> Option<NaiveDate> {
    let (_, rest) = text.split_once(DATE_OPEN)?;
    let (date, _) = rest.split_once('}')?;
    NaiveDate::parse_from_str(date.trim(), DATE_FORMAT).ok()
}

/// Returns the first `#p<n>` priority in `text`.
#[must_use]
pub fn priority(text: &str) -> Option<u8> {
    text.split_whitespace().find_map(|word| {
        word.strip_prefix(PRIORITY_PREFIX)
            .and_then(|digits| digits.parse::<u8>().ok())
    })
}
