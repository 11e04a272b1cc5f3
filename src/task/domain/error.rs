//! Error types for task-string parsing.

use thiserror::Error;

/// Errors returned while parsing the compact task-string grammar.
///
/// Parsing fails soft at the codec boundary: callers receive a note item
/// instead of an error, and malformed durations fall back to the default.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    /// The text has no space between the duration and the body.
    #[error("task text '{0}' has no space after the duration segment")]
    MissingSpace(String),

    /// The body has neither a `$` nor a `:` separator.
    #[error("task text '{0}' has no repository separator ('$' or ':')")]
    MissingSeparator(String),

    /// The repository segment before the separator is empty.
    #[error("task text '{0}' has an empty repository segment")]
    EmptyRepository(String),

    /// The duration segment is not `<digits>P`.
    #[error("malformed duration segment '{0}', expected <digits>P")]
    MalformedDuration(String),
}
