//! Structured form of the `<n>P <repo>$<title> (<status>)` task body.

use super::{DurationUnits, ParseError, TaskStatus};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator between the repository and the title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Separator {
    /// `repo$title`, the canonical form.
    Dollar,
    /// `repo:title`, accepted for hand-written entries.
    Colon,
}

impl Separator {
    /// Returns the separator character.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::Dollar => '$',
            Self::Colon => ':',
        }
    }
}

/// Trailing status group as written, kept so encoding is lossless.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
struct StatusSuffix {
    label: String,
    full_width: bool,
    gap: String,
}

impl StatusSuffix {
    fn canonical(label: &str) -> Self {
        Self {
            label: label.to_owned(),
            full_width: false,
            gap: " ".to_owned(),
        }
    }
}

/// Parsed task body without the `A!` action prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskDescriptor {
    duration: DurationUnits,
    repository: String,
    separator: Separator,
    title: String,
    status: TaskStatus,
    suffix: Option<StatusSuffix>,
}

impl TaskDescriptor {
    /// Builds a descriptor in canonical form.
    #[must_use]
    pub fn new(
        duration: DurationUnits,
        repository: impl Into<String>,
        title: impl Into<String>,
        status: TaskStatus,
    ) -> Self {
        Self {
            duration,
            repository: repository.into(),
            separator: Separator::Dollar,
            title: title.into(),
            status,
            suffix: status.label().map(StatusSuffix::canonical),
        }
    }

    /// Parses a task body such as `2P repoA$Fix bug (待办)`.
    ///
    /// A malformed duration segment does not fail the parse: the default
    /// duration is used and a warning is logged.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] when the body has no space, no separator, or an
    /// empty repository segment.
    pub fn parse(body: &str) -> Result<Self, ParseError> {
        let trimmed = body.trim();
        let (duration_token, rest) = trimmed
            .split_once(' ')
            .ok_or_else(|| ParseError::MissingSpace(trimmed.to_owned()))?;

        let (before_status, suffix) = split_status(rest.trim_start());
        let (repository, separator, title) = split_repository(before_status)
            .ok_or_else(|| ParseError::MissingSeparator(trimmed.to_owned()))?;
        if repository.trim().is_empty() {
            return Err(ParseError::EmptyRepository(trimmed.to_owned()));
        }

        let duration = parse_duration(duration_token).unwrap_or_else(|err| {
            tracing::warn!(text = trimmed, error = %err, "falling back to default duration");
            DurationUnits::default()
        });
        let status = suffix
            .as_ref()
            .map_or(TaskStatus::Done, |group| TaskStatus::from_label(&group.label));

        Ok(Self {
            duration,
            repository: repository.to_owned(),
            separator,
            title: title.to_owned(),
            status,
            suffix,
        })
    }

    /// Returns the duration budget.
    #[must_use]
    pub const fn duration(&self) -> DurationUnits {
        self.duration
    }

    /// Returns the repository key.
    #[must_use]
    pub fn repository(&self) -> &str {
        &self.repository
    }

    /// Returns the free-text title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the separator used between repository and title.
    #[must_use]
    pub const fn separator(&self) -> Separator {
        self.separator
    }

    /// Returns the derived status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the raw text inside the trailing status group, if any.
    #[must_use]
    pub fn status_label(&self) -> Option<&str> {
        self.suffix.as_ref().map(|group| group.label.as_str())
    }

    /// Returns a copy carrying the canonical marker for `status`.
    ///
    /// Done removes the marker entirely.
    #[must_use]
    pub fn with_status(&self, status: TaskStatus) -> Self {
        let suffix = status.label().map(|label| {
            self.suffix.as_ref().map_or_else(
                || StatusSuffix::canonical(label),
                |previous| StatusSuffix {
                    label: label.to_owned(),
                    full_width: previous.full_width,
                    gap: previous.gap.clone(),
                },
            )
        });
        Self {
            status,
            suffix,
            ..self.clone()
        }
    }

    /// Renders `<repo>$<title> (<status>)`, the form shown to the operator.
    #[must_use]
    pub fn headline(&self) -> String {
        let mut out = format!(
            "{}{}{}",
            self.repository,
            self.separator.as_char(),
            self.title
        );
        if let Some(group) = &self.suffix {
            push_suffix(&mut out, group);
        }
        out
    }
}

impl fmt::Display for TaskDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.duration, self.headline())
    }
}

fn push_suffix(out: &mut String, group: &StatusSuffix) {
    let (open, close) = if group.full_width {
        ('（', '）')
    } else {
        ('(', ')')
    };
    out.push_str(&group.gap);
    out.push(open);
    out.push_str(&group.label);
    out.push(close);
}

fn parse_duration(token: &str) -> Result<DurationUnits, ParseError> {
    token
        .strip_suffix('P')
        .and_then(|digits| digits.parse::<u32>().ok())
        .map(DurationUnits::new)
        .ok_or_else(|| ParseError::MalformedDuration(token.to_owned()))
}

fn split_status(text: &str) -> (&str, Option<StatusSuffix>) {
    let trimmed = text.trim_end();
    for (open, close, full_width) in [('(', ')', false), ('（', '）', true)] {
        let Some(without_close) = trimmed.strip_suffix(close) else {
            continue;
        };
        if let Some((before, label)) = without_close.rsplit_once(open) {
            let head = before.trim_end();
            let suffix = StatusSuffix {
                label: label.to_owned(),
                full_width,
                gap: before.get(head.len()..).unwrap_or_default().to_owned(),
            };
            return (head, Some(suffix));
        }
    }
    (trimmed, None)
}

fn split_repository(text: &str) -> Option<(&str, Separator, &str)> {
    if let Some((repository, title)) = text.split_once('$') {
        return Some((repository, Separator::Dollar, title));
    }
    text.split_once(':')
        .map(|(repository, title)| (repository, Separator::Colon, title))
}
