//! Task and note items plus the string codec at the storage edge.

use super::{DurationUnits, TaskDescriptor, TaskStatus};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix marking an actionable, timed item.
pub const ACTION_PREFIX: &str = "A!";

/// An actionable unit of work decoded from its stored text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskItem {
    action_flag: bool,
    descriptor: TaskDescriptor,
    raw_text: String,
}

impl TaskItem {
    /// Wraps a descriptor, optionally marking it actionable.
    ///
    /// The stored text is the canonical rendering of the parts.
    #[must_use]
    pub fn new(descriptor: TaskDescriptor, action_flag: bool) -> Self {
        let prefix = if action_flag { ACTION_PREFIX } else { "" };
        let raw_text = format!("{prefix}{descriptor}");
        Self {
            action_flag,
            descriptor,
            raw_text,
        }
    }

    fn decoded(descriptor: TaskDescriptor, raw_text: &str) -> Self {
        Self {
            action_flag: true,
            descriptor,
            raw_text: raw_text.to_owned(),
        }
    }

    /// Returns whether the item carries the `A!` prefix.
    #[must_use]
    pub const fn action_flag(&self) -> bool {
        self.action_flag
    }

    /// Returns the parsed body.
    #[must_use]
    pub const fn descriptor(&self) -> &TaskDescriptor {
        &self.descriptor
    }

    /// Returns the duration budget.
    #[must_use]
    pub const fn duration_units(&self) -> DurationUnits {
        self.descriptor.duration()
    }

    /// Returns the repository key.
    #[must_use]
    pub fn repository(&self) -> &str {
        self.descriptor.repository()
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        self.descriptor.title()
    }

    /// Returns the derived status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.descriptor.status()
    }

    /// Returns the text exactly as it is stored on the board.
    #[must_use]
    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    /// Returns a copy with the status marker rewritten.
    #[must_use]
    pub fn with_status(&self, status: TaskStatus) -> Self {
        Self::new(self.descriptor.with_status(status), self.action_flag)
    }

    /// Returns a copy with the action prefix set or cleared.
    #[must_use]
    pub fn with_action(&self, action_flag: bool) -> Self {
        Self::new(self.descriptor.clone(), action_flag)
    }

    /// Returns the form stored in the ready and done pools.
    #[must_use]
    pub fn without_action(&self) -> Self {
        self.with_action(false)
    }

    /// Returns `<repo>$<title> (<status>)`, the current-task message.
    #[must_use]
    pub fn display_message(&self) -> String {
        self.descriptor.headline()
    }

    /// Returns `<repo>--<title>`, the name given to timed sessions.
    #[must_use]
    pub fn session_name(&self) -> String {
        format!("{}--{}", self.repository(), self.title())
    }
}

impl fmt::Display for TaskItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw_text)
    }
}

/// Non-actionable text kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteItem(String);

impl NoteItem {
    /// Wraps raw note text.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the stored text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NoteItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of decoding stored text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Decoded {
    /// Actionable task.
    Task(TaskItem),
    /// Opaque note.
    Note(NoteItem),
}

impl Decoded {
    /// Returns the task when the text was actionable.
    #[must_use]
    pub const fn as_task(&self) -> Option<&TaskItem> {
        match self {
            Self::Task(task) => Some(task),
            Self::Note(_) => None,
        }
    }

    /// Returns the message shown for the current task.
    #[must_use]
    pub fn display_message(&self) -> String {
        match self {
            Self::Task(task) => task.display_message(),
            Self::Note(note) => note.as_str().to_owned(),
        }
    }
}

/// Decodes stored text into a task or, failing soft, a note.
///
/// Text without the `A!` prefix, or whose body lacks a space and a
/// repository separator, is a note.
#[must_use]
pub fn decode(raw: &str) -> Decoded {
    let Some(body) = raw.trim().strip_prefix(ACTION_PREFIX) else {
        return Decoded::Note(NoteItem::new(raw));
    };
    match TaskDescriptor::parse(body) {
        Ok(descriptor) => Decoded::Task(TaskItem::decoded(descriptor, raw)),
        Err(err) => {
            tracing::debug!(text = raw, error = %err, "treating task text as a note");
            Decoded::Note(NoteItem::new(raw))
        }
    }
}

/// Encodes a task back into its stored text.
///
/// Decoded items keep their text byte for byte; items built or rewritten in
/// code get the canonical form.
#[must_use]
pub fn encode(item: &TaskItem) -> String {
    item.raw_text.clone()
}

/// Strips the `A!` prefix from stored text if present.
#[must_use]
pub fn strip_action_prefix(raw: &str) -> &str {
    let trimmed = raw.trim();
    trimmed.strip_prefix(ACTION_PREFIX).unwrap_or(trimmed)
}
