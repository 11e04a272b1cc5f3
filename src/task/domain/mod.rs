//! Domain model for the compact task-string protocol.
//!
//! Tasks live on the board as delimited strings such as
//! `A!2P repoA$Fix bug (待办)`. This module is the codec boundary: inside the
//! crate a task is a structured [`TaskItem`], and only the storage and wire
//! edges see the string form.

mod descriptor;
mod error;
mod item;
mod status;

pub use descriptor::{Separator, TaskDescriptor};
pub use error::ParseError;
pub use item::{
    ACTION_PREFIX, Decoded, NoteItem, TaskItem, decode, encode, strip_action_prefix,
};
pub use status::{
    DEFAULT_DURATION_UNITS, DurationUnits, MINUTES_PER_UNIT, PENDING_LABEL, RUNNING_LABEL,
    TaskStatus,
};
