//! Domain model for task sessions and their follow-up.

mod marker;
mod outcome;
mod prompt;
mod session;
mod tip;

pub use marker::{CardColour, Marker};
pub use outcome::{LifecycleOutcome, SessionReport, SessionStage, StatusView};
pub use prompt::{
    PromptContext, PromptKind, PromptReply, PromptRequest, PromptTemplate, PromptTemplates,
    TemplateError,
};
pub use session::SessionId;
pub use tip::{Tip, TipError, TipKind};
