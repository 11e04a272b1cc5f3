//! Port contracts for the automation capabilities driven by sessions.

pub mod annotation;
pub mod capability;
pub mod prompt;
pub mod timer;

pub use annotation::{AnnotationError, AnnotationResult, AnnotationStore};
pub use capability::{CapabilityError, CapabilityResult};
pub use prompt::Prompt;
pub use timer::SessionTimer;
