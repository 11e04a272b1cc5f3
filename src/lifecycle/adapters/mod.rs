//! Adapter implementations for the lifecycle capability ports.

pub mod canvas;
pub mod checkpoint;
pub mod desktop;
pub mod memory;

pub use canvas::{Canvas, CanvasAnnotationStore};
pub use checkpoint::PromptCheckpoint;
pub use memory::{InMemoryAnnotationStore, RecordingTimer, ScriptedPrompt};
