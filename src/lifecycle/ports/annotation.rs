//! Repository canvas annotation port.

use crate::lifecycle::domain::{CardColour, Marker};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for annotation calls.
pub type AnnotationResult<T> = Result<T, AnnotationError>;

/// Records task outcomes on per-repository canvases.
#[async_trait]
pub trait AnnotationStore: Send + Sync {
    /// Colours the card whose text mentions `title` and optionally appends
    /// `note` to it.
    ///
    /// # Errors
    ///
    /// Returns [`AnnotationError`] when the repository or card is unknown or
    /// the canvas cannot be updated.
    async fn annotate(
        &self,
        repository: &str,
        title: &str,
        marker: Marker,
        note: Option<&str>,
    ) -> AnnotationResult<()>;

    /// Adds a new card to the repository canvas.
    ///
    /// # Errors
    ///
    /// Returns [`AnnotationError`] when the repository is unknown or the
    /// canvas cannot be updated.
    async fn add_card(
        &self,
        repository: &str,
        text: &str,
        colour: CardColour,
    ) -> AnnotationResult<()>;
}

/// Errors returned by annotation stores. Callers treat them as non-fatal.
#[derive(Debug, Clone, Error)]
pub enum AnnotationError {
    /// No canvas is configured for the repository.
    #[error("no canvas configured for repository '{0}'")]
    UnknownRepository(String),
    /// No card on the canvas mentions the title.
    #[error("no card titled '{title}' on the {repository} canvas")]
    TitleNotFound {
        /// Repository key.
        repository: String,
        /// Title searched for.
        title: String,
    },
    /// The canvas document is not valid JSON canvas.
    #[error("malformed canvas: {0}")]
    Format(String),
    /// Reading or writing the canvas failed.
    #[error("canvas persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl AnnotationError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
