//! Quick notes dropped onto a repository canvas.

use super::CardColour;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Category of a tip, which picks its card colour.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TipKind {
    /// `bug`: colour `3`.
    Bug,
    /// `prefer`: colour `2`.
    Prefer,
    /// Any other label: colour `0`.
    Other(String),
}

impl TipKind {
    fn from_label(label: &str) -> Self {
        match label {
            "bug" => Self::Bug,
            "prefer" => Self::Prefer,
            other => Self::Other(other.to_owned()),
        }
    }

    /// Returns the label as written.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Bug => "bug",
            Self::Prefer => "prefer",
            Self::Other(label) => label,
        }
    }

    /// Returns the card colour for this kind.
    #[must_use]
    pub const fn colour(&self) -> CardColour {
        match self {
            Self::Bug => CardColour::YELLOW,
            Self::Prefer => CardColour::ORANGE,
            Self::Other(_) => CardColour::NEUTRAL,
        }
    }
}

/// A parsed `<type>:<repo>:<question>:<detail>` tip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tip {
    kind: TipKind,
    repository: String,
    question: String,
    detail: String,
}

/// Error returned when tip text does not have four fields.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("tip '{0}' must look like <type>:<repo>:<question>:<detail>")]
pub struct TipError(pub String);

impl Tip {
    /// Parses tip text. The detail keeps any further colons.
    ///
    /// # Errors
    ///
    /// Returns [`TipError`] when fewer than four fields are present or the
    /// repository is blank.
    pub fn parse(text: &str) -> Result<Self, TipError> {
        let mut fields = text.trim().splitn(4, ':');
        let (Some(kind), Some(repository), Some(question), Some(detail)) =
            (fields.next(), fields.next(), fields.next(), fields.next())
        else {
            return Err(TipError(text.to_owned()));
        };
        if repository.trim().is_empty() {
            return Err(TipError(text.to_owned()));
        }
        Ok(Self {
            kind: TipKind::from_label(kind.trim()),
            repository: repository.trim().to_owned(),
            question: question.to_owned(),
            detail: detail.to_owned(),
        })
    }

    /// Returns the tip category.
    #[must_use]
    pub const fn kind(&self) -> &TipKind {
        &self.kind
    }

    /// Returns the repository key.
    #[must_use]
    pub fn repository(&self) -> &str {
        &self.repository
    }

    /// Returns the card text: `<type>:<question>` then the detail line.
    #[must_use]
    pub fn card_text(&self) -> String {
        format!("{}:{}\n{}", self.kind.label(), self.question, self.detail)
    }
}

impl fmt::Display for Tip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}",
            self.kind.label(),
            self.repository,
            self.question,
            self.detail
        )
    }
}
