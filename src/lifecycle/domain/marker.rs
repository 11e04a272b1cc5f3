//! Annotation markers and canvas colours.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Canvas colour index as used by JSON canvas documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardColour(u8);

impl CardColour {
    /// Colour `0`, the neutral card.
    pub const NEUTRAL: Self = Self(0);
    /// Colour `1`.
    pub const RED: Self = Self(1);
    /// Colour `2`.
    pub const ORANGE: Self = Self(2);
    /// Colour `3`.
    pub const YELLOW: Self = Self(3);
    /// Colour `4`.
    pub const GREEN: Self = Self(4);

    /// Returns the colour index.
    #[must_use]
    pub const fn index(self) -> u8 {
        self.0
    }
}

impl fmt::Display for CardColour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outcome of the resolution follow-up, recorded on the repository canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Marker {
    /// The task is fully resolved.
    Resolved,
    /// The task goes back to the ready pool for another session.
    Revisit,
    /// The task stays done but the underlying question is still open.
    StillOpen,
}

impl Marker {
    /// Returns the canvas colour for the marker.
    #[must_use]
    pub const fn colour(self) -> CardColour {
        match self {
            Self::Resolved => CardColour::GREEN,
            Self::Revisit => CardColour::RED,
            Self::StillOpen => CardColour::NEUTRAL,
        }
    }

    /// Returns the marker name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Resolved => "resolved",
            Self::Revisit => "revisit",
            Self::StillOpen => "still_open",
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
