//! Display icon model shared by tasks and habits.
//!
//! # Invariants
//! - An icon is either an emoji code or an embedded image payload, never both.
//! - Image payloads arrive pre-compressed from the icon ingestion collaborator.

use serde::{Deserialize, Serialize};

/// Emoji used when no icon was chosen or an image icon had to be dropped.
pub const DEFAULT_EMOJI: &str = "💼";

/// Mask applied when rendering an image icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IconShape {
    Square,
    #[default]
    Circle,
}

impl IconShape {
    /// Parses the collaborator-facing shape tag (`square|circle`).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "square" => Some(Self::Square),
            "circle" => Some(Self::Circle),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Square => "square",
            Self::Circle => "circle",
        }
    }
}

/// Display icon for a task or habit.
///
/// Serialized as `{"kind":"emoji","code":…}` or
/// `{"kind":"image","payload":…,"shape":…}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Icon {
    Emoji { code: String },
    Image { payload: String, shape: IconShape },
}

impl Icon {
    pub fn emoji(code: impl Into<String>) -> Self {
        Self::Emoji { code: code.into() }
    }

    pub fn image(payload: impl Into<String>, shape: IconShape) -> Self {
        Self::Image {
            payload: payload.into(),
            shape,
        }
    }

    /// Builds an icon from loosely-shaped collaborator input.
    ///
    /// A non-empty image payload wins over the emoji; an unknown shape tag
    /// falls back to the default mask. Blank inputs yield `None`.
    pub fn from_parts(
        emoji: Option<&str>,
        payload: Option<&str>,
        shape: Option<&str>,
    ) -> Option<Self> {
        if let Some(payload) = payload.map(str::trim).filter(|value| !value.is_empty()) {
            let shape = shape.and_then(IconShape::parse).unwrap_or_default();
            return Some(Self::image(payload, shape));
        }
        emoji
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(Self::emoji)
    }

    /// Size of the embedded image payload in characters, or 0 for emoji.
    pub fn payload_chars(&self) -> usize {
        match self {
            Self::Emoji { .. } => 0,
            Self::Image { payload, .. } => payload.chars().count(),
        }
    }

    /// Returns whether this is an image icon whose payload exceeds `limit`.
    pub fn is_oversized(&self, limit: usize) -> bool {
        self.payload_chars() > limit
    }
}

impl Default for Icon {
    fn default() -> Self {
        Self::emoji(DEFAULT_EMOJI)
    }
}
