//! Habit domain model.
//!
//! # Invariants
//! - `streak` is derived by the streak engine and never set by callers.
//! - `completions` holds at most one record per calendar date.
//! - Completions are owned by their habit and removed with it.

use super::icon::Icon;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable habit identifier.
pub type HabitId = Uuid;

/// Fixed palette a habit can be tagged with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HabitColor {
    #[default]
    Blue,
    Green,
    Purple,
    Orange,
    Pink,
}

impl HabitColor {
    pub const ALL: [HabitColor; 5] = [
        Self::Blue,
        Self::Green,
        Self::Purple,
        Self::Orange,
        Self::Pink,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "blue" => Some(Self::Blue),
            "green" => Some(Self::Green),
            "purple" => Some(Self::Purple),
            "orange" => Some(Self::Orange),
            "pink" => Some(Self::Pink),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Purple => "purple",
            Self::Orange => "orange",
            Self::Pink => "pink",
        }
    }
}

/// One day's completion state for a habit.
///
/// A record with `completed = false` means the day was checked and then
/// unchecked, which is distinct from a day with no record at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitCompletion {
    /// Serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,
    pub completed: bool,
}

/// Recurring activity tracked by daily completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: HabitId,
    pub title: String,
    #[serde(default)]
    pub icon: Icon,
    #[serde(default)]
    pub color: HabitColor,
    #[serde(default)]
    pub streak: u32,
    #[serde(default)]
    pub completions: Vec<HabitCompletion>,
    pub position: i64,
    pub created_at: DateTime<Utc>,
}

impl Habit {
    /// Creates a habit with no completions and a zero streak.
    pub fn new(
        title: impl Into<String>,
        icon: Icon,
        color: HabitColor,
        position: i64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            icon,
            color,
            streak: 0,
            completions: Vec::new(),
            position,
            created_at,
        }
    }

    /// Merges every field set in `patch` into this habit.
    pub fn apply(&mut self, patch: HabitPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(icon) = patch.icon {
            self.icon = icon;
        }
        if let Some(color) = patch.color {
            self.color = color;
        }
        if let Some(position) = patch.position {
            self.position = position;
        }
    }

    /// Replaces an image icon above `limit` characters with the default emoji.
    ///
    /// Returns whether the icon was replaced.
    pub fn strip_oversized_icon(&mut self, limit: usize) -> bool {
        if self.icon.is_oversized(limit) {
            self.icon = Icon::default();
            return true;
        }
        false
    }
}

/// Partial update for [`Habit`].
///
/// Streak and completions are engine-owned and cannot be patched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HabitPatch {
    pub title: Option<String>,
    pub icon: Option<Icon>,
    pub color: Option<HabitColor>,
    pub position: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::{Habit, HabitColor, HabitPatch};
    use crate::model::icon::{Icon, IconShape};
    use chrono::Utc;

    #[test]
    fn color_tags_roundtrip_through_parse() {
        for color in HabitColor::ALL {
            assert_eq!(HabitColor::parse(color.as_str()), Some(color));
        }
        assert_eq!(HabitColor::parse("teal"), None);
    }

    #[test]
    fn apply_keeps_streak_and_completions() {
        let mut habit = Habit::new("read", Icon::emoji("📚"), HabitColor::Green, 0, Utc::now());
        habit.streak = 4;
        habit.apply(HabitPatch {
            title: Some("read 20 pages".to_string()),
            color: Some(HabitColor::Pink),
            ..HabitPatch::default()
        });

        assert_eq!(habit.title, "read 20 pages");
        assert_eq!(habit.color, HabitColor::Pink);
        assert_eq!(habit.streak, 4);
    }

    #[test]
    fn strip_oversized_icon_only_touches_large_images() {
        let mut habit = Habit::new(
            "stretch",
            Icon::image("x".repeat(32), IconShape::Circle),
            HabitColor::Blue,
            0,
            Utc::now(),
        );
        assert!(!habit.strip_oversized_icon(32));
        assert!(habit.strip_oversized_icon(31));
        assert_eq!(habit.icon, Icon::default());
    }
}
