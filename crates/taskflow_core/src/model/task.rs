//! Task domain model.
//!
//! # Invariants
//! - `id` is stable and never reused for another task.
//! - `due_date` is a calendar date without time component.
//! - `position` orders tasks that share the same completion status.

use super::icon::Icon;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable task identifier.
pub type TaskId = Uuid;

/// One-off actionable item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<Icon>,
    /// Serialized as `YYYY-MM-DD`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub position: i64,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Creates an incomplete task with a generated stable ID.
    pub fn new(
        title: impl Into<String>,
        icon: Option<Icon>,
        due_date: Option<NaiveDate>,
        position: i64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            completed: false,
            icon,
            due_date,
            position,
            created_at,
        }
    }

    /// Merges every field set in `patch` into this task.
    pub fn apply(&mut self, patch: TaskPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
        if let Some(icon) = patch.icon {
            self.icon = icon;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }
        if let Some(position) = patch.position {
            self.position = position;
        }
    }
}

/// Partial update for [`Task`].
///
/// Outer `None` leaves a field untouched; `Some(None)` clears an optional field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub completed: Option<bool>,
    pub icon: Option<Option<Icon>>,
    pub due_date: Option<Option<NaiveDate>>,
    pub position: Option<i64>,
}
