//! Display-ready projections of task and habit collections.
//!
//! # Invariants
//! - Undated tasks are visible only on `today`; dated tasks only on their day.
//! - Incomplete tasks sort before completed ones, then by `position`.
//! - Habits sort by `position` only.

use crate::model::habit::Habit;
use crate::model::task::Task;
use crate::service::streak::is_completed_on;
use chrono::{Days, NaiveDate};

/// Number of days shown in a habit completion grid (two rows of seven).
pub const GRID_DAYS: u64 = 14;

/// One cell of a habit completion grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridDay {
    pub date: NaiveDate,
    pub completed: bool,
}

/// Returns whether `task` belongs on the list for `selected`.
pub fn is_task_visible_on(task: &Task, selected: NaiveDate, today: NaiveDate) -> bool {
    match task.due_date {
        Some(due) => due == selected,
        None => selected == today,
    }
}

/// Sorts tasks for display: incomplete first, then by position.
///
/// Equal keys keep their relative order.
pub fn sort_tasks_for_display(tasks: &mut [Task]) {
    tasks.sort_by_key(|task| (task.completed, task.position));
}

/// Filters tasks for `selected` and returns them in display order.
pub fn task_list_view(tasks: &[Task], selected: NaiveDate, today: NaiveDate) -> Vec<Task> {
    let mut visible = tasks
        .iter()
        .filter(|task| is_task_visible_on(task, selected, today))
        .cloned()
        .collect::<Vec<_>>();
    sort_tasks_for_display(&mut visible);
    visible
}

/// Returns habits in display order.
pub fn habit_list_view(habits: &[Habit]) -> Vec<Habit> {
    let mut sorted = habits.to_vec();
    sorted.sort_by_key(|habit| habit.position);
    sorted
}

/// Last [`GRID_DAYS`] days ending at `today`, oldest first.
pub fn completion_grid(habit: &Habit, today: NaiveDate) -> Vec<GridDay> {
    (0..GRID_DAYS)
        .rev()
        .filter_map(|offset| today.checked_sub_days(Days::new(offset)))
        .map(|date| GridDay {
            date,
            completed: is_completed_on(&habit.completions, date),
        })
        .collect()
}
