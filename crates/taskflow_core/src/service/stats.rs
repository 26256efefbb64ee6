//! Aggregate statistics over the tracker collections.

use crate::model::habit::Habit;
use crate::model::task::Task;
use crate::service::streak::is_completed_on;
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrackerStats {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub incomplete_tasks: usize,
    /// Tasks due strictly after today.
    pub later_tasks: usize,
    /// Completed share of all tasks as a rounded integer percent.
    pub completion_rate_percent: u32,
    pub total_habits: usize,
    pub habits_completed_today: usize,
    /// Highest stored streak across habits.
    pub best_streak: u32,
}

pub fn tracker_stats(tasks: &[Task], habits: &[Habit], today: NaiveDate) -> TrackerStats {
    let total_tasks = tasks.len();
    let completed_tasks = tasks.iter().filter(|task| task.completed).count();
    let later_tasks = tasks
        .iter()
        .filter(|task| task.due_date.is_some_and(|due| due > today))
        .count();

    TrackerStats {
        total_tasks,
        completed_tasks,
        incomplete_tasks: total_tasks - completed_tasks,
        later_tasks,
        completion_rate_percent: rounded_percent(completed_tasks, total_tasks),
        total_habits: habits.len(),
        habits_completed_today: habits
            .iter()
            .filter(|habit| is_completed_on(&habit.completions, today))
            .count(),
        best_streak: habits.iter().map(|habit| habit.streak).max().unwrap_or(0),
    }
}

/// `part / whole` as a percent, rounded half up; 0 when `whole` is 0.
fn rounded_percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    let percent = (part as u64 * 200 + whole as u64) / (whole as u64 * 2);
    u32::try_from(percent).unwrap_or(u32::MAX)
}
