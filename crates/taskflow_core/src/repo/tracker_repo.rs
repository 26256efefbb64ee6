//! In-memory task/habit repository backed by slot snapshots.
//!
//! # Responsibility
//! - Own the task and habit collections for one session.
//! - Apply user commands and derive positions and streaks.
//! - Persist the affected collection after every mutation.
//!
//! # Invariants
//! - In-memory state is authoritative; a failed save never rolls it back.
//! - Commands referencing a missing id are no-ops and skip persistence.
//! - New entities take `position = collection length`.
//! - `streak` is only written by `toggle_habit_today`.

use crate::clock::Clock;
use crate::config::{StreakPolicy, TrackerConfig};
use crate::model::habit::{Habit, HabitColor, HabitId, HabitPatch};
use crate::model::icon::Icon;
use crate::model::task::{Task, TaskId, TaskPatch};
use crate::service::streak::{compute_streak, is_completed_on, toggle_on};
use crate::store::{KeyValueStore, SaveOutcome, SnapshotStore};
use chrono::NaiveDate;
use log::{debug, info};

/// Task and habit collections plus their persistence side effects.
pub struct TrackerRepository<S: KeyValueStore, C: Clock> {
    tasks: Vec<Task>,
    habits: Vec<Habit>,
    snapshots: SnapshotStore<S>,
    clock: C,
    streak_policy: StreakPolicy,
    last_save: Option<SaveOutcome>,
}

impl<S: KeyValueStore, C: Clock> TrackerRepository<S, C> {
    /// Loads both slots from `store`; corrupted slots start empty.
    pub fn load(store: S, clock: C, config: &TrackerConfig) -> Self {
        let snapshots = SnapshotStore::new(store, config);
        let tasks = snapshots.load_tasks();
        let habits = snapshots.load_habits();
        info!(
            "event=tracker_load module=repo status=ok tasks={} habits={}",
            tasks.len(),
            habits.len()
        );
        Self {
            tasks,
            habits,
            snapshots,
            clock,
            streak_policy: config.streak_policy,
            last_save: None,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn habits(&self) -> &[Habit] {
        &self.habits
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn habit(&self, id: HabitId) -> Option<&Habit> {
        self.habits.iter().find(|habit| habit.id == id)
    }

    /// Current date according to the injected clock.
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Outcome of the most recent save, `None` before the first mutation.
    pub fn last_save_outcome(&self) -> Option<SaveOutcome> {
        self.last_save
    }

    pub fn snapshots(&self) -> &SnapshotStore<S> {
        &self.snapshots
    }

    /// Appends a new incomplete task.
    ///
    /// `title` is expected to be trimmed and non-empty; the caller rejects
    /// blank input.
    pub fn add_task(
        &mut self,
        title: impl Into<String>,
        icon: Option<Icon>,
        due_date: Option<NaiveDate>,
    ) -> Task {
        let task = Task::new(
            title,
            icon,
            due_date,
            next_position(self.tasks.len()),
            self.clock.now(),
        );
        self.tasks.push(task.clone());
        info!(
            "event=task_add module=repo status=ok position={} dated={}",
            task.position,
            task.due_date.is_some()
        );
        self.persist_tasks();
        task
    }

    /// Merges `patch` into the task with `id`.
    pub fn update_task(&mut self, id: TaskId, patch: TaskPatch) {
        let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) else {
            log_noop("task_update", id);
            return;
        };
        task.apply(patch);
        self.persist_tasks();
    }

    /// Removes the task with `id`. Remaining positions are not renumbered.
    pub fn delete_task(&mut self, id: TaskId) {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        if self.tasks.len() == before {
            log_noop("task_delete", id);
            return;
        }
        self.persist_tasks();
    }

    /// Flips the completed flag of the task with `id`.
    pub fn toggle_task(&mut self, id: TaskId) {
        let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) else {
            log_noop("task_toggle", id);
            return;
        };
        task.completed = !task.completed;
        self.persist_tasks();
    }

    /// Replaces the task collection with `new_order`, positions set to index.
    pub fn reorder_tasks(&mut self, new_order: Vec<Task>) {
        self.tasks = new_order;
        for (index, task) in self.tasks.iter_mut().enumerate() {
            task.position = next_position(index);
        }
        debug!(
            "event=task_reorder module=repo status=ok count={}",
            self.tasks.len()
        );
        self.persist_tasks();
    }

    /// Appends a new habit with no completions and a zero streak.
    pub fn add_habit(&mut self, title: impl Into<String>, icon: Icon, color: HabitColor) -> Habit {
        let habit = Habit::new(
            title,
            icon,
            color,
            next_position(self.habits.len()),
            self.clock.now(),
        );
        self.habits.push(habit.clone());
        info!(
            "event=habit_add module=repo status=ok position={} color={}",
            habit.position,
            habit.color.as_str()
        );
        self.persist_habits();
        habit
    }

    /// Merges `patch` into the habit with `id`.
    pub fn update_habit(&mut self, id: HabitId, patch: HabitPatch) {
        let Some(habit) = self.habits.iter_mut().find(|habit| habit.id == id) else {
            log_noop("habit_update", id);
            return;
        };
        habit.apply(patch);
        self.persist_habits();
    }

    /// Removes the habit with `id` together with its completions.
    pub fn delete_habit(&mut self, id: HabitId) {
        let before = self.habits.len();
        self.habits.retain(|habit| habit.id != id);
        if self.habits.len() == before {
            log_noop("habit_delete", id);
            return;
        }
        self.persist_habits();
    }

    /// Toggles today's completion for the habit with `id` and recomputes its streak.
    pub fn toggle_habit_today(&mut self, id: HabitId) {
        let today = self.clock.today();
        let policy = self.streak_policy;
        let Some(habit) = self.habits.iter_mut().find(|habit| habit.id == id) else {
            log_noop("habit_toggle", id);
            return;
        };
        toggle_on(&mut habit.completions, today);
        habit.streak = compute_streak(&habit.completions, today, policy);
        info!(
            "event=habit_toggle module=repo status=ok completed_today={} streak={}",
            is_completed_on(&habit.completions, today),
            habit.streak
        );
        self.persist_habits();
    }

    /// Replaces the habit collection with `new_order`, positions set to index.
    pub fn reorder_habits(&mut self, new_order: Vec<Habit>) {
        self.habits = new_order;
        for (index, habit) in self.habits.iter_mut().enumerate() {
            habit.position = next_position(index);
        }
        debug!(
            "event=habit_reorder module=repo status=ok count={}",
            self.habits.len()
        );
        self.persist_habits();
    }

    /// Returns whether `habit` has a completed record for today.
    pub fn is_habit_completed_today(&self, habit: &Habit) -> bool {
        is_completed_on(&habit.completions, self.clock.today())
    }

    fn persist_tasks(&mut self) {
        self.last_save = Some(self.snapshots.save_tasks(&self.tasks));
    }

    fn persist_habits(&mut self) {
        self.last_save = Some(self.snapshots.save_habits(&self.habits));
    }
}

fn next_position(len: usize) -> i64 {
    i64::try_from(len).unwrap_or(i64::MAX)
}

fn log_noop(event: &str, id: uuid::Uuid) {
    debug!("event={event} module=repo status=noop reason=not_found id={id}");
}
