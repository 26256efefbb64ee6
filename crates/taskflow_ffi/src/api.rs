//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose tracker commands and view-models to Dart via FRB.
//! - Perform the caller-side input checks the core expects (trimmed,
//!   non-empty titles; well-formed dates and ids).
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - One session per process: slots are loaded on the first call and the
//!   in-memory collections stay authoritative afterwards, even when a save
//!   is dropped or degraded.
//! - Commands are serialized by the session lock.
//! - Dates cross the boundary as `YYYY-MM-DD` strings.

use chrono::NaiveDate;
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock, PoisonError};
use taskflow_core::service::date_strip::date_strip as date_strip_inner;
use taskflow_core::{
    arrange_by_ids, completion_grid, core_version as core_version_inner, habit_list_view,
    init_logging as init_logging_inner, task_list_view, tracker_stats as tracker_stats_inner,
    Clock, Habit, HabitColor, Icon, SqliteKvStore, SystemClock, Task, TaskPatch, TrackerConfig,
    TrackerRepository,
};
use uuid::Uuid;

const DB_FILE_NAME: &str = "taskflow.sqlite3";
const DB_PATH_ENV: &str = "TASKFLOW_DB_PATH";
const DATE_FORMAT: &str = "%Y-%m-%d";

static DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static SESSION: Session = Session::new();

type SessionRepo = TrackerRepository<SqliteKvStore, SystemClock>;

/// Lazily opened tracker repository shared by every FFI call.
struct Session {
    repo: Mutex<Option<SessionRepo>>,
}

impl Session {
    const fn new() -> Self {
        Self {
            repo: Mutex::new(None),
        }
    }

    /// Runs `f` on the session, opening it with `open` on first use.
    ///
    /// A failed open is not cached; the next call retries.
    fn run<T>(
        &self,
        open: impl FnOnce() -> Result<SessionRepo, String>,
        f: impl FnOnce(&mut SessionRepo) -> T,
    ) -> Result<T, String> {
        let mut slot = self.repo.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.is_none() {
            *slot = Some(open()?);
        }
        match slot.as_mut() {
            Some(repo) => Ok(f(repo)),
            None => Err("tracker session unavailable".to_string()),
        }
    }
}

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Result envelope for tracker commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    /// Whether the command was accepted.
    pub ok: bool,
    /// ID of the created or targeted item.
    pub item_id: Option<String>,
    /// Human-readable message for diagnostics/UI.
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>, item_id: Option<String>) -> Self {
        Self {
            ok: true,
            item_id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            item_id: None,
            message: message.into(),
        }
    }
}

/// Icon fields in the collaborator's flat shape.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IconView {
    pub emoji: Option<String>,
    pub custom_icon: Option<String>,
    /// `square|circle`, set only with `custom_icon`.
    pub icon_shape: Option<String>,
}

/// Task row for the list view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    pub id: String,
    pub title: String,
    pub completed: bool,
    pub icon: IconView,
    pub due_date: Option<String>,
    pub position: i64,
}

/// One cell of a habit's 14-day grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridCell {
    pub date: String,
    pub completed: bool,
}

/// Habit card for the list view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HabitItem {
    pub id: String,
    pub title: String,
    pub icon: IconView,
    /// `blue|green|purple|orange|pink`.
    pub color: String,
    pub streak: u32,
    pub completed_today: bool,
    pub grid: Vec<GridCell>,
    pub position: i64,
}

/// Task list envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskListResponse {
    pub ok: bool,
    pub items: Vec<TaskItem>,
    pub message: String,
}

/// Habit list envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HabitListResponse {
    pub ok: bool,
    pub items: Vec<HabitItem>,
    pub message: String,
}

/// Statistics page payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsView {
    pub ok: bool,
    pub total_tasks: u32,
    pub completed_tasks: u32,
    pub incomplete_tasks: u32,
    pub later_tasks: u32,
    pub completion_rate_percent: u32,
    pub total_habits: u32,
    pub habits_completed_today: u32,
    pub best_streak: u32,
    pub message: String,
}

/// One day of the date picker strip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StripDayView {
    pub date: String,
    pub is_today: bool,
    pub is_selected: bool,
}

/// Adds a task from the add-item form.
///
/// # FFI contract
/// - `title` is trimmed and must not be blank.
/// - A non-empty `custom_icon` wins over `emoji`.
/// - `due_date` must be `YYYY-MM-DD` when set.
#[flutter_rust_bridge::frb(sync)]
pub fn task_add(
    title: String,
    emoji: Option<String>,
    custom_icon: Option<String>,
    icon_shape: Option<String>,
    due_date: Option<String>,
) -> ActionResponse {
    let title = match normalize_title(&title) {
        Ok(title) => title,
        Err(message) => return ActionResponse::failure(format!("task_add failed: {message}")),
    };
    let due_date = match due_date.as_deref().map(parse_date).transpose() {
        Ok(due_date) => due_date,
        Err(message) => return ActionResponse::failure(format!("task_add failed: {message}")),
    };
    let icon = Icon::from_parts(
        emoji.as_deref(),
        custom_icon.as_deref(),
        icon_shape.as_deref(),
    );

    match with_tracker(|repo| repo.add_task(title, icon, due_date)) {
        Ok(task) => ActionResponse::success("Task added.", Some(task.id.to_string())),
        Err(err) => ActionResponse::failure(format!("task_add failed: {err}")),
    }
}

/// Renames a task. Unknown ids are accepted as no-ops.
#[flutter_rust_bridge::frb(sync)]
pub fn task_update_title(id: String, title: String) -> ActionResponse {
    let title = match normalize_title(&title) {
        Ok(title) => title,
        Err(message) => {
            return ActionResponse::failure(format!("task_update_title failed: {message}"))
        }
    };
    run_on_id("task_update_title", "Task updated.", &id, |repo, id| {
        repo.update_task(
            id,
            TaskPatch {
                title: Some(title),
                ..TaskPatch::default()
            },
        );
    })
}

/// Sets or clears (`None`) a task's due date.
#[flutter_rust_bridge::frb(sync)]
pub fn task_set_due_date(id: String, due_date: Option<String>) -> ActionResponse {
    let due_date = match due_date.as_deref().map(parse_date).transpose() {
        Ok(due_date) => due_date,
        Err(message) => {
            return ActionResponse::failure(format!("task_set_due_date failed: {message}"))
        }
    };
    run_on_id("task_set_due_date", "Task updated.", &id, |repo, id| {
        repo.update_task(
            id,
            TaskPatch {
                due_date: Some(due_date),
                ..TaskPatch::default()
            },
        );
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn task_toggle(id: String) -> ActionResponse {
    run_on_id("task_toggle", "Task toggled.", &id, |repo, id| {
        repo.toggle_task(id)
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn task_delete(id: String) -> ActionResponse {
    run_on_id("task_delete", "Task deleted.", &id, |repo, id| {
        repo.delete_task(id)
    })
}

/// Reorders tasks following `ids`; tasks not listed keep their relative
/// order after the listed ones.
#[flutter_rust_bridge::frb(sync)]
pub fn task_reorder(ids: Vec<String>) -> ActionResponse {
    let ids = parse_ids(&ids);
    match with_tracker(|repo| {
        let arranged = arrange_by_ids(repo.tasks().to_vec(), &ids, |task: &Task| task.id);
        repo.reorder_tasks(arranged);
    }) {
        Ok(()) => ActionResponse::success("Tasks reordered.", None),
        Err(err) => ActionResponse::failure(format!("task_reorder failed: {err}")),
    }
}

/// Lists tasks visible on `selected_date` (today when `None`) in display order.
#[flutter_rust_bridge::frb(sync)]
pub fn task_list(selected_date: Option<String>) -> TaskListResponse {
    let result = selected_date
        .as_deref()
        .map(parse_date)
        .transpose()
        .and_then(|selected| with_tracker(|repo| list_tasks(repo, selected)));
    match result {
        Ok(items) => TaskListResponse {
            ok: true,
            message: format!("{} task(s).", items.len()),
            items,
        },
        Err(err) => TaskListResponse {
            ok: false,
            items: Vec::new(),
            message: format!("task_list failed: {err}"),
        },
    }
}

/// Adds a habit from the add-item form.
///
/// # FFI contract
/// - `title` is trimmed and must not be blank.
/// - `color` must be one of `blue|green|purple|orange|pink`.
/// - Without any icon input the default emoji is used.
#[flutter_rust_bridge::frb(sync)]
pub fn habit_add(
    title: String,
    emoji: Option<String>,
    custom_icon: Option<String>,
    icon_shape: Option<String>,
    color: String,
) -> ActionResponse {
    let title = match normalize_title(&title) {
        Ok(title) => title,
        Err(message) => return ActionResponse::failure(format!("habit_add failed: {message}")),
    };
    let Some(color) = HabitColor::parse(&color) else {
        return ActionResponse::failure(format!("habit_add failed: unknown color `{color}`"));
    };
    let icon = Icon::from_parts(
        emoji.as_deref(),
        custom_icon.as_deref(),
        icon_shape.as_deref(),
    )
    .unwrap_or_default();

    match with_tracker(|repo| repo.add_habit(title, icon, color)) {
        Ok(habit) => ActionResponse::success("Habit added.", Some(habit.id.to_string())),
        Err(err) => ActionResponse::failure(format!("habit_add failed: {err}")),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn habit_toggle_today(id: String) -> ActionResponse {
    run_on_id("habit_toggle_today", "Habit toggled.", &id, |repo, id| {
        repo.toggle_habit_today(id)
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn habit_delete(id: String) -> ActionResponse {
    run_on_id("habit_delete", "Habit deleted.", &id, |repo, id| {
        repo.delete_habit(id)
    })
}

/// Reorders habits following `ids`; habits not listed keep their relative
/// order after the listed ones.
#[flutter_rust_bridge::frb(sync)]
pub fn habit_reorder(ids: Vec<String>) -> ActionResponse {
    let ids = parse_ids(&ids);
    match with_tracker(|repo| {
        let arranged = arrange_by_ids(repo.habits().to_vec(), &ids, |habit: &Habit| habit.id);
        repo.reorder_habits(arranged);
    }) {
        Ok(()) => ActionResponse::success("Habits reordered.", None),
        Err(err) => ActionResponse::failure(format!("habit_reorder failed: {err}")),
    }
}

/// Lists habits in display order with today's state and the 14-day grid.
#[flutter_rust_bridge::frb(sync)]
pub fn habit_list() -> HabitListResponse {
    match with_tracker(list_habits) {
        Ok(items) => HabitListResponse {
            ok: true,
            message: format!("{} habit(s).", items.len()),
            items,
        },
        Err(err) => HabitListResponse {
            ok: false,
            items: Vec::new(),
            message: format!("habit_list failed: {err}"),
        },
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn tracker_stats() -> StatsView {
    match with_tracker(|repo| tracker_stats_inner(repo.tasks(), repo.habits(), repo.today())) {
        Ok(stats) => StatsView {
            ok: true,
            total_tasks: saturating_u32(stats.total_tasks),
            completed_tasks: saturating_u32(stats.completed_tasks),
            incomplete_tasks: saturating_u32(stats.incomplete_tasks),
            later_tasks: saturating_u32(stats.later_tasks),
            completion_rate_percent: stats.completion_rate_percent,
            total_habits: saturating_u32(stats.total_habits),
            habits_completed_today: saturating_u32(stats.habits_completed_today),
            best_streak: stats.best_streak,
            message: String::new(),
        },
        Err(err) => StatsView {
            message: format!("tracker_stats failed: {err}"),
            ..StatsView::default()
        },
    }
}

/// Seven-day picker strip around today shifted by `center_offset` days.
///
/// An unparsable `selected_date` leaves every day unselected.
#[flutter_rust_bridge::frb(sync)]
pub fn date_strip(selected_date: String, center_offset: i64) -> Vec<StripDayView> {
    let today = SystemClock.today();
    let selected = parse_date(&selected_date).unwrap_or(NaiveDate::MIN);
    date_strip_inner(today, selected, center_offset)
        .into_iter()
        .map(|day| StripDayView {
            date: format_date(day.date),
            is_today: day.is_today,
            is_selected: day.is_selected,
        })
        .collect()
}

fn resolve_db_path() -> PathBuf {
    DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(DB_FILE_NAME)
        })
        .clone()
}

fn open_session(path: &Path, config: &TrackerConfig) -> Result<SessionRepo, String> {
    let store = SqliteKvStore::open(path, config.capacity_chars)
        .map_err(|err| format!("store open failed: {err}"))?;
    let repo = TrackerRepository::load(store, SystemClock, config);
    info!(
        "event=ffi_session_open module=ffi status=ok capacity_chars={} streak_policy={:?}",
        config.capacity_chars, config.streak_policy
    );
    Ok(repo)
}

fn with_tracker<T>(f: impl FnOnce(&mut SessionRepo) -> T) -> Result<T, String> {
    SESSION.run(
        || {
            let config = TrackerConfig::from_env().map_err(|err| err.to_string())?;
            open_session(&resolve_db_path(), &config)
        },
        f,
    )
}

fn list_tasks(repo: &mut SessionRepo, selected: Option<NaiveDate>) -> Vec<TaskItem> {
    let today = repo.today();
    task_list_view(repo.tasks(), selected.unwrap_or(today), today)
        .into_iter()
        .map(to_task_item)
        .collect()
}

fn list_habits(repo: &mut SessionRepo) -> Vec<HabitItem> {
    let today = repo.today();
    habit_list_view(repo.habits())
        .into_iter()
        .map(|habit| to_habit_item(habit, today))
        .collect()
}

fn run_on_id(
    op: &str,
    message: &str,
    id: &str,
    f: impl FnOnce(&mut SessionRepo, Uuid),
) -> ActionResponse {
    let Ok(parsed) = Uuid::parse_str(id.trim()) else {
        return ActionResponse::failure(format!("{op} failed: invalid id `{id}`"));
    };
    match with_tracker(|repo| f(repo, parsed)) {
        Ok(()) => ActionResponse::success(message, Some(parsed.to_string())),
        Err(err) => ActionResponse::failure(format!("{op} failed: {err}")),
    }
}

fn parse_ids(ids: &[String]) -> Vec<Uuid> {
    ids.iter()
        .filter_map(|raw| match Uuid::parse_str(raw.trim()) {
            Ok(id) => Some(id),
            Err(_) => {
                warn!("event=ffi_reorder module=ffi status=skipped reason=invalid_id");
                None
            }
        })
        .collect()
}

fn normalize_title(title: &str) -> Result<String, String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err("title must not be blank".to_string());
    }
    Ok(trimmed.to_string())
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| format!("invalid date `{value}`; expected YYYY-MM-DD"))
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn saturating_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

fn to_icon_view(icon: Option<&Icon>) -> IconView {
    match icon {
        None => IconView::default(),
        Some(Icon::Emoji { code }) => IconView {
            emoji: Some(code.clone()),
            ..IconView::default()
        },
        Some(Icon::Image { payload, shape }) => IconView {
            emoji: None,
            custom_icon: Some(payload.clone()),
            icon_shape: Some(shape.as_str().to_string()),
        },
    }
}

fn to_task_item(task: Task) -> TaskItem {
    TaskItem {
        id: task.id.to_string(),
        icon: to_icon_view(task.icon.as_ref()),
        due_date: task.due_date.map(format_date),
        title: task.title,
        completed: task.completed,
        position: task.position,
    }
}

fn to_habit_item(habit: Habit, today: NaiveDate) -> HabitItem {
    let grid = completion_grid(&habit, today)
        .into_iter()
        .map(|day| GridCell {
            date: format_date(day.date),
            completed: day.completed,
        })
        .collect::<Vec<_>>();
    let completed_today = grid.last().is_some_and(|cell| cell.completed);
    HabitItem {
        id: habit.id.to_string(),
        icon: to_icon_view(Some(&habit.icon)),
        color: habit.color.as_str().to_string(),
        streak: habit.streak,
        completed_today,
        grid,
        position: habit.position,
        title: habit.title,
    }
}
