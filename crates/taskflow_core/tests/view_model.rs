use chrono::{Days, NaiveDate, TimeZone, Utc};
use taskflow_core::{
    completion_grid, habit_list_view, task_list_view, tracker_stats, Habit, HabitColor,
    HabitCompletion, Icon, Task,
};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn task(title: &str, position: i64, due_date: Option<NaiveDate>, completed: bool) -> Task {
    let mut task = Task::new(
        title,
        None,
        due_date,
        position,
        Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap(),
    );
    task.completed = completed;
    task
}

fn habit(title: &str, position: i64, streak: u32, completed_days: &[NaiveDate]) -> Habit {
    let mut habit = Habit::new(
        title,
        Icon::default(),
        HabitColor::Blue,
        position,
        Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap(),
    );
    habit.streak = streak;
    habit.completions = completed_days
        .iter()
        .map(|date| HabitCompletion {
            date: *date,
            completed: true,
        })
        .collect();
    habit
}

fn titles(tasks: &[Task]) -> Vec<&str> {
    tasks.iter().map(|task| task.title.as_str()).collect()
}

#[test]
fn dated_task_is_visible_only_on_its_day() {
    let tasks = vec![task("dentist", 0, Some(day(2024, 6, 1)), false)];

    assert_eq!(titles(&task_list_view(&tasks, day(2024, 6, 1), today())), ["dentist"]);
    assert!(task_list_view(&tasks, day(2024, 6, 2), today()).is_empty());
    assert!(task_list_view(&tasks, today(), today()).is_empty());
}

#[test]
fn undated_task_is_visible_only_on_today() {
    let tasks = vec![task("inbox", 0, None, false)];

    assert_eq!(titles(&task_list_view(&tasks, today(), today())), ["inbox"]);
    assert!(task_list_view(&tasks, day(2024, 6, 16), today()).is_empty());
    assert!(task_list_view(&tasks, day(2024, 6, 14), today()).is_empty());
}

#[test]
fn task_list_puts_incomplete_first_then_position() {
    let tasks = vec![
        task("done early", 0, None, true),
        task("open late", 3, None, false),
        task("open early", 1, None, false),
        task("done late", 2, None, true),
        task("other day", 4, Some(day(2024, 6, 20)), false),
    ];

    let view = task_list_view(&tasks, today(), today());
    assert_eq!(
        titles(&view),
        ["open early", "open late", "done early", "done late"]
    );
}

#[test]
fn habit_list_is_sorted_by_position() {
    let habits = vec![habit("b", 1, 0, &[]), habit("c", 2, 0, &[]), habit("a", 0, 0, &[])];

    let view = habit_list_view(&habits);
    let order = view.iter().map(|h| h.title.as_str()).collect::<Vec<_>>();
    assert_eq!(order, ["a", "b", "c"]);
}

#[test]
fn completion_grid_covers_fourteen_days_oldest_first() {
    let two_days_ago = today().checked_sub_days(Days::new(2)).unwrap();
    let mut tracked = habit("read", 0, 1, &[two_days_ago, today()]);
    tracked.completions.push(HabitCompletion {
        date: today().checked_sub_days(Days::new(1)).unwrap(),
        completed: false,
    });

    let grid = completion_grid(&tracked, today());

    assert_eq!(grid.len(), 14);
    assert_eq!(grid.first().unwrap().date, day(2024, 6, 2));
    assert_eq!(grid.last().unwrap().date, today());
    let completed = grid
        .iter()
        .filter(|cell| cell.completed)
        .map(|cell| cell.date)
        .collect::<Vec<_>>();
    assert_eq!(completed, vec![two_days_ago, today()]);
}

#[test]
fn stats_on_empty_collections_are_zero() {
    let stats = tracker_stats(&[], &[], today());

    assert_eq!(stats.total_tasks, 0);
    assert_eq!(stats.completion_rate_percent, 0);
    assert_eq!(stats.best_streak, 0);
    assert_eq!(stats.habits_completed_today, 0);
}

#[test]
fn stats_round_completion_rate_and_count_later_tasks() {
    let tasks = vec![
        task("done", 0, None, true),
        task("tomorrow", 1, Some(day(2024, 6, 16)), false),
        task("past", 2, Some(day(2024, 6, 10)), false),
    ];
    let habits = vec![
        habit("read", 0, 4, &[today()]),
        habit("run", 1, 7, &[day(2024, 6, 14)]),
        habit("write", 2, 0, &[]),
    ];

    let stats = tracker_stats(&tasks, &habits, today());

    assert_eq!(stats.total_tasks, 3);
    assert_eq!(stats.completed_tasks, 1);
    assert_eq!(stats.incomplete_tasks, 2);
    assert_eq!(stats.later_tasks, 1);
    assert_eq!(stats.completion_rate_percent, 33);
    assert_eq!(stats.total_habits, 3);
    assert_eq!(stats.habits_completed_today, 1);
    assert_eq!(stats.best_streak, 7);
}

#[test]
fn stats_round_two_of_three_up() {
    let tasks = vec![
        task("a", 0, None, true),
        task("b", 1, None, true),
        task("c", 2, None, false),
    ];

    assert_eq!(tracker_stats(&tasks, &[], today()).completion_rate_percent, 67);
}
