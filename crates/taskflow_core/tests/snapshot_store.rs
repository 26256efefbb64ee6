use chrono::{NaiveDate, TimeZone, Utc};
use taskflow_core::db::open_db;
use taskflow_core::store::{HABITS_SLOT, TASKS_SLOT};
use taskflow_core::{
    FixedClock, Habit, HabitColor, Icon, IconShape, KeyValueStore, MemoryKvStore, SaveOutcome,
    SnapshotStore, SqliteKvStore, TrackerConfig, TrackerRepository,
};

fn habit_with_icon(title: &str, icon: Icon, position: i64) -> Habit {
    Habit::new(
        title,
        icon,
        HabitColor::Blue,
        position,
        Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap(),
    )
}

fn big_image(chars: usize) -> Icon {
    Icon::image("x".repeat(chars), IconShape::Circle)
}

fn serialized_len(habits: &[Habit]) -> usize {
    HABITS_SLOT.chars().count() + serde_json::to_string(habits).unwrap().chars().count()
}

#[test]
fn malformed_habits_slot_loads_empty_and_is_cleared() {
    let store = MemoryKvStore::default();
    store.insert_raw(HABITS_SLOT, "{not json");
    store.insert_raw(TASKS_SLOT, "[]");

    let snapshots = SnapshotStore::new(&store, &TrackerConfig::default());
    assert!(snapshots.load_habits().is_empty());
    assert!(!store.contains_key(HABITS_SLOT));
    assert!(store.contains_key(TASKS_SLOT));

    assert!(snapshots.load_habits().is_empty());
}

#[test]
fn malformed_tasks_slot_does_not_affect_habits() {
    let store = MemoryKvStore::default();
    let habits = vec![habit_with_icon("read", Icon::emoji("📚"), 0)];
    store.insert_raw(TASKS_SLOT, r#"[{"id": 42}]"#);
    store.insert_raw(HABITS_SLOT, &serde_json::to_string(&habits).unwrap());

    let repo = TrackerRepository::load(
        &store,
        FixedClock::new(NaiveDate::from_ymd_opt(2024, 6, 2).unwrap()),
        &TrackerConfig::default(),
    );
    assert!(repo.tasks().is_empty());
    assert_eq!(repo.habits(), habits.as_slice());
    assert!(!store.contains_key(TASKS_SLOT));
}

#[test]
fn load_drops_oversized_habit_icons() {
    let store = MemoryKvStore::default();
    let habits = vec![
        habit_with_icon("small", big_image(15_000), 0),
        habit_with_icon("large", big_image(15_001), 1),
    ];
    store.insert_raw(HABITS_SLOT, &serde_json::to_string(&habits).unwrap());

    let loaded = SnapshotStore::new(&store, &TrackerConfig::default()).load_habits();
    assert_eq!(loaded[0].icon, big_image(15_000));
    assert_eq!(loaded[1].icon, Icon::default());
}

#[test]
fn quota_exceeded_strips_large_icons_from_persisted_copy_only() {
    let habits = vec![
        habit_with_icon("with photo", big_image(20_000), 0),
        habit_with_icon("with emoji", Icon::emoji("💧"), 1),
    ];
    let mut stripped = habits.clone();
    stripped[0].icon = Icon::default();

    // Room for the stripped snapshot, not for the full one.
    let store = MemoryKvStore::new(serialized_len(&stripped) + 10);
    let snapshots = SnapshotStore::new(&store, &TrackerConfig::default());

    let outcome = snapshots.save_habits(&habits);
    assert_eq!(outcome, SaveOutcome::SavedDegraded { stripped_icons: 1 });
    assert_eq!(habits[0].icon, big_image(20_000));

    let persisted: Vec<Habit> =
        serde_json::from_str(&store.load(HABITS_SLOT).unwrap().unwrap()).unwrap();
    assert_eq!(persisted, stripped);
}

#[test]
fn quota_exceeded_twice_drops_the_cycle_and_keeps_previous_snapshot() {
    let previous = vec![habit_with_icon("old", Icon::emoji("☕"), 0)];
    let store = MemoryKvStore::new(serialized_len(&previous) + 5);
    let snapshots = SnapshotStore::new(&store, &TrackerConfig::default());
    assert_eq!(snapshots.save_habits(&previous), SaveOutcome::Saved);

    let mut grown = previous.clone();
    grown.push(habit_with_icon("too many", Icon::emoji("🎨"), 1));
    assert_eq!(snapshots.save_habits(&grown), SaveOutcome::Dropped);

    let persisted: Vec<Habit> =
        serde_json::from_str(&store.load(HABITS_SLOT).unwrap().unwrap()).unwrap();
    assert_eq!(persisted, previous);
}

#[test]
fn repository_keeps_icons_in_memory_after_degraded_save() {
    let store = MemoryKvStore::new(2_000);
    let mut repo = TrackerRepository::load(
        &store,
        FixedClock::new(NaiveDate::from_ymd_opt(2024, 6, 2).unwrap()),
        &TrackerConfig {
            icon_degrade_limit_chars: 100,
            ..TrackerConfig::default()
        },
    );

    let habit = repo.add_habit("photo habit", big_image(3_000), HabitColor::Green);

    assert_eq!(
        repo.last_save_outcome(),
        Some(SaveOutcome::SavedDegraded { stripped_icons: 1 })
    );
    assert_eq!(repo.habit(habit.id).unwrap().icon, big_image(3_000));
    assert!(repo.last_save_outcome().unwrap().is_persisted());
}

#[test]
fn sqlite_backed_repository_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tracker.db");
    let day = NaiveDate::from_ymd_opt(2024, 6, 2).unwrap();
    let config = TrackerConfig::default();

    let (task, habit) = {
        let store = SqliteKvStore::open(&path, config.capacity_chars).unwrap();
        let mut repo = TrackerRepository::load(store, FixedClock::new(day), &config);
        let task = repo.add_task("pay rent", None, Some(day));
        let habit = repo.add_habit("read", Icon::emoji("📚"), HabitColor::Purple);
        repo.toggle_habit_today(habit.id);
        assert_eq!(repo.last_save_outcome(), Some(SaveOutcome::Saved));
        (task, habit)
    };

    let repo = TrackerRepository::load(
        SqliteKvStore::new(open_db(&path).unwrap(), config.capacity_chars),
        FixedClock::new(day),
        &config,
    );
    assert_eq!(repo.tasks(), &[task]);
    let reloaded = repo.habit(habit.id).unwrap();
    assert_eq!(reloaded.streak, 1);
    assert!(repo.is_habit_completed_today(reloaded));
}
