//! Habit streak engine.
//!
//! # Responsibility
//! - Decide whether a habit is completed on a given day.
//! - Toggle a day's completion record.
//! - Derive the consecutive-day streak ending at `today`.
//!
//! # Invariants
//! - Pure functions; `today` is always supplied by the caller.
//! - Toggling never removes a record, it only flips `completed`.
//! - At most one record per date is ever created.

use crate::config::StreakPolicy;
use crate::model::habit::HabitCompletion;
use chrono::{Days, NaiveDate};
use std::collections::HashSet;

/// Maximum number of days the backward walk inspects, today included.
pub const STREAK_WINDOW_DAYS: u64 = 365;

/// Returns whether a completed record exists for `day`.
pub fn is_completed_on(completions: &[HabitCompletion], day: NaiveDate) -> bool {
    completions
        .iter()
        .any(|completion| completion.date == day && completion.completed)
}

/// Flips the record for `day`, or appends a completed record when missing.
pub fn toggle_on(completions: &mut Vec<HabitCompletion>, day: NaiveDate) {
    match completions
        .iter_mut()
        .find(|completion| completion.date == day)
    {
        Some(existing) => existing.completed = !existing.completed,
        None => completions.push(HabitCompletion {
            date: day,
            completed: true,
        }),
    }
}

/// Counts completed days walking backward from `today`.
///
/// Under `StreakPolicy::Compatible` a miss on `today` itself is skipped and
/// the walk continues with yesterday; any later miss ends the walk. Under
/// `StreakPolicy::Strict` every miss ends the walk.
pub fn compute_streak(
    completions: &[HabitCompletion],
    today: NaiveDate,
    policy: StreakPolicy,
) -> u32 {
    let completed_days = completions
        .iter()
        .filter(|completion| completion.completed)
        .map(|completion| completion.date)
        .collect::<HashSet<_>>();

    let mut streak = 0;
    for offset in 0..STREAK_WINDOW_DAYS {
        let Some(day) = today.checked_sub_days(Days::new(offset)) else {
            break;
        };
        if completed_days.contains(&day) {
            streak += 1;
        } else if offset > 0 || policy == StreakPolicy::Strict {
            break;
        }
    }
    streak
}

#[cfg(test)]
mod tests {
    use super::{compute_streak, is_completed_on, toggle_on, STREAK_WINDOW_DAYS};
    use crate::config::StreakPolicy;
    use crate::model::habit::HabitCompletion;
    use chrono::{Days, NaiveDate};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn days_ago(n: u64) -> NaiveDate {
        today().checked_sub_days(Days::new(n)).unwrap()
    }

    fn done(days: &[u64]) -> Vec<HabitCompletion> {
        days.iter()
            .map(|n| HabitCompletion {
                date: days_ago(*n),
                completed: true,
            })
            .collect()
    }

    #[test]
    fn toggle_appends_then_flips_in_place() {
        let mut completions = Vec::new();
        toggle_on(&mut completions, today());
        assert!(is_completed_on(&completions, today()));

        toggle_on(&mut completions, today());
        assert!(!is_completed_on(&completions, today()));
        assert_eq!(
            completions,
            vec![HabitCompletion {
                date: today(),
                completed: false
            }]
        );
    }

    #[test]
    fn three_consecutive_days_ending_today() {
        let streak = compute_streak(&done(&[0, 1, 2]), today(), StreakPolicy::Compatible);
        assert_eq!(streak, 3);
    }

    #[test]
    fn no_completions_is_zero() {
        assert_eq!(compute_streak(&[], today(), StreakPolicy::Compatible), 0);
        assert_eq!(compute_streak(&[], today(), StreakPolicy::Strict), 0);
    }

    #[test]
    fn gap_at_yesterday_ends_walk_before_older_days() {
        assert_eq!(
            compute_streak(&done(&[2]), today(), StreakPolicy::Compatible),
            0
        );
        assert_eq!(
            compute_streak(&done(&[0, 2, 3]), today(), StreakPolicy::Compatible),
            1
        );
    }

    #[test]
    fn compatible_walk_skips_a_missing_today() {
        let completions = done(&[1, 2]);
        assert_eq!(
            compute_streak(&completions, today(), StreakPolicy::Compatible),
            2
        );
        assert_eq!(
            compute_streak(&completions, today(), StreakPolicy::Strict),
            0
        );
    }

    #[test]
    fn unchecked_records_do_not_count() {
        let mut completions = done(&[1]);
        completions.push(HabitCompletion {
            date: today(),
            completed: false,
        });
        assert_eq!(
            compute_streak(&completions, today(), StreakPolicy::Compatible),
            1
        );
    }

    #[test]
    fn walk_is_capped_at_window() {
        let every_day = (0..STREAK_WINDOW_DAYS + 30).collect::<Vec<_>>();
        let streak = compute_streak(&done(&every_day), today(), StreakPolicy::Compatible);
        assert_eq!(u64::from(streak), STREAK_WINDOW_DAYS);
    }
}
