//! Week strip used to pick the selected date.

use chrono::{Days, NaiveDate};

/// Days shown on each side of the strip's center.
const HALF_WIDTH: i64 = 3;
/// Swiping the strip moves its center by one week.
pub const STRIP_PAGE_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StripDay {
    pub date: NaiveDate,
    pub is_today: bool,
    pub is_selected: bool,
}

/// Seven consecutive days centered on `today + center_offset` days.
pub fn date_strip(today: NaiveDate, selected: NaiveDate, center_offset: i64) -> Vec<StripDay> {
    (-HALF_WIDTH..=HALF_WIDTH)
        .filter_map(|delta| shift(today, center_offset + delta))
        .map(|date| StripDay {
            date,
            is_today: date == today,
            is_selected: date == selected,
        })
        .collect()
}

/// Next center offset after paging the strip `pages` weeks (negative = back).
pub fn page_offset(center_offset: i64, pages: i64) -> i64 {
    center_offset + pages * STRIP_PAGE_DAYS
}

fn shift(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    if days >= 0 {
        date.checked_add_days(Days::new(days.unsigned_abs()))
    } else {
        date.checked_sub_days(Days::new(days.unsigned_abs()))
    }
}

#[cfg(test)]
mod tests {
    use super::{date_strip, page_offset};
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    #[test]
    fn strip_is_centered_on_today_by_default() {
        let strip = date_strip(day(15), day(16), 0);
        let dates = strip.iter().map(|d| d.date).collect::<Vec<_>>();
        assert_eq!(dates, (12..=18).map(day).collect::<Vec<_>>());
        assert!(strip[3].is_today);
        assert!(strip[4].is_selected);
        assert_eq!(strip.iter().filter(|d| d.is_today).count(), 1);
    }

    #[test]
    fn paging_moves_by_whole_weeks() {
        let offset = page_offset(0, 1);
        let strip = date_strip(day(15), day(15), offset);
        assert_eq!(strip[0].date, day(19));
        assert_eq!(strip[6].date, day(25));
        assert!(strip.iter().all(|d| !d.is_today && !d.is_selected));
        assert_eq!(page_offset(offset, -2), -7);
    }
}
