//! Time source injected into the repository.
//!
//! Streak and visibility logic take `today` as a parameter; the clock is
//! only consulted at the repository boundary.

use chrono::{DateTime, Local, NaiveDate, Utc};

pub trait Clock {
    /// Current calendar date in the user's local time zone.
    fn today(&self) -> NaiveDate;
    /// Current instant, used for creation timestamps.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock backed by the host time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to a fixed date, for deterministic sessions and tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    today: NaiveDate,
}

impl FixedClock {
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.today
    }

    fn now(&self) -> DateTime<Utc> {
        self.today.and_time(chrono::NaiveTime::MIN).and_utc()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn today(&self) -> NaiveDate {
        (**self).today()
    }

    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}
