use crate::day::Day;
use chrono::Utc;
use std::sync::Mutex;

/// Source of "today" for the store, so day rollover can be driven in tests.
pub trait Clock: Send + Sync + 'static {
    fn today(&self) -> Day;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> Day {
        Day::local(Utc::now())
    }
}

/// A clock that stays on one day until moved.
pub struct FixedClock {
    day: Mutex<Day>,
}

impl FixedClock {
    pub fn new(day: Day) -> Self {
        Self { day: Mutex::new(day) }
    }

    pub fn set(&self, day: Day) {
        *self.day.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = day;
    }

    pub fn advance_days(&self, days: i64) {
        let mut guard = self.day.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = guard.offset(days);
    }
}

impl Clock for FixedClock {
    fn today(&self) -> Day {
        *self.day.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
