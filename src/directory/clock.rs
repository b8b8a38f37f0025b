//! Wall-clock access for the directories
//!
//! Expiration, record dates and generated alias suffixes all depend on the current
//! time, so the directories read it through this trait.

use chrono::{Local, NaiveDate, NaiveDateTime};
use std::fmt;

/// Source of the current local date and time
pub trait Clock: fmt::Debug + Send + Sync {
    /// Current local date and time
    fn now(&self) -> NaiveDateTime;

    /// Current local date (time truncated)
    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// Clock backed by the system's local time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Clock frozen at a fixed instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(NaiveDateTime);

impl FixedClock {
    /// Freeze the clock at `now`
    pub fn new(now: NaiveDateTime) -> Self {
        Self(now)
    }

    /// Freeze the clock at the given date and hour, `None` if the values are invalid
    pub fn at(year: i32, month: u32, day: u32, hour: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|date| date.and_hms_opt(hour, 0, 0))
            .map(Self)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
