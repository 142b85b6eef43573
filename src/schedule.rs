//! Calendar date to devotional cycle slot resolution.
//!
//! The catalog is a fixed 365-day cycle, so February 29 has no slot and
//! every later date in a leap year is pulled back by one ordinal. March 1 is
//! slot 60 in every year.

use chrono::{DateTime, Datelike, Local, NaiveDate};
use serde::Serialize;

/// Whether a calendar date has a slot in the 365-day cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SchedulingStatus {
    Scheduled,
    Unscheduled,
}

/// Outcome of resolving one calendar date. Computed fresh per lookup and
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedDate {
    pub day_of_year: Option<u16>,
    pub iso_date: String,
    pub status: SchedulingStatus,
}

/// Map a calendar date onto the 365-slot cycle.
pub fn resolve(date: NaiveDate) -> ResolvedDate {
    let iso_date = date.format("%Y-%m-%d").to_string();
    if date.month() == 2 && date.day() == 29 {
        return ResolvedDate {
            day_of_year: None,
            iso_date,
            status: SchedulingStatus::Unscheduled,
        };
    }
    let mut day = date.ordinal() as u16;
    if is_leap_year(date.year()) && date.month() > 2 {
        day -= 1;
    }
    ResolvedDate {
        day_of_year: Some(day),
        iso_date,
        status: SchedulingStatus::Scheduled,
    }
}

/// Resolve the current wall-clock date.
pub fn resolve_today(now: DateTime<Local>) -> ResolvedDate {
    resolve(now.date_naive())
}

/// Gregorian leap-year rule: divisible by 4, except centuries not divisible
/// by 400.
pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}
