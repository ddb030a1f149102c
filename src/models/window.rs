//! Date windows and ISO week keys.
//!
//! Defines the service period of a site and the coverage period of an
//! assignment.
//!
//! # Date Model
//! All dates are calendar days (`NaiveDate`) without time of day. Both
//! bounds of a window are inclusive: a window from Monday to Sunday
//! contains seven days.
//!
//! # Weekly Keys
//! Weekly hour caps are evaluated per ISO week. Each concrete date maps to
//! its own `(ISO year, ISO week)` key, so a window spanning a year boundary
//! yields keys from both years.

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::Weekday;

/// An inclusive date interval [start, end].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateWindow {
    /// First day (inclusive).
    pub start: NaiveDate,
    /// Last day (inclusive).
    pub end: NaiveDate,
}

impl DateWindow {
    /// Creates a new window.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Number of days in this window (0 if `end < start`).
    pub fn len_days(&self) -> i64 {
        ((self.end - self.start).num_days() + 1).max(0)
    }

    /// Whether the window has no days.
    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }

    /// Whether a date falls within this window.
    #[inline]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Whether two windows share at least one day.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Every date in the window landing on `day`.
    ///
    /// Starts at the first occurrence of `day` at or after `start`, then
    /// strides seven days until `end` is passed.
    pub fn dates_on(&self, day: Weekday) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        let offset = (7 + day.days_from_monday() - Weekday::of(self.start).days_from_monday()) % 7;
        let first = self
            .start
            .checked_add_days(Days::new(u64::from(offset)))
            .filter(|d| *d <= end);
        std::iter::successors(first, move |d| {
            d.checked_add_days(Days::new(7)).filter(|n| *n <= end)
        })
    }

    /// Every date in the window.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        let first = Some(self.start).filter(|d| *d <= end);
        std::iter::successors(first, move |d| d.succ_opt().filter(|n| *n <= end))
    }
}

/// An `(ISO year, ISO week)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WeekKey {
    /// ISO week-numbering year.
    pub year: i32,
    /// ISO week number (1..=53).
    pub week: u32,
}

impl WeekKey {
    /// Week key of a date.
    pub fn of(date: NaiveDate) -> Self {
        let iso = date.iso_week();
        Self {
            year: iso.year(),
            week: iso.week(),
        }
    }
}

impl fmt::Display for WeekKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-W{:02}", self.year, self.week)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_window_bounds_inclusive() {
        let w = DateWindow::new(d(2025, 9, 1), d(2025, 9, 7));
        assert_eq!(w.len_days(), 7);
        assert!(w.contains(d(2025, 9, 1)));
        assert!(w.contains(d(2025, 9, 7)));
        assert!(!w.contains(d(2025, 9, 8)));
        assert!(!w.is_empty());
    }

    #[test]
    fn test_window_overlap() {
        let a = DateWindow::new(d(2025, 9, 1), d(2025, 9, 7));
        let b = DateWindow::new(d(2025, 9, 7), d(2025, 9, 14));
        assert!(a.overlaps(&b)); // sharing the last day counts
        let c = DateWindow::new(d(2025, 9, 8), d(2025, 9, 14));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_dates_on_weekday() {
        // Wednesday 2025-09-03 .. Wednesday 2025-09-17
        let w = DateWindow::new(d(2025, 9, 3), d(2025, 9, 17));
        let mondays: Vec<_> = w.dates_on(Weekday::Monday).collect();
        assert_eq!(mondays, vec![d(2025, 9, 8), d(2025, 9, 15)]);

        let wednesdays: Vec<_> = w.dates_on(Weekday::Wednesday).collect();
        assert_eq!(wednesdays, vec![d(2025, 9, 3), d(2025, 9, 10), d(2025, 9, 17)]);
    }

    #[test]
    fn test_dates_on_absent_weekday() {
        // Monday..Wednesday has no Friday
        let w = DateWindow::new(d(2025, 9, 1), d(2025, 9, 3));
        assert_eq!(w.dates_on(Weekday::Friday).count(), 0);
    }

    #[test]
    fn test_all_dates() {
        let w = DateWindow::new(d(2025, 12, 30), d(2026, 1, 2));
        assert_eq!(w.dates().count(), 4);
        let inverted = DateWindow::new(d(2025, 9, 2), d(2025, 9, 1));
        assert!(inverted.is_empty());
        assert_eq!(inverted.dates().count(), 0);
        assert_eq!(inverted.len_days(), 0);
    }

    #[test]
    fn test_week_key_across_year_boundary() {
        // 2024-12-30 (Monday) belongs to ISO week 1 of 2025
        assert_eq!(WeekKey::of(d(2024, 12, 30)), WeekKey { year: 2025, week: 1 });
        assert_eq!(WeekKey::of(d(2024, 12, 29)), WeekKey { year: 2024, week: 52 });
        assert_eq!(WeekKey::of(d(2025, 9, 1)).to_string(), "2025-W36");
    }
}
