//! Assignment model.
//!
//! An assignment binds a worker to a site for a set of weekdays within a
//! date window. Assignments live in the owning worker's calendar; the site
//! only keeps the derived set of assigned worker ids.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::{DateWindow, Weekday};

/// A worker's commitment to a site.
///
/// Covers every date of `window` whose weekday is in `days`. The per-day
/// breakdown gives the hours worked on each covered weekday; a covered
/// weekday missing from the breakdown counts as zero hours (records written
/// by the allocator always carry the breakdown).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    /// Referenced site.
    pub site_id: String,
    /// Coverage window (inclusive).
    pub window: DateWindow,
    /// Weekdays covered within the window.
    pub days: BTreeSet<Weekday>,
    /// Hours per covered weekday.
    #[serde(default)]
    pub daily_hours: BTreeMap<Weekday, f64>,
}

impl Assignment {
    /// Creates an assignment covering no days yet.
    pub fn new(site_id: impl Into<String>, window: DateWindow) -> Self {
        Self {
            site_id: site_id.into(),
            window,
            days: BTreeSet::new(),
            daily_hours: BTreeMap::new(),
        }
    }

    /// Adds a covered weekday with its hours.
    pub fn with_day(mut self, day: Weekday, hours: f64) -> Self {
        self.add_day(day, hours);
        self
    }

    /// Adds (or overwrites) a covered weekday with its hours.
    pub fn add_day(&mut self, day: Weekday, hours: f64) {
        self.days.insert(day);
        self.daily_hours.insert(day, hours);
    }

    /// Whether this assignment references the given site and window.
    pub fn matches(&self, site_id: &str, window: &DateWindow) -> bool {
        self.site_id == site_id && self.window == *window
    }

    /// Whether the worker is committed on `date`.
    #[inline]
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.window.contains(date) && self.days.contains(&Weekday::of(date))
    }

    /// Hours worked on a covered weekday (0.0 if not covered).
    pub fn hours_on(&self, day: Weekday) -> f64 {
        if !self.days.contains(&day) {
            return 0.0;
        }
        self.daily_hours.get(&day).copied().unwrap_or(0.0)
    }

    /// Hours worked on a concrete date (0.0 if not covered).
    pub fn hours_on_date(&self, date: NaiveDate) -> f64 {
        if self.covers(date) {
            self.hours_on(Weekday::of(date))
        } else {
            0.0
        }
    }

    /// Every concrete date covered, in ascending order.
    pub fn covered_dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.window
            .dates()
            .filter(move |d| self.days.contains(&Weekday::of(*d)))
    }

    /// Total hours over the whole window.
    pub fn total_hours(&self) -> f64 {
        self.covered_dates().map(|d| self.hours_on_date(d)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn two_weeks() -> DateWindow {
        DateWindow::new(d(2025, 9, 1), d(2025, 9, 14))
    }

    #[test]
    fn test_assignment_coverage() {
        let a = Assignment::new("S1", two_weeks())
            .with_day(Weekday::Monday, 7.0)
            .with_day(Weekday::Wednesday, 7.0);

        assert!(a.covers(d(2025, 9, 1)));
        assert!(a.covers(d(2025, 9, 10)));
        assert!(!a.covers(d(2025, 9, 2))); // Tuesday
        assert!(!a.covers(d(2025, 9, 15))); // outside window
        assert_eq!(a.covered_dates().count(), 4);
        assert!((a.total_hours() - 28.0).abs() < 1e-10);
    }

    #[test]
    fn test_hours_lookup() {
        let a = Assignment::new("S1", two_weeks()).with_day(Weekday::Friday, 4.5);
        assert!((a.hours_on(Weekday::Friday) - 4.5).abs() < 1e-10);
        assert!((a.hours_on(Weekday::Monday) - 0.0).abs() < 1e-10);
        assert!((a.hours_on_date(d(2025, 9, 5)) - 4.5).abs() < 1e-10);
        assert!((a.hours_on_date(d(2025, 9, 6)) - 0.0).abs() < 1e-10);
    }

    #[test]
    fn test_day_without_breakdown_counts_zero() {
        let mut a = Assignment::new("S1", two_weeks());
        a.days.insert(Weekday::Tuesday);
        assert!(a.covers(d(2025, 9, 2)));
        assert!((a.hours_on(Weekday::Tuesday) - 0.0).abs() < 1e-10);
    }

    #[test]
    fn test_matches_site_and_window() {
        let a = Assignment::new("S1", two_weeks());
        assert!(a.matches("S1", &two_weeks()));
        assert!(!a.matches("S2", &two_weeks()));
        assert!(!a.matches("S1", &DateWindow::new(d(2025, 9, 1), d(2025, 9, 7))));
    }

    #[test]
    fn test_serde_round_trip_keeps_breakdown() {
        let a = Assignment::new("S1", two_weeks()).with_day(Weekday::Monday, 3.0);
        let json = serde_json::to_string(&a).unwrap();
        assert!(json.contains("\"monday\":3.0"));
        let back: Assignment = serde_json::from_str(&json).unwrap();
        assert_eq!(back, a);
    }
}
