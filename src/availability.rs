//! Worker availability checks.
//!
//! Decides whether a worker may take a site on a given weekday. The checks
//! are pure: they read the worker's calendar as it is at the time of the
//! call and never cache, so they must be re-run after every calendar
//! mutation.
//!
//! # Rules
//!
//! A worker is unavailable for a concrete date when:
//! 1. an existing assignment (any site) already covers the date;
//! 2. projected hours on that date exceed the daily cap;
//! 3. projected hours in the date's ISO week exceed the weekly cap;
//! 4. the worker's fixed-term contract has ended by that date.
//!
//! A weekday is available iff every date of the site window landing on it
//! is available.

use chrono::{Days, NaiveDate};
use std::collections::BTreeMap;
use std::fmt;

use crate::models::{Assignment, Contract, Site, WeekKey, Weekday, Worker};
use crate::policy::AllocationPolicy;

/// Tolerance for hour comparisons (hours are fractional).
pub const HOURS_EPSILON: f64 = 1e-9;

/// Why a worker cannot take a date.
#[derive(Debug, Clone, PartialEq)]
pub enum Unavailability {
    /// Another assignment already covers the date.
    AlreadyBooked { date: NaiveDate, site_id: String },
    /// The daily cap would be exceeded.
    DailyCap { date: NaiveDate, projected: f64 },
    /// The weekly cap would be exceeded.
    WeeklyCap { week: WeekKey, projected: f64 },
    /// The fixed-term contract has ended.
    ContractEnded { date: NaiveDate, ends_on: NaiveDate },
}

impl fmt::Display for Unavailability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unavailability::AlreadyBooked { date, site_id } => {
                write!(f, "already booked on {date} (site {site_id})")
            }
            Unavailability::DailyCap { date, projected } => {
                write!(f, "{projected}h on {date} exceeds the daily cap")
            }
            Unavailability::WeeklyCap { week, projected } => {
                write!(f, "{projected}h in {week} exceeds the weekly cap")
            }
            Unavailability::ContractEnded { date, ends_on } => {
                write!(f, "contract ends {ends_on}, before {date}")
            }
        }
    }
}

/// Hours projected per date and per ISO week.
///
/// Used to stage simulated hours on top of a worker's calendar, so that a
/// candidate taking several days of one site is checked against the sum.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HoursLedger {
    daily: BTreeMap<NaiveDate, f64>,
    weekly: BTreeMap<WeekKey, f64>,
}

impl HoursLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Projects every covered date of a calendar.
    pub fn from_calendar(calendar: &[Assignment]) -> Self {
        let mut ledger = Self::new();
        for assignment in calendar {
            for date in assignment.covered_dates() {
                ledger.add(date, assignment.hours_on_date(date));
            }
        }
        ledger
    }

    /// Adds hours on a date.
    pub fn add(&mut self, date: NaiveDate, hours: f64) {
        *self.daily.entry(date).or_insert(0.0) += hours;
        *self.weekly.entry(WeekKey::of(date)).or_insert(0.0) += hours;
    }

    /// Hours on a date.
    pub fn on_date(&self, date: NaiveDate) -> f64 {
        self.daily.get(&date).copied().unwrap_or(0.0)
    }

    /// Hours in an ISO week.
    pub fn in_week(&self, week: WeekKey) -> f64 {
        self.weekly.get(&week).copied().unwrap_or(0.0)
    }

    /// Sum of all hours.
    pub fn total(&self) -> f64 {
        self.daily.values().sum()
    }

    /// Hours per date, ascending.
    pub fn daily(&self) -> &BTreeMap<NaiveDate, f64> {
        &self.daily
    }

    /// Hours per ISO week, ascending.
    pub fn weekly(&self) -> &BTreeMap<WeekKey, f64> {
        &self.weekly
    }

    /// Whether no hours are recorded.
    pub fn is_empty(&self) -> bool {
        self.daily.is_empty()
    }
}

/// Hours the worker's calendar already holds on a date.
pub fn booked_hours_on(worker: &Worker, date: NaiveDate) -> f64 {
    worker.calendar.iter().map(|a| a.hours_on_date(date)).sum()
}

/// Hours the worker's calendar already holds in the ISO week of `date`.
pub fn booked_hours_in_week(worker: &Worker, date: NaiveDate) -> f64 {
    let offset = u64::from(Weekday::of(date).days_from_monday());
    let Some(monday) = date.checked_sub_days(Days::new(offset)) else {
        return 0.0;
    };
    (0..7)
        .filter_map(|i| monday.checked_add_days(Days::new(i)))
        .map(|d| booked_hours_on(worker, d))
        .sum()
}

/// Checks one concrete date of a site against a worker.
///
/// `pending` holds hours already simulated for this worker but not yet
/// written to the calendar.
pub fn check_date(
    worker: &Worker,
    site: &Site,
    date: NaiveDate,
    pending: &HoursLedger,
    policy: &AllocationPolicy,
) -> Result<(), Unavailability> {
    if let Some(existing) = worker.calendar.iter().find(|a| a.covers(date)) {
        return Err(Unavailability::AlreadyBooked {
            date,
            site_id: existing.site_id.clone(),
        });
    }

    let hours = site.hours_per_day();

    let daily = booked_hours_on(worker, date) + pending.on_date(date) + hours;
    if daily > policy.daily_hour_cap + HOURS_EPSILON {
        return Err(Unavailability::DailyCap {
            date,
            projected: daily,
        });
    }

    let week = WeekKey::of(date);
    let weekly = booked_hours_in_week(worker, date) + pending.in_week(week) + hours;
    if weekly > policy.weekly_hour_cap + HOURS_EPSILON {
        return Err(Unavailability::WeeklyCap {
            week,
            projected: weekly,
        });
    }

    if let Contract::FixedTerm { ends_on } = worker.contract {
        if date > ends_on {
            return Err(Unavailability::ContractEnded { date, ends_on });
        }
    }

    Ok(())
}

/// Checks every date of the site window landing on `day`.
///
/// Returns the first failure.
pub fn check_day(
    worker: &Worker,
    site: &Site,
    day: Weekday,
    policy: &AllocationPolicy,
) -> Result<(), Unavailability> {
    let pending = HoursLedger::new();
    for date in site.window.dates_on(day) {
        check_date(worker, site, date, &pending, policy)?;
    }
    Ok(())
}

/// Whether the worker may take the site on `day`.
pub fn is_available(worker: &Worker, site: &Site, day: Weekday, policy: &AllocationPolicy) -> bool {
    check_day(worker, site, day, policy).is_ok()
}
