//! Workload and coverage reporting.
//!
//! Read-only projections over worker calendars and sites, for reporting
//! layers and for checking a finished run.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Weekly hours | Hours per worker per ISO week |
//! | Daily hours | Hours per worker per calendar date |
//! | Peak week | Busiest ISO week of a worker |
//! | Coverage | Workers holding a site, with home-to-site distance |

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::availability::{HoursLedger, HOURS_EPSILON};
use crate::models::{Contract, Site, SiteStatus, WeekKey, Weekday, Worker};
use crate::policy::AllocationPolicy;
use crate::ranking::distance_km;

/// Hours booked by one worker.
#[derive(Debug, Clone)]
pub struct WorkerLoad {
    pub worker_id: String,
    pub ledger: HoursLedger,
}

impl WorkerLoad {
    /// Projects a worker's calendar.
    pub fn calculate(worker: &Worker) -> Self {
        Self {
            worker_id: worker.id.clone(),
            ledger: HoursLedger::from_calendar(&worker.calendar),
        }
    }

    /// Hours per ISO week.
    pub fn weekly_hours(&self) -> &BTreeMap<WeekKey, f64> {
        self.ledger.weekly()
    }

    /// Hours per date.
    pub fn daily_hours(&self) -> &BTreeMap<NaiveDate, f64> {
        self.ledger.daily()
    }

    /// Busiest ISO week (earliest on ties).
    pub fn peak_week(&self) -> Option<(WeekKey, f64)> {
        peak(self.ledger.weekly())
    }

    /// Busiest date (earliest on ties).
    pub fn peak_day(&self) -> Option<(NaiveDate, f64)> {
        peak(self.ledger.daily())
    }

    pub fn total_hours(&self) -> f64 {
        self.ledger.total()
    }

    /// Whether every date and week stays within the policy caps.
    pub fn within(&self, policy: &AllocationPolicy) -> bool {
        let daily_ok = self
            .peak_day()
            .map_or(true, |(_, h)| h <= policy.daily_hour_cap + HOURS_EPSILON);
        let weekly_ok = self
            .peak_week()
            .map_or(true, |(_, h)| h <= policy.weekly_hour_cap + HOURS_EPSILON);
        daily_ok && weekly_ok
    }
}

fn peak<K: Copy>(hours: &BTreeMap<K, f64>) -> Option<(K, f64)> {
    hours.iter().fold(None, |best, (&key, &h)| match best {
        Some((_, top)) if top >= h => best,
        _ => Some((key, h)),
    })
}

/// A worker holding part of a site.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageEntry {
    pub worker_id: String,
    pub name: String,
    /// Home-to-site distance, when both ends have coordinates.
    pub distance_km: Option<f64>,
    pub days: BTreeSet<Weekday>,
    pub weekly_hours: f64,
}

/// Staffing of one site.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteCoverage {
    pub site_id: String,
    pub name: String,
    pub status: SiteStatus,
    pub note: Option<String>,
    pub workers: Vec<CoverageEntry>,
}

impl SiteCoverage {
    /// Lists the workers holding `site`, in worker order.
    pub fn calculate(site: &Site, workers: &[Worker]) -> Self {
        let entries = workers
            .iter()
            .filter_map(|worker| {
                let held = worker.assignments_for_site(&site.id);
                if held.is_empty() {
                    return None;
                }
                let days: BTreeSet<Weekday> = held.iter().flat_map(|a| a.days.iter().copied()).collect();
                let weekly_hours: f64 = held
                    .iter()
                    .flat_map(|a| a.days.iter().map(move |&d| a.hours_on(d)))
                    .sum();
                Some(CoverageEntry {
                    worker_id: worker.id.clone(),
                    name: worker.name.clone(),
                    distance_km: distance_km(worker, site),
                    days,
                    weekly_hours,
                })
            })
            .collect();

        Self {
            site_id: site.id.clone(),
            name: site.name.clone(),
            status: site.status,
            note: site.note.clone(),
            workers: entries,
        }
    }
}

/// Coverage of every site.
pub fn coverage(sites: &[Site], workers: &[Worker]) -> Vec<SiteCoverage> {
    sites
        .iter()
        .map(|site| SiteCoverage::calculate(site, workers))
        .collect()
}

/// A broken staffing rule found in persisted state.
#[derive(Debug, Clone, PartialEq)]
pub enum Violation {
    /// Two assignments of one worker cover the same date.
    DoubleBooked { worker_id: String, date: NaiveDate },
    /// Daily hours above the cap.
    DailyCap { worker_id: String, date: NaiveDate, hours: f64 },
    /// Weekly hours above the cap.
    WeeklyCap { worker_id: String, week: WeekKey, hours: f64 },
    /// Work booked after a fixed-term contract ends.
    ContractOverrun { worker_id: String, date: NaiveDate },
    /// `assigned_workers` disagrees with the calendars holding the site.
    TeamMismatch { site_id: String },
}

/// Checks workers and sites against the staffing rules.
pub fn audit(workers: &[Worker], sites: &[Site], policy: &AllocationPolicy) -> Vec<Violation> {
    let mut violations = Vec::new();

    for worker in workers {
        let mut seen = BTreeSet::new();
        for date in worker.calendar.iter().flat_map(|a| a.covered_dates()) {
            if !seen.insert(date) {
                violations.push(Violation::DoubleBooked {
                    worker_id: worker.id.clone(),
                    date,
                });
            }
            if let Contract::FixedTerm { ends_on } = worker.contract {
                if date > ends_on {
                    violations.push(Violation::ContractOverrun {
                        worker_id: worker.id.clone(),
                        date,
                    });
                }
            }
        }

        let load = WorkerLoad::calculate(worker);
        for (&date, &hours) in load.daily_hours() {
            if hours > policy.daily_hour_cap + HOURS_EPSILON {
                violations.push(Violation::DailyCap {
                    worker_id: worker.id.clone(),
                    date,
                    hours,
                });
            }
        }
        for (&week, &hours) in load.weekly_hours() {
            if hours > policy.weekly_hour_cap + HOURS_EPSILON {
                violations.push(Violation::WeeklyCap {
                    worker_id: worker.id.clone(),
                    week,
                    hours,
                });
            }
        }
    }

    for site in sites {
        let holders: BTreeSet<String> = workers
            .iter()
            .filter(|w| w.holds_site(&site.id))
            .map(|w| w.id.clone())
            .collect();
        if holders != site.assigned_workers {
            violations.push(Violation::TeamMismatch {
                site_id: site.id.clone(),
            });
        }
    }

    violations
}

/// Logs each worker's weekly hours at debug level.
pub fn log_summary(workers: &[Worker]) {
    for worker in workers {
        let load = WorkerLoad::calculate(worker);
        if load.ledger.is_empty() {
            continue;
        }
        let weeks: Vec<String> = load
            .weekly_hours()
            .iter()
            .map(|(week, hours)| format!("{week}={hours:.1}h"))
            .collect();
        debug!(worker_id = %worker.id, weeks = %weeks.join(", "), "weekly hours");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Assignment, DateWindow};

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, day).unwrap()
    }

    fn fortnight() -> DateWindow {
        DateWindow::new(d(1), d(14))
    }

    #[test]
    fn test_worker_load() {
        let worker = Worker::permanent("W1").with_assignment(
            Assignment::new("S1", fortnight())
                .with_day(Weekday::Monday, 7.0)
                .with_day(Weekday::Friday, 3.0),
        );
        let load = WorkerLoad::calculate(&worker);

        assert_eq!(load.weekly_hours().len(), 2);
        assert!((load.total_hours() - 20.0).abs() < 1e-9);
        assert_eq!(load.peak_day(), Some((d(1), 7.0)));
        assert_eq!(load.peak_week().map(|(w, _)| w.week), Some(36));
        assert!(load.within(&AllocationPolicy::default()));
        assert!(!load.within(&AllocationPolicy::default().with_daily_hour_cap(6.0)));
    }

    #[test]
    fn test_coverage_lists_holders_with_distance() {
        let site = Site::new("S1", fortnight())
            .with_name("Depot")
            .with_location(43.30, 5.37);
        let workers = vec![
            Worker::permanent("W1")
                .with_name("Alice")
                .with_home(43.30, 5.37)
                .with_assignment(Assignment::new("S1", fortnight()).with_day(Weekday::Monday, 4.0)),
            Worker::permanent("W2").with_name("Bob"),
        ];

        let cov = coverage(&[site], &workers);
        assert_eq!(cov.len(), 1);
        assert_eq!(cov[0].workers.len(), 1);
        let entry = &cov[0].workers[0];
        assert_eq!(entry.worker_id, "W1");
        assert!(entry.distance_km.unwrap() < 1e-6);
        assert!((entry.weekly_hours - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_audit_flags_overlap_and_overrun() {
        let worker = Worker::fixed_term("W1", d(5))
            .with_assignment(Assignment::new("S1", fortnight()).with_day(Weekday::Monday, 4.0))
            .with_assignment(
                Assignment::new("S2", DateWindow::new(d(1), d(1))).with_day(Weekday::Monday, 4.0),
            );
        let site = Site::new("S1", fortnight());

        let violations = audit(&[worker], &[site], &AllocationPolicy::default());

        assert!(violations.contains(&Violation::DoubleBooked {
            worker_id: "W1".into(),
            date: d(1)
        }));
        assert!(violations.contains(&Violation::ContractOverrun {
            worker_id: "W1".into(),
            date: d(8)
        }));
        assert!(violations.iter().any(|v| matches!(v, Violation::DailyCap { .. })));
        assert!(violations.contains(&Violation::TeamMismatch { site_id: "S1".into() }));
    }

    #[test]
    fn test_audit_clean() {
        let mut site = Site::new("S1", fortnight());
        site.assigned_workers.insert("W1".into());
        let worker = Worker::permanent("W1")
            .with_assignment(Assignment::new("S1", fortnight()).with_day(Weekday::Monday, 4.0));

        assert!(audit(&[worker], &[site], &AllocationPolicy::default()).is_empty());
    }
}
