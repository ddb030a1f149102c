//! Mutable worker working set for one run.

use std::collections::BTreeMap;

use crate::models::{Assignment, Site, Weekday, Worker};
use crate::policy::AllocationPolicy;
use crate::ranking::distance_km;

/// Workers loaded for a run.
///
/// Every booking mutates the calendars held here, so decisions taken for
/// one slot are visible to the next slot and to later sites.
#[derive(Debug, Clone, Default)]
pub struct WorkerPool {
    workers: Vec<Worker>,
}

impl WorkerPool {
    /// Creates a pool from workers in persisted order.
    pub fn new(workers: Vec<Worker>) -> Self {
        Self { workers }
    }

    pub fn workers(&self) -> &[Worker] {
        &self.workers
    }

    pub fn get(&self, id: &str) -> Option<&Worker> {
        self.workers.iter().find(|w| w.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Worker> {
        self.workers.iter_mut().find(|w| w.id == id)
    }

    pub fn len(&self) -> usize {
        self.workers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    /// Consumes the pool, returning the workers.
    pub fn into_workers(self) -> Vec<Worker> {
        self.workers
    }

    pub(crate) fn worker(&self, idx: usize) -> &Worker {
        &self.workers[idx]
    }

    /// Indices of workers holding every skill and within the policy radius.
    ///
    /// Missing coordinates on either side disable the distance filter.
    pub(crate) fn eligible(&self, site: &Site, skills: &[&str], policy: &AllocationPolicy) -> Vec<usize> {
        self.workers
            .iter()
            .enumerate()
            .filter(|(_, w)| w.has_all_skills(skills.iter().copied()))
            .filter(|(_, w)| match (policy.radius_km, distance_km(w, site)) {
                (Some(radius), Some(distance)) => distance <= radius,
                _ => true,
            })
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Books `days` of a site for a worker.
    ///
    /// Merges into an assignment for the same site and window when one
    /// exists, else appends a new one. The calendar is snapshotted into
    /// `staging` before its first change.
    pub(crate) fn book(&mut self, idx: usize, site: &Site, days: &[Weekday], staging: &mut Staging) {
        staging.record(idx, &self.workers[idx]);

        let hours = site.hours_per_day();
        let calendar = &mut self.workers[idx].calendar;
        match calendar.iter_mut().find(|a| a.matches(&site.id, &site.window)) {
            Some(existing) => {
                for &day in days {
                    existing.add_day(day, hours);
                }
            }
            None => {
                let assignment = days
                    .iter()
                    .fold(Assignment::new(site.id.clone(), site.window), |a, &day| {
                        a.with_day(day, hours)
                    });
                calendar.push(assignment);
            }
        }
    }

    /// Restores the calendars of staged workers from position `from` on.
    pub(crate) fn restore(&mut self, staging: &Staging, from: usize) {
        for &idx in staging.touched.iter().skip(from) {
            if let Some(calendar) = staging.snapshots.get(&idx) {
                self.workers[idx].calendar = calendar.clone();
            }
        }
    }
}

/// Pre-site copies of the calendars a site changes.
#[derive(Debug, Clone, Default)]
pub(crate) struct Staging {
    touched: Vec<usize>,
    snapshots: BTreeMap<usize, Vec<Assignment>>,
}

impl Staging {
    fn record(&mut self, idx: usize, worker: &Worker) {
        if !self.snapshots.contains_key(&idx) {
            self.snapshots.insert(idx, worker.calendar.clone());
            self.touched.push(idx);
        }
    }

    /// Touched worker indices in first-touch order.
    pub(crate) fn touched(&self) -> &[usize] {
        &self.touched
    }
}
