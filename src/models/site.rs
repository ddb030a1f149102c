//! Site model.
//!
//! A site is a job location with staffing demand over a date window.
//! Demand is expressed per skill as a headcount; hours are spread evenly
//! over the declared service weekdays.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::{DateWindow, GeoPoint, Weekday};

/// A job site to be staffed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    /// Unique site identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Site coordinates, if resolved.
    pub location: Option<GeoPoint>,
    /// Headcount required per skill.
    pub demand: Demand,
    /// Service period (inclusive).
    pub window: DateWindow,
    /// Weekdays on which the site is serviced, in declaration order.
    pub service_days: Vec<Weekday>,
    /// Target hours per week.
    pub weekly_hours: f64,
    /// Lifecycle status.
    pub status: SiteStatus,
    /// Workers holding at least one assignment on this site.
    #[serde(default)]
    pub assigned_workers: BTreeSet<String>,
    /// Diagnostic note left by the last allocation.
    #[serde(default)]
    pub note: Option<String>,
}

/// Site lifecycle status.
///
/// The allocator only moves sites between `New` and `Scheduled`; the later
/// states are owned by the surrounding application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SiteStatus {
    /// Awaiting allocation (or partially covered).
    New,
    /// Fully staffed.
    Scheduled,
    /// Work has started.
    InProgress,
    /// Work is finished.
    Completed,
}

/// One skill requirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillDemand {
    /// Required skill.
    pub skill: String,
    /// Number of workers needed with this skill.
    pub count: u32,
}

/// Ordered set of skill requirements.
///
/// Skills are identified by value. Setting a skill that is already present
/// replaces its count in place, so declaration order is stable. Deserialized
/// lists go through the same rule: a repeated skill keeps its first position
/// and its last count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<SkillDemand>", into = "Vec<SkillDemand>")]
pub struct Demand {
    entries: Vec<SkillDemand>,
}

impl Demand {
    /// Creates an empty demand.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the headcount for a skill.
    pub fn set(&mut self, skill: impl Into<String>, count: u32) {
        let skill = skill.into();
        match self.entries.iter_mut().find(|e| e.skill == skill) {
            Some(entry) => entry.count = count,
            None => self.entries.push(SkillDemand { skill, count }),
        }
    }

    /// Headcount for a skill (0 if absent).
    pub fn count_for(&self, skill: &str) -> u32 {
        self.entries
            .iter()
            .find(|e| e.skill == skill)
            .map(|e| e.count)
            .unwrap_or(0)
    }

    /// Requirements in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &SkillDemand> {
        self.entries.iter()
    }

    /// Required skills in declaration order.
    pub fn skills(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.skill.as_str())
    }

    /// Sum of headcounts.
    pub fn total_headcount(&self) -> u32 {
        self.entries.iter().map(|e| e.count).sum()
    }

    /// Number of distinct skills.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no skill is required.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, u32)> for Demand {
    fn from_iter<I: IntoIterator<Item = (S, u32)>>(iter: I) -> Self {
        let mut demand = Demand::new();
        for (skill, count) in iter {
            demand.set(skill, count);
        }
        demand
    }
}

impl From<Vec<SkillDemand>> for Demand {
    fn from(entries: Vec<SkillDemand>) -> Self {
        entries.into_iter().map(|e| (e.skill, e.count)).collect()
    }
}

impl From<Demand> for Vec<SkillDemand> {
    fn from(demand: Demand) -> Self {
        demand.entries
    }
}

impl Site {
    /// Creates a new site with no demand and no service days.
    pub fn new(id: impl Into<String>, window: DateWindow) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            location: None,
            demand: Demand::new(),
            window,
            service_days: Vec::new(),
            weekly_hours: 0.0,
            status: SiteStatus::New,
            assigned_workers: BTreeSet::new(),
            note: None,
        }
    }

    /// Sets the site name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the site coordinates.
    pub fn with_location(mut self, lat: f64, lng: f64) -> Self {
        self.location = Some(GeoPoint::new(lat, lng));
        self
    }

    /// Sets the headcount for a skill.
    pub fn with_demand(mut self, skill: impl Into<String>, count: u32) -> Self {
        self.demand.set(skill, count);
        self
    }

    /// Sets the service weekdays. Duplicates are dropped, first one wins.
    pub fn with_service_days(mut self, days: impl IntoIterator<Item = Weekday>) -> Self {
        self.service_days.clear();
        for day in days {
            if !self.service_days.contains(&day) {
                self.service_days.push(day);
            }
        }
        self
    }

    /// Sets the weekly target hours.
    pub fn with_weekly_hours(mut self, hours: f64) -> Self {
        self.weekly_hours = hours;
        self
    }

    /// Sets the status.
    pub fn with_status(mut self, status: SiteStatus) -> Self {
        self.status = status;
        self
    }

    /// Hours worked on each service day.
    ///
    /// The weekly target is spread evenly over the service days; with no
    /// service days the divisor is 1.
    pub fn hours_per_day(&self) -> f64 {
        self.weekly_hours / self.service_days.len().max(1) as f64
    }

    /// Whether the weekly target reaches the full-time threshold.
    pub fn is_full_time(&self, threshold: f64) -> bool {
        self.weekly_hours >= threshold
    }

    /// Skills with a non-zero headcount, in declaration order.
    pub fn required_skills(&self) -> Vec<&str> {
        self.demand
            .iter()
            .filter(|e| e.count > 0)
            .map(|e| e.skill.as_str())
            .collect()
    }

    /// Whether the site has been fully staffed.
    pub fn is_scheduled(&self) -> bool {
        self.status == SiteStatus::Scheduled
    }
}
