//! Worker model.
//!
//! Workers are the people staffed onto sites. Each worker has a skillset,
//! an employment contract, optional home coordinates and a calendar of
//! assignments that only the allocator writes and only reset removes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::{Assignment, GeoPoint};

/// A person who can be assigned to sites.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Worker {
    /// Unique worker identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Skill tags (e.g., "windows", "floors").
    pub skills: BTreeSet<String>,
    /// Employment contract.
    pub contract: Contract,
    /// Home coordinates, if resolved.
    pub home: Option<GeoPoint>,
    /// Assignments held by this worker.
    #[serde(default)]
    pub calendar: Vec<Assignment>,
}

/// Employment contract.
///
/// The end date exists only for fixed-term contracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Contract {
    /// Open-ended contract.
    Permanent,
    /// Contract ending on `ends_on` (last working day, inclusive).
    FixedTerm { ends_on: NaiveDate },
}

/// Contract classification, ordered by staffing preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ContractKind {
    Permanent,
    FixedTerm,
}

impl Contract {
    /// Classification of this contract.
    pub fn kind(&self) -> ContractKind {
        match self {
            Contract::Permanent => ContractKind::Permanent,
            Contract::FixedTerm { .. } => ContractKind::FixedTerm,
        }
    }

    /// Whether the contract still runs on `date`.
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        match self {
            Contract::Permanent => true,
            Contract::FixedTerm { ends_on } => date <= *ends_on,
        }
    }
}

impl Worker {
    /// Creates a worker with the given contract.
    pub fn new(id: impl Into<String>, contract: Contract) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            skills: BTreeSet::new(),
            contract,
            home: None,
            calendar: Vec::new(),
        }
    }

    /// Creates a worker on a permanent contract.
    pub fn permanent(id: impl Into<String>) -> Self {
        Self::new(id, Contract::Permanent)
    }

    /// Creates a worker on a fixed-term contract.
    pub fn fixed_term(id: impl Into<String>, ends_on: NaiveDate) -> Self {
        Self::new(id, Contract::FixedTerm { ends_on })
    }

    /// Sets the worker name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Adds a skill.
    pub fn with_skill(mut self, skill: impl Into<String>) -> Self {
        self.skills.insert(skill.into());
        self
    }

    /// Sets the home coordinates.
    pub fn with_home(mut self, lat: f64, lng: f64) -> Self {
        self.home = Some(GeoPoint::new(lat, lng));
        self
    }

    /// Adds an existing assignment to the calendar.
    pub fn with_assignment(mut self, assignment: Assignment) -> Self {
        self.calendar.push(assignment);
        self
    }

    /// Whether this worker has a given skill.
    pub fn has_skill(&self, skill: &str) -> bool {
        self.skills.contains(skill)
    }

    /// Whether this worker's skillset is a superset of `skills`.
    pub fn has_all_skills<'a>(&self, skills: impl IntoIterator<Item = &'a str>) -> bool {
        skills.into_iter().all(|s| self.has_skill(s))
    }

    /// Contract classification.
    #[inline]
    pub fn contract_kind(&self) -> ContractKind {
        self.contract.kind()
    }

    /// Whether the contract still runs on `date`.
    pub fn is_contract_active_on(&self, date: NaiveDate) -> bool {
        self.contract.is_active_on(date)
    }

    /// Distance from home to `point` (km), if the home is known.
    pub fn distance_to(&self, point: &GeoPoint) -> Option<f64> {
        self.home.as_ref().map(|h| h.distance_km(point))
    }

    /// Assignments referencing a site.
    pub fn assignments_for_site(&self, site_id: &str) -> Vec<&Assignment> {
        self.calendar
            .iter()
            .filter(|a| a.site_id == site_id)
            .collect()
    }

    /// Whether any assignment references a site.
    pub fn holds_site(&self, site_id: &str) -> bool {
        self.calendar.iter().any(|a| a.site_id == site_id)
    }

    /// Whether the worker is committed anywhere on `date`.
    pub fn is_booked_on(&self, date: NaiveDate) -> bool {
        self.calendar.iter().any(|a| a.covers(date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DateWindow, Weekday};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_worker_builder() {
        let w = Worker::permanent("W1")
            .with_name("Alice")
            .with_skill("windows")
            .with_skill("floors")
            .with_home(43.2992, 5.3748);

        assert_eq!(w.id, "W1");
        assert_eq!(w.name, "Alice");
        assert_eq!(w.contract_kind(), ContractKind::Permanent);
        assert!(w.has_skill("windows"));
        assert!(!w.has_skill("carpets"));
        assert!(w.has_all_skills(["windows", "floors"]));
        assert!(!w.has_all_skills(["windows", "carpets"]));
        assert!(w.has_all_skills(std::iter::empty::<&str>()));
    }

    #[test]
    fn test_fixed_term_contract() {
        let w = Worker::fixed_term("W2", d(2025, 9, 10));
        assert_eq!(w.contract_kind(), ContractKind::FixedTerm);
        assert!(w.is_contract_active_on(d(2025, 9, 10)));
        assert!(!w.is_contract_active_on(d(2025, 9, 11)));
        assert!(Worker::permanent("W3").is_contract_active_on(d(2099, 1, 1)));
    }

    #[test]
    fn test_contract_preference_order() {
        assert!(ContractKind::Permanent < ContractKind::FixedTerm);
    }

    #[test]
    fn test_calendar_queries() {
        let window = DateWindow::new(d(2025, 9, 1), d(2025, 9, 7));
        let w = Worker::permanent("W1")
            .with_assignment(Assignment::new("S1", window).with_day(Weekday::Monday, 7.0))
            .with_assignment(Assignment::new("S2", window).with_day(Weekday::Tuesday, 7.0));

        assert!(w.holds_site("S1"));
        assert!(!w.holds_site("S3"));
        assert_eq!(w.assignments_for_site("S2").len(), 1);
        assert!(w.is_booked_on(d(2025, 9, 1)));
        assert!(!w.is_booked_on(d(2025, 9, 3)));
    }

    #[test]
    fn test_distance_without_home() {
        let w = Worker::permanent("W1");
        assert!(w.distance_to(&GeoPoint::new(0.0, 0.0)).is_none());
    }

    #[test]
    fn test_contract_serde_tagged() {
        let json = serde_json::to_string(&Contract::FixedTerm { ends_on: d(2025, 12, 31) }).unwrap();
        assert_eq!(json, r#"{"type":"fixed_term","ends_on":"2025-12-31"}"#);
    }
}
