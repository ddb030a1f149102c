//! Candidate ranking for site staffing.
//!
//! Orders the workers eligible for a site. The standard chain prefers
//! permanent contracts over fixed-term ones, then shorter home-to-site
//! distance; remaining ties keep the input order.
//!
//! # Usage
//!
//! ```
//! use u_staffing::ranking::{Ranker, rules};
//!
//! let ranker = Ranker::new()
//!     .with_rule(rules::ContractPreference)
//!     .with_rule(rules::Proximity);
//! ```
//!
//! Radius filtering is not a ranking concern; the allocator drops
//! out-of-range candidates before ranking.

mod engine;
pub mod rules;

pub use engine::{Ranker, TieBreaker};

use crate::models::{Site, Worker};
use std::fmt::Debug;

/// Score returned by a ranking rule.
///
/// Lower scores rank first.
pub type RankScore = f64;

/// A rule contributing to candidate order.
///
/// # Score Convention
/// **Lower score = ranked earlier.** Rules that cannot score a worker
/// (e.g. missing coordinates) should return `f64::INFINITY`.
pub trait RankingRule: Send + Sync + Debug {
    /// Rule name (e.g., "CONTRACT", "PROXIMITY").
    fn name(&self) -> &'static str;

    /// Scores a worker for a site.
    fn score(&self, worker: &Worker, site: &Site) -> RankScore;

    /// Rule description.
    fn description(&self) -> &'static str {
        self.name()
    }
}

/// Home-to-site distance (km), if both ends have coordinates.
pub fn distance_km(worker: &Worker, site: &Site) -> Option<f64> {
    site.location.as_ref().and_then(|loc| worker.distance_to(loc))
}

/// Ranks candidates with the standard chain.
pub fn rank<'a>(candidates: Vec<&'a Worker>, site: &Site) -> Vec<&'a Worker> {
    Ranker::standard().rank(candidates, site)
}
