//! Built-in ranking rules.
//!
//! All rules return lower scores for preferred workers.

use super::{distance_km, RankScore, RankingRule};
use crate::models::{ContractKind, Site, Worker};

/// Permanent contracts before fixed-term ones.
#[derive(Debug, Clone, Copy)]
pub struct ContractPreference;

impl RankingRule for ContractPreference {
    fn name(&self) -> &'static str {
        "CONTRACT"
    }

    fn score(&self, worker: &Worker, _site: &Site) -> RankScore {
        match worker.contract_kind() {
            ContractKind::Permanent => 0.0,
            ContractKind::FixedTerm => 1.0,
        }
    }

    fn description(&self) -> &'static str {
        "Permanent before fixed-term"
    }
}

/// Shorter home-to-site distance first.
///
/// Workers without a home, or any worker for a site without a location,
/// score `INFINITY` and therefore rank last.
#[derive(Debug, Clone, Copy)]
pub struct Proximity;

impl RankingRule for Proximity {
    fn name(&self) -> &'static str {
        "PROXIMITY"
    }

    fn score(&self, worker: &Worker, site: &Site) -> RankScore {
        distance_km(worker, site).unwrap_or(f64::INFINITY)
    }

    fn description(&self) -> &'static str {
        "Nearest home first"
    }
}
