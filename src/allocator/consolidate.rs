//! Whole-site consolidation: a single worker takes every service day.

use std::fmt;

use tracing::debug;

use super::pool::WorkerPool;
use crate::availability::{check_date, HoursLedger, Unavailability, HOURS_EPSILON};
use crate::models::{ContractKind, Site, Worker};
use crate::policy::AllocationPolicy;
use crate::ranking::Ranker;

/// Why a candidate cannot take the whole site.
#[derive(Debug, Clone, PartialEq)]
pub(super) enum Rejection {
    Unavailable(Unavailability),
    SiteTotal { hours: f64, cap: f64 },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::Unavailable(reason) => write!(f, "{reason}"),
            Rejection::SiteTotal { hours, cap } => {
                write!(f, "site total {hours:.1}h exceeds {cap:.1}h")
            }
        }
    }
}

/// Simulates the whole site on a worker's calendar.
///
/// Hours of earlier dates are staged in a pending ledger so they count
/// against later ones. Returns the total hours the site would add.
pub(super) fn simulate(
    worker: &Worker,
    site: &Site,
    policy: &AllocationPolicy,
) -> Result<f64, Rejection> {
    let hours = site.hours_per_day();
    let mut pending = HoursLedger::new();

    for &day in &site.service_days {
        for date in site.window.dates_on(day) {
            check_date(worker, site, date, &pending, policy).map_err(Rejection::Unavailable)?;
            pending.add(date, hours);
        }
    }

    let total = pending.total();
    if let Some(cap) = policy.consolidation_hour_cap {
        if total > cap + HOURS_EPSILON {
            return Err(Rejection::SiteTotal { hours: total, cap });
        }
    }
    Ok(total)
}

/// Finds the first ranked worker able to take the whole site.
///
/// Permanent workers are tried exclusively when any is eligible; fixed-term
/// workers are only a fallback.
pub(super) fn find_candidate(
    pool: &WorkerPool,
    site: &Site,
    policy: &AllocationPolicy,
    ranker: &Ranker,
) -> Option<usize> {
    let skills = site.required_skills();
    let eligible = pool.eligible(site, &skills, policy);

    let permanent: Vec<usize> = eligible
        .iter()
        .copied()
        .filter(|&idx| pool.worker(idx).contract_kind() == ContractKind::Permanent)
        .collect();
    let tier = if permanent.is_empty() { eligible } else { permanent };

    ranker
        .rank_indices(pool.workers(), &tier, site)
        .into_iter()
        .find(|&idx| {
            let worker = pool.worker(idx);
            match simulate(worker, site, policy) {
                Ok(_) => true,
                Err(reason) => {
                    debug!(
                        site_id = %site.id,
                        worker_id = %worker.id,
                        reason = %reason,
                        "consolidation candidate rejected"
                    );
                    false
                }
            }
        })
}
