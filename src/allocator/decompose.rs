//! Slot decomposition for sites below the full-time threshold.
//!
//! The demand is split into one slot per (skill, weekday, post) and each
//! slot goes to the best ranked worker free on every date of that weekday.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::pool::{Staging, WorkerPool};
use crate::availability::check_day;
use crate::models::{Site, Weekday};
use crate::policy::AllocationPolicy;
use crate::ranking::Ranker;

/// One headcount on one service day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub skill: String,
    pub day: Weekday,
    /// Zero-based post index within the skill's headcount.
    pub post: u32,
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.day, self.skill)
    }
}

/// Slots in skill order, then service-day order, then post index.
pub fn slots(site: &Site) -> Vec<Slot> {
    let mut slots = Vec::new();
    for entry in site.demand.iter() {
        for &day in &site.service_days {
            for post in 0..entry.count {
                slots.push(Slot {
                    skill: entry.skill.clone(),
                    day,
                    post,
                });
            }
        }
    }
    slots
}

/// Fills every slot it can, booking as it goes.
///
/// Returns the slots left uncovered.
pub(super) fn decompose(
    pool: &mut WorkerPool,
    site: &Site,
    policy: &AllocationPolicy,
    ranker: &Ranker,
    staging: &mut Staging,
) -> Vec<Slot> {
    let mut uncovered = Vec::new();

    for slot in slots(site) {
        let eligible = pool.eligible(site, &[slot.skill.as_str()], policy);
        let ranked = ranker.rank_indices(pool.workers(), &eligible, site);

        let chosen = ranked.into_iter().find(|&idx| {
            let worker = pool.worker(idx);
            match check_day(worker, site, slot.day, policy) {
                Ok(()) => true,
                Err(reason) => {
                    debug!(
                        site_id = %site.id,
                        worker_id = %worker.id,
                        weekday = %slot.day,
                        reason = %reason,
                        "slot candidate rejected"
                    );
                    false
                }
            }
        });

        match chosen {
            Some(idx) => pool.book(idx, site, &[slot.day], staging),
            None => {
                debug!(site_id = %site.id, slot = %slot, "slot uncovered");
                uncovered.push(slot);
            }
        }
    }

    uncovered
}
