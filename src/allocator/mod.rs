//! Greedy site staffing.
//!
//! # Algorithm
//!
//! Sites are processed one at a time against a shared [`WorkerPool`]:
//!
//! 1. A site demanding nobody is scheduled as is.
//! 2. **Consolidation**: the best ranked worker holding every required skill
//!    and free on every service date takes the whole site.
//! 3. **Decomposition** (only below the full-time threshold): each
//!    (skill, weekday, post) slot goes to the best ranked worker free on
//!    every date of that weekday.
//!
//! Bookings are written to the pool immediately, so later slots and later
//! sites see them. A site is `Scheduled` only when nothing is left
//! uncovered; otherwise it stays `New` with a note.
//!
//! # Complexity
//! O(s * k * d * w * c) where s=sites, k=slots/site, d=dates/weekday,
//! w=workers, c=calendar length.

mod consolidate;
mod decompose;
mod pool;

pub use decompose::{slots, Slot};
pub use pool::WorkerPool;

use pool::Staging;
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::error::{AllocationError, AllocationResult, StoreError};
use crate::models::{Site, SiteStatus};
use crate::policy::AllocationPolicy;
use crate::ranking::Ranker;
use crate::store::Store;
use crate::workload;

/// How a scheduled site was staffed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StaffingMethod {
    /// Nothing was demanded.
    NoDemand,
    /// One worker took the whole site.
    Consolidated,
    /// Slots were filled one by one.
    Decomposed,
}

/// Result of staffing one site.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SiteOutcome {
    Scheduled(StaffingMethod),
    /// Some slots found nobody.
    Partial { uncovered: Vec<Slot> },
    /// Full-time site no single worker could take.
    FullSiteUncovered,
    /// Nobody holds any demanded skill within range.
    NoCandidate,
}

impl SiteOutcome {
    pub fn is_scheduled(&self) -> bool {
        matches!(self, SiteOutcome::Scheduled(_))
    }

    /// Diagnostic note stored on the site.
    pub fn note(&self) -> Option<String> {
        match self {
            SiteOutcome::Scheduled(_) => None,
            SiteOutcome::Partial { uncovered } => {
                let slots: Vec<String> = uncovered.iter().map(Slot::to_string).collect();
                Some(format!("uncovered: {}", slots.join(", ")))
            }
            SiteOutcome::FullSiteUncovered => Some("no worker available for full site".to_string()),
            SiteOutcome::NoCandidate => Some("no eligible worker".to_string()),
        }
    }
}

/// What happened to one site.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteReport {
    pub site_id: String,
    pub outcome: SiteOutcome,
    /// Workers whose calendars changed, in booking order.
    pub workers: Vec<String>,
}

/// A site whose results could not be fully written.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistenceFailure {
    pub site_id: String,
    pub error: StoreError,
}

/// Summary of a run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    /// Sites whose results were written, in processing order.
    pub sites: Vec<SiteReport>,
    pub failures: Vec<PersistenceFailure>,
}

impl RunReport {
    /// Sites fully staffed.
    pub fn scheduled(&self) -> usize {
        self.sites.iter().filter(|r| r.outcome.is_scheduled()).count()
    }

    /// Sites left partially staffed, unstaffed, or not written.
    pub fn unresolved(&self) -> usize {
        self.sites.len() - self.scheduled() + self.failures.len()
    }

    pub fn site(&self, site_id: &str) -> Option<&SiteReport> {
        self.sites.iter().find(|r| r.site_id == site_id)
    }
}

/// Staffs sites from a worker pool.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use u_staffing::allocator::{Allocator, WorkerPool};
/// use u_staffing::models::{DateWindow, Site, SiteStatus, Weekday, Worker};
///
/// let window = DateWindow::new(
///     NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2025, 9, 7).unwrap(),
/// );
/// let mut site = Site::new("S1", window)
///     .with_demand("windows", 1)
///     .with_service_days([Weekday::Monday, Weekday::Wednesday])
///     .with_weekly_hours(8.0);
/// let mut pool = WorkerPool::new(vec![Worker::permanent("W1").with_skill("windows")]);
///
/// let outcome = Allocator::new().allocate_in_memory(&mut pool, &mut site);
/// assert!(outcome.is_scheduled());
/// assert_eq!(site.status, SiteStatus::Scheduled);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Allocator {
    policy: AllocationPolicy,
    ranker: Ranker,
}

impl Allocator {
    /// Creates an allocator with the default policy and standard ranking.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(mut self, policy: AllocationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_ranker(mut self, ranker: Ranker) -> Self {
        self.ranker = ranker;
        self
    }

    pub fn policy(&self) -> &AllocationPolicy {
        &self.policy
    }

    /// Staffs every `New` site in the store.
    ///
    /// A write failure on one site is recorded in the report and the run
    /// moves on. Only the initial loads can fail the whole run.
    ///
    /// Partially covered sites stay `New` and are staffed again from
    /// scratch by the next run; reset them first to avoid stacking
    /// coverage on days already held.
    #[instrument(skip_all)]
    pub fn run<S: Store>(&self, store: &mut S) -> AllocationResult<RunReport> {
        let mut pool = WorkerPool::new(store.load_workers()?);
        let sites = store.load_sites(SiteStatus::New)?;
        info!(sites = sites.len(), workers = pool.len(), "allocation run started");

        let mut report = RunReport::default();
        for mut site in sites {
            if site.status != SiteStatus::New {
                continue;
            }
            match self.commit_site(store, &mut pool, &mut site) {
                Ok(site_report) => report.sites.push(site_report),
                Err(error) => {
                    warn!(site_id = %site.id, error = %error, "site results not saved");
                    report.failures.push(PersistenceFailure {
                        site_id: site.id.clone(),
                        error,
                    });
                }
            }
        }

        workload::log_summary(pool.workers());
        info!(
            scheduled = report.scheduled(),
            unresolved = report.unresolved(),
            failures = report.failures.len(),
            "allocation run finished"
        );
        Ok(report)
    }

    /// Staffs a single `New` site.
    ///
    /// Partial coverage is returned as `Ok`; the outcome says what is
    /// missing.
    #[instrument(skip(self, store))]
    pub fn allocate_site<S: Store>(&self, store: &mut S, site_id: &str) -> AllocationResult<SiteReport> {
        let mut site = store
            .load_site(site_id)?
            .ok_or_else(|| AllocationError::NotFound(site_id.to_string()))?;
        if site.status != SiteStatus::New {
            return Err(AllocationError::Conflict {
                site_id: site.id,
                status: site.status,
            });
        }

        let mut pool = WorkerPool::new(store.load_workers()?);
        let report = self.commit_site(store, &mut pool, &mut site)?;
        if report.outcome == SiteOutcome::NoCandidate {
            return Err(AllocationError::NoCandidate(site.id));
        }
        Ok(report)
    }

    /// Staffs a site against an in-memory pool.
    ///
    /// Updates the site's status, team and note. Nothing is persisted.
    pub fn allocate_in_memory(&self, pool: &mut WorkerPool, site: &mut Site) -> SiteOutcome {
        let mut staging = Staging::default();
        self.process(pool, site, &mut staging)
    }

    fn process(&self, pool: &mut WorkerPool, site: &mut Site, staging: &mut Staging) -> SiteOutcome {
        let outcome = self.resolve(pool, site, staging);

        for &idx in staging.touched() {
            site.assigned_workers.insert(pool.worker(idx).id.clone());
        }
        site.status = if outcome.is_scheduled() {
            SiteStatus::Scheduled
        } else {
            SiteStatus::New
        };
        site.note = outcome.note();
        outcome
    }

    fn resolve(&self, pool: &mut WorkerPool, site: &Site, staging: &mut Staging) -> SiteOutcome {
        let skills = site.required_skills();
        if skills.is_empty() || site.service_days.is_empty() {
            return SiteOutcome::Scheduled(StaffingMethod::NoDemand);
        }

        let nobody = skills
            .iter()
            .all(|skill| pool.eligible(site, &[*skill], &self.policy).is_empty());
        if nobody {
            return SiteOutcome::NoCandidate;
        }

        if let Some(idx) = consolidate::find_candidate(pool, site, &self.policy, &self.ranker) {
            pool.book(idx, site, &site.service_days, staging);
            return SiteOutcome::Scheduled(StaffingMethod::Consolidated);
        }

        if site.is_full_time(self.policy.full_time_threshold) {
            return SiteOutcome::FullSiteUncovered;
        }

        let uncovered = decompose::decompose(pool, site, &self.policy, &self.ranker, staging);
        if uncovered.is_empty() {
            SiteOutcome::Scheduled(StaffingMethod::Decomposed)
        } else {
            SiteOutcome::Partial { uncovered }
        }
    }

    /// Staffs a site and writes the site, then every changed worker.
    ///
    /// The site goes first so its team names every worker that may end up
    /// holding it, which keeps a later reset complete. If the site write
    /// fails nothing else is written. If a worker write fails, the
    /// calendars not yet written are restored and the site is rewritten as
    /// `New` with the workers actually saved.
    fn commit_site<S: Store>(
        &self,
        store: &mut S,
        pool: &mut WorkerPool,
        site: &mut Site,
    ) -> Result<SiteReport, StoreError> {
        let previous = site.assigned_workers.clone();
        let mut staging = Staging::default();
        let outcome = self.process(pool, site, &mut staging);

        if let Err(error) = store.save_site(site) {
            pool.restore(&staging, 0);
            return Err(error);
        }

        for (pos, &idx) in staging.touched().iter().enumerate() {
            if let Err(error) = store.save_worker(pool.worker(idx)) {
                pool.restore(&staging, pos);
                site.assigned_workers = previous;
                site.assigned_workers.extend(
                    staging.touched()[..pos]
                        .iter()
                        .map(|&saved| pool.worker(saved).id.clone()),
                );
                site.status = SiteStatus::New;
                if let Err(rewrite) = store.save_site(site) {
                    warn!(site_id = %site.id, error = %rewrite, "site team not rewritten");
                }
                return Err(error);
            }
        }

        info!(
            site_id = %site.id,
            status = ?site.status,
            workers = staging.touched().len(),
            note = site.note.as_deref().unwrap_or(""),
            "site processed"
        );

        Ok(SiteReport {
            site_id: site.id.clone(),
            outcome,
            workers: staging
                .touched()
                .iter()
                .map(|&idx| pool.worker(idx).id.clone())
                .collect(),
        })
    }
}
