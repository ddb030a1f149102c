//! Undoing a site's allocation.
//!
//! Reset is the inverse of the allocator's visible effects for one site:
//! every assignment referencing the site is removed from the workers it
//! names, and the site goes back to `New` with no team and no note.

use tracing::{debug, info, instrument, warn};

use crate::allocator::WorkerPool;
use crate::error::{AllocationError, AllocationResult};
use crate::models::{Site, SiteStatus, Worker};
use crate::store::Store;

/// Removes every assignment for `site_id`. Returns how many were removed.
fn strip_site(worker: &mut Worker, site_id: &str) -> usize {
    let before = worker.calendar.len();
    worker.calendar.retain(|a| a.site_id != site_id);
    before - worker.calendar.len()
}

fn clear_allocation(site: &mut Site) {
    site.assigned_workers.clear();
    site.status = SiteStatus::New;
    site.note = None;
}

/// Releases a site inside a working set.
///
/// Returns `false`, leaving everything untouched, when the site has no
/// assigned workers.
pub fn release_site(pool: &mut WorkerPool, site: &mut Site) -> bool {
    if site.assigned_workers.is_empty() {
        return false;
    }
    for worker_id in &site.assigned_workers {
        if let Some(worker) = pool.get_mut(worker_id) {
            strip_site(worker, &site.id);
        }
    }
    clear_allocation(site);
    true
}

/// Releases a persisted site and returns it as saved.
///
/// Workers named by the site but missing from the store are skipped.
#[instrument(skip(store))]
pub fn reset_site<S: Store>(store: &mut S, site_id: &str) -> AllocationResult<Site> {
    let mut site = store
        .load_site(site_id)?
        .ok_or_else(|| AllocationError::NotFound(site_id.to_string()))?;

    if site.assigned_workers.is_empty() {
        debug!("site holds no assignments");
        return Ok(site);
    }

    for worker_id in &site.assigned_workers {
        let Some(mut worker) = store.load_worker(worker_id)? else {
            warn!(worker_id = %worker_id, "assigned worker no longer exists");
            continue;
        };
        let removed = strip_site(&mut worker, &site.id);
        if removed > 0 {
            store.save_worker(&worker)?;
        }
        debug!(worker_id = %worker_id, removed, "worker released");
    }

    let released = site.assigned_workers.len();
    clear_allocation(&mut site);
    store.save_site(&site)?;
    info!(workers = released, "site reset");
    Ok(site)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocator::Allocator;
    use crate::error::StoreError;
    use crate::models::{Assignment, DateWindow, Weekday};
    use crate::store::InMemoryStore;
    use chrono::NaiveDate;

    fn window() -> DateWindow {
        DateWindow::new(
            NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 9, 7).unwrap(),
        )
    }

    fn site() -> Site {
        Site::new("S1", window())
            .with_demand("skillA", 1)
            .with_service_days([Weekday::Monday, Weekday::Thursday])
            .with_weekly_hours(8.0)
    }

    #[test]
    fn test_reset_without_assignments_is_noop() {
        let untouched = site().with_name("Depot");
        let mut store = InMemoryStore::new().with_site(untouched.clone());

        let result = reset_site(&mut store, "S1").unwrap();

        assert_eq!(result, untouched);
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn test_reset_unknown_site() {
        let mut store = InMemoryStore::new();
        assert_eq!(
            reset_site(&mut store, "S9"),
            Err(AllocationError::NotFound("S9".into()))
        );
    }

    #[test]
    fn test_reset_removes_every_record_for_site() {
        let other_window = DateWindow::new(
            NaiveDate::from_ymd_opt(2025, 9, 8).unwrap(),
            NaiveDate::from_ymd_opt(2025, 9, 14).unwrap(),
        );
        let worker = Worker::permanent("W1")
            .with_assignment(Assignment::new("S1", window()).with_day(Weekday::Monday, 4.0))
            .with_assignment(Assignment::new("S1", other_window).with_day(Weekday::Monday, 4.0))
            .with_assignment(Assignment::new("S2", window()).with_day(Weekday::Friday, 4.0));
        let mut site = site().with_status(SiteStatus::Scheduled);
        site.assigned_workers.insert("W1".into());
        site.assigned_workers.insert("gone".into());
        site.note = Some("uncovered: thursday [skillA]".into());
        let mut store = InMemoryStore::new().with_worker(worker).with_site(site);

        let result = reset_site(&mut store, "S1").unwrap();

        assert_eq!(result.status, SiteStatus::New);
        assert!(result.assigned_workers.is_empty());
        assert!(result.note.is_none());
        let calendar = &store.worker("W1").unwrap().calendar;
        assert_eq!(calendar.len(), 1);
        assert_eq!(calendar[0].site_id, "S2");
        assert_eq!(store.site("S1").unwrap(), &result);
    }

    #[test]
    fn test_reset_propagates_store_failure() {
        let mut site = site().with_status(SiteStatus::Scheduled);
        site.assigned_workers.insert("W1".into());
        let worker = Worker::permanent("W1")
            .with_assignment(Assignment::new("S1", window()).with_day(Weekday::Monday, 4.0));
        let mut store = InMemoryStore::new().with_worker(worker).with_site(site);
        store.fail_site_saves("S1");

        let err = reset_site(&mut store, "S1").unwrap_err();
        assert!(matches!(err, AllocationError::Persistence(StoreError::Rejected(_))));
        // worker writes already made stay durable
        assert!(store.worker("W1").unwrap().calendar.is_empty());
    }

    #[test]
    fn test_release_then_allocate_restores_coverage() {
        let mut pool = WorkerPool::new(vec![Worker::permanent("W1").with_skill("skillA")]);
        let mut site = site();
        let allocator = Allocator::new();

        allocator.allocate_in_memory(&mut pool, &mut site);
        let staffed = (pool.clone().into_workers(), site.clone());

        assert!(release_site(&mut pool, &mut site));
        assert!(pool.get("W1").unwrap().calendar.is_empty());
        assert_eq!(site.status, SiteStatus::New);

        allocator.allocate_in_memory(&mut pool, &mut site);
        assert_eq!((pool.into_workers(), site), staffed);
    }

    #[test]
    fn test_reset_after_run() {
        let mut store = InMemoryStore::new()
            .with_worker(Worker::permanent("W1").with_skill("skillA"))
            .with_site(site());
        Allocator::new().run(&mut store).unwrap();
        assert!(store.worker("W1").unwrap().holds_site("S1"));

        reset_site(&mut store, "S1").unwrap();

        assert!(!store.worker("W1").unwrap().holds_site("S1"));
        assert_eq!(store.site("S1").unwrap().status, SiteStatus::New);
    }
}
