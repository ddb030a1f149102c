//! Persistence seam.
//!
//! The allocator never talks to a database directly. It loads and saves
//! whole records through [`Store`]; each save is an independent durable
//! write, and no multi-record transaction is assumed.

use std::collections::BTreeSet;

use crate::error::StoreError;
use crate::models::{Site, SiteStatus, Worker};

/// Record storage consumed by the allocator and reset.
pub trait Store {
    /// All workers, in persisted order.
    fn load_workers(&self) -> Result<Vec<Worker>, StoreError>;

    /// One worker by id.
    fn load_worker(&self, id: &str) -> Result<Option<Worker>, StoreError>;

    /// All sites with the given status, in persisted order.
    fn load_sites(&self, status: SiteStatus) -> Result<Vec<Site>, StoreError>;

    /// One site by id.
    fn load_site(&self, id: &str) -> Result<Option<Site>, StoreError>;

    /// Writes a full worker record.
    fn save_worker(&mut self, worker: &Worker) -> Result<(), StoreError>;

    /// Writes a full site record.
    fn save_site(&mut self, site: &Site) -> Result<(), StoreError>;
}

/// Vector-backed store.
///
/// Intended for tests and embedding. Saves can be made to fail for chosen
/// record ids to exercise partial-failure paths.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    workers: Vec<Worker>,
    sites: Vec<Site>,
    failing_workers: BTreeSet<String>,
    failing_sites: BTreeSet<String>,
    writes: usize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a worker record.
    pub fn with_worker(mut self, worker: Worker) -> Self {
        self.upsert_worker(worker);
        self
    }

    /// Adds a site record.
    pub fn with_site(mut self, site: Site) -> Self {
        self.upsert_site(site);
        self
    }

    /// Makes every save of this worker fail.
    pub fn fail_worker_saves(&mut self, id: impl Into<String>) {
        self.failing_workers.insert(id.into());
    }

    /// Makes every save of this site fail.
    pub fn fail_site_saves(&mut self, id: impl Into<String>) {
        self.failing_sites.insert(id.into());
    }

    /// Removes all injected failures.
    pub fn clear_failures(&mut self) {
        self.failing_workers.clear();
        self.failing_sites.clear();
    }

    pub fn worker(&self, id: &str) -> Option<&Worker> {
        self.workers.iter().find(|w| w.id == id)
    }

    pub fn site(&self, id: &str) -> Option<&Site> {
        self.sites.iter().find(|s| s.id == id)
    }

    pub fn workers(&self) -> &[Worker] {
        &self.workers
    }

    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    /// Number of successful saves so far.
    pub fn write_count(&self) -> usize {
        self.writes
    }

    fn upsert_worker(&mut self, worker: Worker) {
        match self.workers.iter_mut().find(|w| w.id == worker.id) {
            Some(slot) => *slot = worker,
            None => self.workers.push(worker),
        }
    }

    fn upsert_site(&mut self, site: Site) {
        match self.sites.iter_mut().find(|s| s.id == site.id) {
            Some(slot) => *slot = site,
            None => self.sites.push(site),
        }
    }
}

impl Store for InMemoryStore {
    fn load_workers(&self) -> Result<Vec<Worker>, StoreError> {
        Ok(self.workers.clone())
    }

    fn load_worker(&self, id: &str) -> Result<Option<Worker>, StoreError> {
        Ok(self.worker(id).cloned())
    }

    fn load_sites(&self, status: SiteStatus) -> Result<Vec<Site>, StoreError> {
        Ok(self
            .sites
            .iter()
            .filter(|s| s.status == status)
            .cloned()
            .collect())
    }

    fn load_site(&self, id: &str) -> Result<Option<Site>, StoreError> {
        Ok(self.site(id).cloned())
    }

    fn save_worker(&mut self, worker: &Worker) -> Result<(), StoreError> {
        if self.failing_workers.contains(&worker.id) {
            return Err(StoreError::Rejected(format!("worker {}", worker.id)));
        }
        self.upsert_worker(worker.clone());
        self.writes += 1;
        Ok(())
    }

    fn save_site(&mut self, site: &Site) -> Result<(), StoreError> {
        if self.failing_sites.contains(&site.id) {
            return Err(StoreError::Rejected(format!("site {}", site.id)));
        }
        self.upsert_site(site.clone());
        self.writes += 1;
        Ok(())
    }
}
