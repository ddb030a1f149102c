//! Staffing allocation for job sites.
//!
//! Assigns workers to sites that need staff on recurring weekdays over a
//! date window. Assignments respect skill matching, a home-to-site radius,
//! contract end dates and daily/weekly hour caps. Each worker takes at most
//! one site on any given date.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Worker`, `Site`, `Assignment`, `Weekday`,
//!   `DateWindow`, `GeoPoint`
//! - **`policy`**: Caps, thresholds and radius (`AllocationPolicy`)
//! - **`availability`**: Whether a worker may take a site on a weekday
//! - **`ranking`**: Candidate ordering (contract type, then distance)
//! - **`allocator`**: Greedy whole-site consolidation with slot decomposition
//! - **`reset`**: Releases a site's assignments
//! - **`store`**: Persistence seam and an in-memory store
//! - **`workload`**: Hours per worker and coverage per site
//! - **`validation`**: Input integrity checks (hours, windows, references)
//!
//! # Architecture
//!
//! The allocator works on an in-memory `WorkerPool` and writes results
//! through a [`store::Store`] after each site. Persistence, geocoding and
//! reporting belong to the surrounding application.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use u_staffing::allocator::Allocator;
//! use u_staffing::models::{DateWindow, Site, SiteStatus, Weekday, Worker};
//! use u_staffing::store::InMemoryStore;
//!
//! let window = DateWindow::new(
//!     NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
//!     NaiveDate::from_ymd_opt(2025, 9, 7).unwrap(),
//! );
//! let mut store = InMemoryStore::new()
//!     .with_worker(Worker::permanent("W1").with_skill("windows"))
//!     .with_site(
//!         Site::new("S1", window)
//!             .with_demand("windows", 1)
//!             .with_service_days([Weekday::Monday, Weekday::Friday])
//!             .with_weekly_hours(10.0),
//!     );
//!
//! let report = Allocator::new().run(&mut store).unwrap();
//! assert_eq!(report.scheduled(), 1);
//! assert_eq!(store.site("S1").unwrap().status, SiteStatus::Scheduled);
//!
//! u_staffing::reset::reset_site(&mut store, "S1").unwrap();
//! assert_eq!(store.site("S1").unwrap().status, SiteStatus::New);
//! ```

pub mod allocator;
pub mod availability;
pub mod error;
pub mod models;
pub mod policy;
pub mod ranking;
pub mod reset;
pub mod store;
pub mod validation;
pub mod workload;

pub use allocator::{Allocator, RunReport, SiteOutcome, SiteReport, WorkerPool};
pub use error::{AllocationError, AllocationResult, StoreError};
pub use policy::AllocationPolicy;
