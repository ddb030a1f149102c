//! Staffing domain models.
//!
//! Provides the data types for describing staffing demand (sites), the
//! people who can meet it (workers) and the commitments between them
//! (assignments).
//!
//! # Domain Mappings
//!
//! | u-staffing | Cleaning services | Security | Home care |
//! |------------|-------------------|----------|-----------|
//! | Site | Client premises | Guarded venue | Patient home |
//! | Worker | Cleaner | Guard | Carer |
//! | Skill | Windows / floors | Armed / CCTV | Nursing / mobility |
//! | Assignment | Weekly round | Recurring shift | Visit plan |

mod assignment;
mod geo;
mod site;
mod weekday;
mod window;
mod worker;

pub use assignment::Assignment;
pub use geo::{GeoPoint, EARTH_RADIUS_KM};
pub use site::{Demand, Site, SiteStatus, SkillDemand};
pub use weekday::{ParseWeekdayError, Weekday};
pub use window::{DateWindow, WeekKey};
pub use worker::{Contract, ContractKind, Worker};
