//! Allocation policy.
//!
//! Collects the legal and operational limits the allocator enforces.
//! Every field has a default, so a policy can be deserialized from a
//! partial configuration document.

use serde::{Deserialize, Serialize};

/// Limits applied during an allocation run.
///
/// # Defaults
///
/// | Field | Default |
/// |-------|---------|
/// | `daily_hour_cap` | 7 h |
/// | `weekly_hour_cap` | 35 h per ISO week |
/// | `full_time_threshold` | 35 h/week |
/// | `radius_km` | 30 km |
/// | `consolidation_hour_cap` | 35 h per site |
/// | `max_site_hours_per_day` | 8 h |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocationPolicy {
    /// Maximum hours a worker may be assigned on one calendar date.
    pub daily_hour_cap: f64,
    /// Maximum hours a worker may be assigned in one ISO week.
    pub weekly_hour_cap: f64,
    /// Weekly target at or above which a site is never split across workers.
    pub full_time_threshold: f64,
    /// Maximum home-to-site distance. `None` disables the filter.
    pub radius_km: Option<f64>,
    /// Upper bound on the total hours one worker may absorb when taking a
    /// whole site alone. `None` leaves only the per-week cap.
    pub consolidation_hour_cap: Option<f64>,
    /// Maximum per-day hours a site may declare (checked by validation).
    pub max_site_hours_per_day: f64,
}

impl AllocationPolicy {
    /// Creates the default policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the daily hour cap.
    pub fn with_daily_hour_cap(mut self, hours: f64) -> Self {
        self.daily_hour_cap = hours;
        self
    }

    /// Sets the weekly hour cap.
    pub fn with_weekly_hour_cap(mut self, hours: f64) -> Self {
        self.weekly_hour_cap = hours;
        self
    }

    /// Sets the full-time threshold.
    pub fn with_full_time_threshold(mut self, hours: f64) -> Self {
        self.full_time_threshold = hours;
        self
    }

    /// Sets (or disables) the proximity radius.
    pub fn with_radius_km(mut self, radius_km: Option<f64>) -> Self {
        self.radius_km = radius_km;
        self
    }

    /// Sets (or disables) the whole-site hour bound for consolidation.
    pub fn with_consolidation_hour_cap(mut self, hours: Option<f64>) -> Self {
        self.consolidation_hour_cap = hours;
        self
    }

    /// Sets the per-day ceiling for site declarations.
    pub fn with_max_site_hours_per_day(mut self, hours: f64) -> Self {
        self.max_site_hours_per_day = hours;
        self
    }
}

impl Default for AllocationPolicy {
    fn default() -> Self {
        Self {
            daily_hour_cap: 7.0,
            weekly_hour_cap: 35.0,
            full_time_threshold: 35.0,
            radius_km: Some(30.0),
            consolidation_hour_cap: Some(35.0),
            max_site_hours_per_day: 8.0,
        }
    }
}
