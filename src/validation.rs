//! Input validation for staffing data.
//!
//! Collaborators creating or importing sites and workers run these checks
//! before handing records to the allocator, which trusts its input.
//! Detects:
//! - Duplicate IDs
//! - Inverted date windows
//! - Sites asking more than the daily maximum per service day
//! - Hours with no service day to carry them
//! - Skills demanded with a headcount of zero
//! - References to unknown sites or workers

use std::collections::HashSet;

use thiserror::Error;

use crate::availability::HOURS_EPSILON;
use crate::models::{Site, Worker};
use crate::policy::AllocationPolicy;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two records share the same ID.
    DuplicateId,
    /// A window ends before it starts.
    InvalidWindow,
    /// Weekly hours are negative or not a number.
    InvalidHours,
    /// Hours per service day exceed the site maximum.
    ExcessiveDailyHours,
    /// Weekly hours are set but no service day is declared.
    MissingServiceDays,
    /// A demanded skill has a headcount of zero.
    ZeroHeadcount,
    /// An assignment references a site that doesn't exist.
    InvalidSiteReference,
    /// A site's team references a worker that doesn't exist.
    InvalidWorkerReference,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

fn finish(errors: Vec<ValidationError>) -> ValidationResult {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn site_errors(site: &Site, policy: &AllocationPolicy) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if site.window.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidWindow,
            format!(
                "Site '{}' ends ({}) before it starts ({})",
                site.id, site.window.end, site.window.start
            ),
        ));
    }

    if site.weekly_hours.is_nan() || site.weekly_hours < 0.0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidHours,
            format!("Site '{}' has invalid weekly hours {}", site.id, site.weekly_hours),
        ));
    } else if site.weekly_hours > 0.0 {
        if site.service_days.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::MissingServiceDays,
                format!(
                    "Site '{}' has {}h per week but no service day",
                    site.id, site.weekly_hours
                ),
            ));
        }
        let per_day = site.hours_per_day();
        if per_day > policy.max_site_hours_per_day + HOURS_EPSILON {
            errors.push(ValidationError::new(
                ValidationErrorKind::ExcessiveDailyHours,
                format!(
                    "Site '{}' needs {:.2}h per service day (max {}h)",
                    site.id, per_day, policy.max_site_hours_per_day
                ),
            ));
        }
    }

    for entry in site.demand.iter() {
        if entry.count == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::ZeroHeadcount,
                format!("Site '{}' demands zero '{}' workers", site.id, entry.skill),
            ));
        }
    }

    errors
}

/// Validates one site, as done when a site is created.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_site(site: &Site, policy: &AllocationPolicy) -> ValidationResult {
    finish(site_errors(site, policy))
}

/// Validates a worker roster.
///
/// Checks:
/// 1. No duplicate worker IDs
/// 2. No assignment window ending before it starts
pub fn validate_workers(workers: &[Worker]) -> ValidationResult {
    finish(worker_errors(workers).1)
}

fn worker_errors(workers: &[Worker]) -> (HashSet<&str>, Vec<ValidationError>) {
    let mut errors = Vec::new();
    let mut ids = HashSet::new();

    for worker in workers {
        if !ids.insert(worker.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate worker ID: {}", worker.id),
            ));
        }
        for assignment in &worker.calendar {
            if assignment.window.is_empty() {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidWindow,
                    format!(
                        "Worker '{}' holds an inverted window for site '{}'",
                        worker.id, assignment.site_id
                    ),
                ));
            }
        }
    }

    (ids, errors)
}

/// Validates sites and workers together.
///
/// Checks:
/// 1. Every site passes [`validate_site`]
/// 2. Every worker passes [`validate_workers`]
/// 3. No duplicate site IDs
/// 4. Assignments reference existing sites
/// 5. Site teams reference existing workers
pub fn validate_input(sites: &[Site], workers: &[Worker], policy: &AllocationPolicy) -> ValidationResult {
    let (worker_ids, mut errors) = worker_errors(workers);

    let mut site_ids = HashSet::new();
    for site in sites {
        if !site_ids.insert(site.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate site ID: {}", site.id),
            ));
        }
        errors.extend(site_errors(site, policy));
    }

    for worker in workers {
        for assignment in &worker.calendar {
            if !site_ids.contains(assignment.site_id.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidSiteReference,
                    format!(
                        "Worker '{}' references unknown site '{}'",
                        worker.id, assignment.site_id
                    ),
                ));
            }
        }
    }

    for site in sites {
        for worker_id in &site.assigned_workers {
            if !worker_ids.contains(worker_id.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidWorkerReference,
                    format!("Site '{}' references unknown worker '{}'", site.id, worker_id),
                ));
            }
        }
    }

    finish(errors)
}
