//! Error model.
//!
//! Partial coverage is never an error: a site that could not be fully
//! staffed keeps status `New` and explains itself in its note.

use thiserror::Error;

use crate::models::SiteStatus;

/// Result type used by allocation and reset operations.
pub type AllocationResult<T> = Result<T, AllocationError>;

/// Failure of a persistence collaborator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backing store could not be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A record that must exist was missing.
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// The store refused the write.
    #[error("write rejected: {0}")]
    Rejected(String),
}

/// Allocation or reset failure.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AllocationError {
    /// The referenced site does not exist.
    #[error("site not found: {0}")]
    NotFound(String),

    /// The site is not awaiting allocation.
    #[error("site {site_id} is {status:?}, expected New")]
    Conflict { site_id: String, status: SiteStatus },

    /// No worker is eligible for any skill the site demands.
    #[error("no eligible worker for site {0}")]
    NoCandidate(String),

    /// Propagated unchanged from the store.
    #[error(transparent)]
    Persistence(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let e = AllocationError::Conflict {
            site_id: "S1".into(),
            status: SiteStatus::Scheduled,
        };
        assert_eq!(e.to_string(), "site S1 is Scheduled, expected New");
        assert_eq!(
            StoreError::NotFound {
                kind: "worker",
                id: "W9".into(),
            }
            .to_string(),
            "worker not found: W9"
        );
    }

    #[test]
    fn test_store_error_is_transparent() {
        let e: AllocationError = StoreError::Unavailable("disk full".into()).into();
        assert_eq!(e.to_string(), "store unavailable: disk full");
    }
}
