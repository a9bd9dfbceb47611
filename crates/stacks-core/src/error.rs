//! # Error Types
//!
//! Domain-specific error types for stacks-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  stacks-core errors (this file)                                        │
//! │  ├── CoreError        - Lending rule violations                        │
//! │  └── ValidationError  - Bad arguments (days, payments, keys)           │
//! │                                                                         │
//! │  stacks-desk errors (separate crate)                                   │
//! │  └── DeskError        - Config / IO failures, wraps CoreError          │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DeskError → caller                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every failure is raised before any state changes, so a caller that
//! receives an error can assume the catalog is exactly as it was.

use thiserror::Error;

use crate::money::Money;
use crate::types::{CatalogKey, MemberId};

// =============================================================================
// Core Error
// =============================================================================

/// Lending rule violations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Referenced member or copy does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Borrow attempted on a copy somebody already holds.
    #[error("Copy {copy} is already on loan")]
    Unavailable { copy: CatalogKey },

    /// Reservation attempted on a copy with no current holder.
    ///
    /// ## User Workflow
    /// ```text
    /// reserve(B, X)
    ///      │
    ///      ▼
    /// holder_of(X) = none
    ///      │
    ///      ▼
    /// AlreadyAvailable { copy: X }  →  UI offers "Borrow now" instead
    /// ```
    #[error("Copy {copy} is on the shelf; borrow it instead of reserving")]
    AlreadyAvailable { copy: CatalogKey },

    /// Member is already queued for this copy.
    #[error("Member {member} already has a reservation for {copy}")]
    AlreadyReserved { member: MemberId, copy: CatalogKey },

    /// Borrow or renew blocked by a nonzero fine projection.
    #[error("Outstanding fines of {amount} must be paid first")]
    OutstandingFines { amount: Money },

    /// Return or renew of a loan the member does not have.
    #[error("Member {member} does not hold {copy}")]
    NotHeld { member: MemberId, copy: CatalogKey },

    /// Renew attempted on an overdue loan.
    #[error("Loan of {copy} is overdue and must be returned first")]
    MustReturnFirst { copy: CatalogKey },

    /// Renew attempted while other members are queued.
    #[error("Copy {copy} has {queued} pending reservation(s)")]
    ReservationsPending { copy: CatalogKey, queued: usize },

    /// Non-positive duration, payment or extension (wraps ValidationError).
    #[error("Invalid argument: {0}")]
    InvalidArgument(#[from] ValidationError),
}

impl CoreError {
    /// Creates a NotFound error for a copy.
    pub fn copy_not_found(key: &CatalogKey) -> Self {
        CoreError::NotFound {
            entity: "Copy",
            id: key.to_string(),
        }
    }

    /// Creates a NotFound error for a member.
    pub fn member_not_found(id: &MemberId) -> Self {
        CoreError::NotFound {
            entity: "Member",
            id: id.to_string(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These are raised before any lending rule runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value is positive but too large to represent as a date.
    #[error("{field} is out of range")]
    OutOfRange { field: String },

    /// Invalid format (e.g., catalog key with spaces).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g., second copy registered under the same key).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
