//! # Domain Types
//!
//! Identifiers and small value types shared by every lending module.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   CatalogKey    │   │    MemberId     │   │   LoanStatus    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  ISBN-like key  │   │  card number    │   │  Current        │       │
//! │  │  one per copy   │   │  one per member │   │  DueSoon        │       │
//! │  └─────────────────┘   └─────────────────┘   │  Overdue        │       │
//! │                                              └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity Rules
//! Uniqueness of catalog keys and member ids is enforced by whoever owns the
//! catalog (see [`crate::catalog::InMemoryCatalog`]), never by these types.

use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// =============================================================================
// Catalog Key
// =============================================================================

/// Unique key of a circulating copy (ISBN-equivalent).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(transparent)]
pub struct CatalogKey(String);

impl CatalogKey {
    /// Wraps a raw key. Format checks live in
    /// [`validate_catalog_key`](crate::validation::validate_catalog_key).
    pub fn new(key: impl Into<String>) -> Self {
        CatalogKey(key.into())
    }

    /// Returns the key as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CatalogKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CatalogKey {
    fn from(key: &str) -> Self {
        CatalogKey::new(key)
    }
}

// =============================================================================
// Member Id
// =============================================================================

/// Unique identifier of a library member.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(transparent)]
pub struct MemberId(String);

impl MemberId {
    pub fn new(id: impl Into<String>) -> Self {
        MemberId(id.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MemberId {
    fn from(id: &str) -> Self {
        MemberId::new(id)
    }
}

// =============================================================================
// Loan Status
// =============================================================================

/// Where a loan sits relative to its due date.
///
/// ## Status Timeline
/// ```text
///   borrowed                      due - threshold        due
///      │─────────── Current ────────────│──── DueSoon ────│── Overdue ──►
/// ```
/// The due-soon boundary is inclusive: a loan due exactly `threshold` days
/// from now is already `DueSoon`. A loan due exactly now is still `DueSoon`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum LoanStatus {
    /// Due date is further away than the due-soon threshold.
    #[default]
    Current,
    /// Due within the threshold (inclusive).
    DueSoon,
    /// Due date has passed.
    Overdue,
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoanStatus::Current => write!(f, "current"),
            LoanStatus::DueSoon => write!(f, "due soon"),
            LoanStatus::Overdue => write!(f, "overdue"),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
