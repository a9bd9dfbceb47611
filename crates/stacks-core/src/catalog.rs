//! # Catalog
//!
//! The lookup boundary between the lending core and whatever stores copies
//! and members.
//!
//! ## Boundary
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Catalog trait                                   │
//! │                                                                         │
//! │   copy(key)      → Option<&BookCopy>         "not found" is None        │
//! │   member(id)     → Option<&MemberAccount>                               │
//! │   members()      → every account (availability is derived from these)  │
//! │                                                                         │
//! │   Implementations own uniqueness of keys and ids; the core assumes it.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! [`InMemoryCatalog`] is the reference implementation used by the desk.

use std::collections::BTreeMap;

use crate::error::{CoreResult, ValidationError};
use crate::member::MemberAccount;
use crate::reservation::ReservationQueue;
use crate::types::{CatalogKey, MemberId};
use crate::validation::{validate_catalog_key, validate_member_id};

// =============================================================================
// Book Copy
// =============================================================================

/// A single circulating copy.
///
/// Carries no "on loan" flag; [`Coordinator::holder_of`](crate::coordinator::Coordinator::holder_of)
/// derives it from member loans.
#[derive(Debug, Clone)]
pub struct BookCopy {
    key: CatalogKey,
    title: String,
    author: String,
    reservations: ReservationQueue,
}

impl BookCopy {
    pub fn new(key: CatalogKey, title: impl Into<String>, author: impl Into<String>) -> Self {
        BookCopy {
            key,
            title: title.into(),
            author: author.into(),
            reservations: ReservationQueue::new(),
        }
    }

    pub fn key(&self) -> &CatalogKey {
        &self.key
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    /// Members waiting for this copy, head first.
    pub fn reservations(&self) -> &ReservationQueue {
        &self.reservations
    }

    pub(crate) fn reservations_mut(&mut self) -> &mut ReservationQueue {
        &mut self.reservations
    }
}

// =============================================================================
// Catalog Trait
// =============================================================================

/// Lookup of copies and member accounts.
pub trait Catalog {
    fn copy(&self, key: &CatalogKey) -> Option<&BookCopy>;

    fn copy_mut(&mut self, key: &CatalogKey) -> Option<&mut BookCopy>;

    fn member(&self, id: &MemberId) -> Option<&MemberAccount>;

    fn member_mut(&mut self, id: &MemberId) -> Option<&mut MemberAccount>;

    /// Every member account, in no particular order.
    fn members(&self) -> Box<dyn Iterator<Item = &MemberAccount> + '_>;
}

// =============================================================================
// In-Memory Catalog
// =============================================================================

/// Ordered maps of copies and members.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    copies: BTreeMap<CatalogKey, BookCopy>,
    members: BTreeMap<MemberId, MemberAccount>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a copy. Keys must be well formed and unused.
    pub fn add_copy(&mut self, copy: BookCopy) -> CoreResult<()> {
        validate_catalog_key(copy.key().as_str())?;

        if self.copies.contains_key(copy.key()) {
            return Err(ValidationError::Duplicate {
                field: "catalog key".to_string(),
                value: copy.key().to_string(),
            }
            .into());
        }

        self.copies.insert(copy.key().clone(), copy);
        Ok(())
    }

    /// Registers a member. Ids must be well formed and unused.
    pub fn add_member(&mut self, member: MemberAccount) -> CoreResult<()> {
        validate_member_id(member.id().as_str())?;

        if self.members.contains_key(member.id()) {
            return Err(ValidationError::Duplicate {
                field: "member id".to_string(),
                value: member.id().to_string(),
            }
            .into());
        }

        self.members.insert(member.id().clone(), member);
        Ok(())
    }

    /// All copies ordered by key.
    pub fn copies(&self) -> impl Iterator<Item = &BookCopy> {
        self.copies.values()
    }

    pub fn copy_count(&self) -> usize {
        self.copies.len()
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }
}

impl Catalog for InMemoryCatalog {
    fn copy(&self, key: &CatalogKey) -> Option<&BookCopy> {
        self.copies.get(key)
    }

    fn copy_mut(&mut self, key: &CatalogKey) -> Option<&mut BookCopy> {
        self.copies.get_mut(key)
    }

    fn member(&self, id: &MemberId) -> Option<&MemberAccount> {
        self.members.get(id)
    }

    fn member_mut(&mut self, id: &MemberId) -> Option<&mut MemberAccount> {
        self.members.get_mut(id)
    }

    fn members(&self) -> Box<dyn Iterator<Item = &MemberAccount> + '_> {
        Box::new(self.members.values())
    }
}
