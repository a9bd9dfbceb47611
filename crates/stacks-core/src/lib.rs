//! # stacks-core: Pure Circulation Logic for Stacks
//!
//! This crate is the **heart** of Stacks. It decides who may borrow which
//! copy, who waits in line for it, and what a late return costs. It performs
//! no I/O; time arrives through the [`Clock`] trait and events leave through
//! a [`NotificationSink`].
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stacks Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    stacks-desk (front desk)                     │   │
//! │  │    config file ──► SharedDesk ──► NotificationOutbox            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ stacks-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────────┐                                               │   │
//! │  │   │ Coordinator │ ── borrow / return / reserve / renew / pay    │   │
//! │  │   └──────┬──────┘                                               │   │
//! │  │          │                                                      │   │
//! │  │   ┌──────▼──────┐  ┌─────────────┐  ┌────────────────────────┐ │   │
//! │  │   │   Catalog   │  │  BookCopy   │  │   MemberAccount        │ │   │
//! │  │   │   (trait)   │  │  + queue    │  │   loans, fines, history│ │   │
//! │  │   └─────────────┘  └─────────────┘  └────────────────────────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • INJECTED CLOCK            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`coordinator`] - Cross-entity operations and the hand-off rule
//! - [`member`] - Member accounts, fine projection, read history
//! - [`loan`] - A single loan and its overdue arithmetic
//! - [`reservation`] - FIFO reservation queue per copy
//! - [`catalog`] - Lookup boundary and the in-memory catalog
//! - [`notification`] - Events emitted to members
//! - [`policy`] - Loan length, fine rate, reminder and hand-off windows
//! - [`clock`] - System and manual clocks
//! - [`money`] - Integer-cent money
//! - [`error`] / [`validation`] - Typed failures and argument checks
//!
//! ## Design Principles
//!
//! 1. **One Source of Truth**: a copy is on loan iff some member holds a loan for it
//! 2. **Atomic Operations**: a failed call changes nothing
//! 3. **Integer Money**: fines are cents (i64), never floats
//! 4. **Explicit Errors**: every refusal is a [`CoreError`] variant
//!
//! ## Example Usage
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use chrono::{TimeZone, Utc};
//! use stacks_core::{
//!     BookCopy, CatalogKey, Coordinator, InMemoryCatalog, LendingPolicy, ManualClock,
//!     MemberAccount, MemberId, Notification,
//! };
//!
//! let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap());
//! let mut catalog = InMemoryCatalog::new();
//! catalog.add_copy(BookCopy::new(CatalogKey::from("QA76-1"), "SICP", "Abelson")).unwrap();
//! catalog.add_member(MemberAccount::new(MemberId::from("M-1"), "Ada")).unwrap();
//!
//! let notes: Vec<Notification> = Vec::new();
//! let mut desk = Coordinator::new(catalog, notes, Arc::new(clock.clone()), LendingPolicy::default());
//!
//! let member = MemberId::from("M-1");
//! let copy = CatalogKey::from("QA76-1");
//! desk.borrow(&member, &copy, None).unwrap();
//!
//! // Three days late at one dollar a day
//! clock.advance_days(17);
//! let outcome = desk.return_copy(&member, &copy).unwrap();
//! assert_eq!(outcome.returned.fine.cents(), 300);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod clock;
pub mod coordinator;
pub mod error;
pub mod loan;
pub mod member;
pub mod money;
pub mod notification;
pub mod policy;
pub mod reservation;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use catalog::{BookCopy, Catalog, InMemoryCatalog};
pub use clock::{Clock, ManualClock, SystemClock};
pub use coordinator::{Coordinator, HandOff, OverdueLoan, ReturnOutcome};
pub use error::{CoreError, CoreResult, ValidationError};
pub use loan::Loan;
pub use member::{MemberAccount, MemberSummary, ReturnedLoan};
pub use money::Money;
pub use notification::{Notification, NotificationCategory, NotificationSink, Priority};
pub use policy::LendingPolicy;
pub use reservation::ReservationQueue;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Loan length when `borrow` is called without a duration.
pub const DEFAULT_LOAN_DAYS: i64 = 14;

/// One currency unit per overdue day.
pub const DEFAULT_FINE_PER_DAY_CENTS: i64 = 100;

/// Loans due within this many days are reported as due soon.
pub const DEFAULT_DUE_SOON_DAYS: i64 = 3;

/// Window a handed-off member is asked to borrow within.
///
/// ## Note
/// Advisory only. Once it passes the copy stays available to anyone;
/// nobody is re-queued or skipped.
pub const DEFAULT_HAND_OFF_GRACE_HOURS: i64 = 24;

/// Upper bound for every day count in a `LendingPolicy` (ten years).
pub const MAX_POLICY_DAYS: i64 = 3650;
