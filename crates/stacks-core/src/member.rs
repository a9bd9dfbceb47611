//! # Member Account
//!
//! A member's active loans, locked-in fine balance and read history.
//!
//! ## Fine Projection
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     outstanding_fines(now)                              │
//! │                                                                         │
//! │   fine_balance              +   Σ live fine of each overdue loan        │
//! │   (locked in at return)         (computed on demand, not stored)        │
//! │                                                                         │
//! │   > 0  →  borrow / renew rejected with OutstandingFines                 │
//! │   = 0  →  eligible                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A member with a clean balance but a book that is late right now is
//! already blocked; returning the book moves that live fine into the
//! balance, where only `pay_fine` can clear it.
//!
//! The account knows nothing about other members or reservation queues;
//! cross-member rules (one holder per copy, queue clean-up) belong to the
//! [`Coordinator`](crate::coordinator::Coordinator).

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::Serialize;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::loan::Loan;
use crate::money::Money;
use crate::types::{CatalogKey, MemberId};
use crate::validation::validate_payment;

// =============================================================================
// Returned Loan
// =============================================================================

/// What `return_copy` hands back: the closed loan and the fine it locked in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReturnedLoan {
    pub loan: Loan,
    pub days_overdue: i64,
    /// Zero for an on-time return.
    pub fine: Money,
}

// =============================================================================
// Member Account
// =============================================================================

/// One library member.
#[derive(Debug, Clone)]
pub struct MemberAccount {
    id: MemberId,
    name: String,
    loans: Vec<Loan>,
    fine_balance: Money,
    read_history: BTreeSet<CatalogKey>,
}

impl MemberAccount {
    /// Opens an account with no loans and a clean balance.
    pub fn new(id: MemberId, name: impl Into<String>) -> Self {
        MemberAccount {
            id,
            name: name.into(),
            loans: Vec::new(),
            fine_balance: Money::zero(),
            read_history: BTreeSet::new(),
        }
    }

    // =========================================================================
    // Read-only views
    // =========================================================================

    pub fn id(&self) -> &MemberId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Active loans in borrowing order.
    pub fn active_loans(&self) -> &[Loan] {
        &self.loans
    }

    pub fn loan_for(&self, copy: &CatalogKey) -> Option<&Loan> {
        self.loans.iter().find(|loan| loan.copy() == copy)
    }

    pub fn holds(&self, copy: &CatalogKey) -> bool {
        self.loan_for(copy).is_some()
    }

    /// Fines locked in by past returns (excludes live fines).
    pub fn fine_balance(&self) -> Money {
        self.fine_balance
    }

    /// Every copy this member has returned, ordered by key.
    pub fn read_history(&self) -> impl Iterator<Item = &CatalogKey> {
        self.read_history.iter()
    }

    pub fn has_read(&self, copy: &CatalogKey) -> bool {
        self.read_history.contains(copy)
    }

    // =========================================================================
    // Fines
    // =========================================================================

    /// Locked-in balance plus the live fine of every overdue loan.
    pub fn outstanding_fines(&self, now: DateTime<Utc>, per_diem: Money) -> Money {
        let live: Money = self.loans.iter().map(|loan| loan.fine(now, per_diem)).sum();
        self.fine_balance + live
    }

    /// Eligibility gate for borrowing and renewing.
    pub fn can_borrow(&self, now: DateTime<Utc>, per_diem: Money) -> bool {
        self.outstanding_fines(now, per_diem).is_zero()
    }

    /// Pays down the locked-in balance.
    ///
    /// Overpayment clears the balance; it never goes negative. Live fines on
    /// loans still out are untouched until those loans are returned.
    ///
    /// Returns the remaining balance.
    pub fn pay_fine(&mut self, amount: Money) -> CoreResult<Money> {
        validate_payment(amount)?;

        self.fine_balance = self.fine_balance.saturating_sub_floor(amount);
        Ok(self.fine_balance)
    }

    fn ensure_no_fines(&self, now: DateTime<Utc>, per_diem: Money) -> CoreResult<()> {
        let amount = self.outstanding_fines(now, per_diem);
        if amount.is_positive() {
            return Err(CoreError::OutstandingFines { amount });
        }
        Ok(())
    }

    // =========================================================================
    // Lending
    // =========================================================================

    /// Opens a loan of `copy` due `duration_days` from `now`.
    ///
    /// ## Failure Order
    /// 1. `OutstandingFines` - fine projection is above zero
    /// 2. `Unavailable` - this member already holds the copy
    /// 3. `InvalidArgument` - `duration_days <= 0`
    ///
    /// Removing the member's own reservation for the copy is left to the
    /// coordinator.
    pub fn borrow(
        &mut self,
        copy: &CatalogKey,
        duration_days: i64,
        now: DateTime<Utc>,
        per_diem: Money,
    ) -> CoreResult<Loan> {
        self.ensure_no_fines(now, per_diem)?;

        if self.holds(copy) {
            return Err(CoreError::Unavailable { copy: copy.clone() });
        }

        let loan = Loan::issue(copy.clone(), now, duration_days)?;
        self.loans.push(loan.clone());
        Ok(loan)
    }

    /// Closes the loan of `copy`.
    ///
    /// The copy joins the read history, and an overdue loan's fine is added
    /// to the balance using the overdue-day count at `now`.
    pub fn return_copy(
        &mut self,
        copy: &CatalogKey,
        now: DateTime<Utc>,
        per_diem: Money,
    ) -> CoreResult<ReturnedLoan> {
        let index = self
            .loans
            .iter()
            .position(|loan| loan.copy() == copy)
            .ok_or_else(|| CoreError::NotHeld {
                member: self.id.clone(),
                copy: copy.clone(),
            })?;

        let loan = self.loans.remove(index);
        self.read_history.insert(copy.clone());

        let days_overdue = loan.days_overdue(now);
        let fine = loan.fine(now, per_diem);
        if loan.is_overdue(now) {
            self.fine_balance += fine;
        }

        Ok(ReturnedLoan {
            loan,
            days_overdue,
            fine,
        })
    }

    /// Extends the due date of the loan of `copy`.
    ///
    /// ## Failure Order
    /// 1. `OutstandingFines`
    /// 2. `NotHeld`
    /// 3. `MustReturnFirst` - the loan is already overdue
    /// 4. `InvalidArgument` - `additional_days <= 0`
    ///
    /// Returns the new due date.
    pub fn renew(
        &mut self,
        copy: &CatalogKey,
        additional_days: i64,
        now: DateTime<Utc>,
        per_diem: Money,
    ) -> CoreResult<DateTime<Utc>> {
        self.ensure_no_fines(now, per_diem)?;

        let member = self.id.clone();
        let loan = self
            .loans
            .iter_mut()
            .find(|loan| loan.copy() == copy)
            .ok_or_else(|| CoreError::NotHeld {
                member,
                copy: copy.clone(),
            })?;

        if loan.is_overdue(now) {
            return Err(CoreError::MustReturnFirst { copy: copy.clone() });
        }

        loan.extend(additional_days)
    }

    /// Read-only snapshot for history and recommendation consumers.
    pub fn summary(&self, now: DateTime<Utc>, per_diem: Money) -> MemberSummary {
        MemberSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            active_loans: self.loans.clone(),
            read_history: self.read_history.iter().cloned().collect(),
            fine_balance: self.fine_balance,
            outstanding_fines: self.outstanding_fines(now, per_diem),
        }
    }
}

// =============================================================================
// Member Summary
// =============================================================================

/// Snapshot of a member for read-only consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct MemberSummary {
    pub id: MemberId,
    pub name: String,
    pub active_loans: Vec<Loan>,
    pub read_history: Vec<CatalogKey>,
    pub fine_balance: Money,
    pub outstanding_fines: Money,
}

// =============================================================================
// Unit Tests
// =============================================================================
