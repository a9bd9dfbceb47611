//! # Coordinator
//!
//! The single authority over who holds which copy.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │              Per (member, copy) - implied by loans and queues           │
//! │                                                                         │
//! │                    reserve                     borrow                   │
//! │   ┌──────────┐ ───────────────► ┌──────────┐ ──────────► ┌──────────┐  │
//! │   │   idle   │                  │  queued  │             │ holding  │  │
//! │   └──────────┘ ◄─────────────── └──────────┘             └──────────┘  │
//! │     ▲  │        cancel              │ holder returns,       │  │  ▲    │
//! │     │  │                            │ member is head        │  │  │    │
//! │     │  │                            ▼                       │  └──┘    │
//! │     │  │                     ┌─────────────┐                │  renew   │
//! │     │  │                     │ handed off  │ ─── borrow ───►│          │
//! │     │  │                     │ (notified)  │                │          │
//! │     │  │                     └─────────────┘                │          │
//! │     │  └──────────────────── borrow (copy free) ────────────┘          │
//! │     └──────────────────────── return ────────────────────────┘          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Check Order
//! Every operation validates in the same order and only then mutates:
//!
//! 1. copy and member exist            → `NotFound`
//! 2. member's fine projection is zero → `OutstandingFines` (borrow, renew)
//! 3. copy state (holder, queue)       → `Unavailable`, `AlreadyAvailable`,
//!    `AlreadyReserved`, `ReservationsPending`
//! 4. member-level loan rules          → `NotHeld`, `MustReturnFirst`,
//!    `InvalidArgument`
//!
//! A failed call leaves loans, balances and queues exactly as they were.
//!
//! ## Availability
//! There is no stored "on loan" flag. [`Coordinator::holder_of`] scans
//! member loans, so the loan set is the only source of truth.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};
use ts_rs::TS;

use crate::catalog::{BookCopy, Catalog};
use crate::clock::Clock;
use crate::error::{CoreError, CoreResult};
use crate::loan::Loan;
use crate::member::{MemberAccount, MemberSummary, ReturnedLoan};
use crate::money::Money;
use crate::notification::{Notification, NotificationCategory, NotificationSink, Priority};
use crate::policy::LendingPolicy;
use crate::types::{CatalogKey, LoanStatus, MemberId};

// =============================================================================
// Outcome Types
// =============================================================================

/// Notice given to the next queued member when a copy comes back.
///
/// `respond_by` is informational: the coordinator never re-queues or
/// reassigns when it passes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct HandOff {
    pub member: MemberId,
    pub copy: CatalogKey,
    #[ts(as = "String")]
    pub offered_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub respond_by: DateTime<Utc>,
}

/// Result of a successful return.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReturnOutcome {
    pub returned: ReturnedLoan,
    /// Set when somebody was waiting; they hold no loan yet.
    pub hand_off: Option<HandOff>,
}

/// One row of the overdue report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverdueLoan {
    pub member: MemberId,
    pub copy: CatalogKey,
    pub due_at: DateTime<Utc>,
    pub days_overdue: i64,
    pub fine: Money,
}

// =============================================================================
// Coordinator
// =============================================================================

/// Mediates borrow / return / reserve / cancel / renew / pay.
#[derive(Debug)]
pub struct Coordinator<C, N> {
    catalog: C,
    notifier: N,
    clock: Arc<dyn Clock>,
    policy: LendingPolicy,
}

impl<C: Catalog, N: NotificationSink> Coordinator<C, N> {
    pub fn new(catalog: C, notifier: N, clock: Arc<dyn Clock>, policy: LendingPolicy) -> Self {
        Coordinator {
            catalog,
            notifier,
            clock,
            policy,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Mutable catalog access for registering copies and members.
    pub fn catalog_mut(&mut self) -> &mut C {
        &mut self.catalog
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    pub fn policy(&self) -> &LendingPolicy {
        &self.policy
    }

    /// Current time according to the coordinator's clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// The member currently holding `copy`, derived from member loans.
    pub fn holder_of(&self, copy: &CatalogKey) -> Option<&MemberId> {
        self.catalog
            .members()
            .find(|member| member.holds(copy))
            .map(MemberAccount::id)
    }

    /// True when `copy` exists and nobody holds it.
    pub fn is_available(&self, copy: &CatalogKey) -> CoreResult<bool> {
        self.require_copy(copy)?;
        Ok(self.holder_of(copy).is_none())
    }

    /// 1-based queue position of `member` for `copy`.
    pub fn reservation_position(
        &self,
        member: &MemberId,
        copy: &CatalogKey,
    ) -> CoreResult<Option<usize>> {
        self.require_member(member)?;
        Ok(self.require_copy(copy)?.reservations().position(member))
    }

    /// Fine projection for `member` at the current time.
    pub fn outstanding_fines(&self, member: &MemberId) -> CoreResult<Money> {
        let account = self.require_member(member)?;
        Ok(account.outstanding_fines(self.now(), self.policy.fine_per_day()))
    }

    /// Read-only snapshot for history and recommendation consumers.
    pub fn member_summary(&self, member: &MemberId) -> CoreResult<MemberSummary> {
        let account = self.require_member(member)?;
        Ok(account.summary(self.now(), self.policy.fine_per_day()))
    }

    /// Every overdue loan, most overdue first.
    pub fn overdue_loans(&self) -> Vec<OverdueLoan> {
        let now = self.now();
        let per_diem = self.policy.fine_per_day();

        let mut overdue: Vec<OverdueLoan> = self
            .catalog
            .members()
            .flat_map(|member| {
                member
                    .active_loans()
                    .iter()
                    .filter(|loan| loan.is_overdue(now))
                    .map(move |loan| OverdueLoan {
                        member: member.id().clone(),
                        copy: loan.copy().clone(),
                        due_at: loan.due_at(),
                        days_overdue: loan.days_overdue(now),
                        fine: loan.fine(now, per_diem),
                    })
            })
            .collect();

        overdue.sort_by(|a, b| {
            b.days_overdue
                .cmp(&a.days_overdue)
                .then_with(|| a.member.cmp(&b.member))
                .then_with(|| a.copy.cmp(&b.copy))
        });
        overdue
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Lends `copy` to `member` for `duration_days` (policy default if `None`).
    ///
    /// If the member was queued for the copy, their reservation is consumed.
    pub fn borrow(
        &mut self,
        member: &MemberId,
        copy: &CatalogKey,
        duration_days: Option<i64>,
    ) -> CoreResult<Loan> {
        let now = self.now();
        let per_diem = self.policy.fine_per_day();
        let duration = duration_days.unwrap_or(self.policy.loan_days);

        let title = self.require_copy(copy)?.title().to_string();
        self.require_eligible(member, now, per_diem)?;

        if let Some(holder) = self.holder_of(copy) {
            debug!(member = %member, copy = %copy, holder = %holder, "Borrow refused: copy on loan");
            return Err(CoreError::Unavailable { copy: copy.clone() });
        }

        let loan = self.member_mut(member)?.borrow(copy, duration, now, per_diem)?;
        let consumed_reservation = self.copy_mut(copy)?.reservations_mut().remove(member);

        info!(
            member = %member,
            copy = %copy,
            due_at = %loan.due_at(),
            consumed_reservation,
            "Loan created"
        );
        self.emit(
            member,
            NotificationCategory::Loan,
            Priority::Normal,
            format!(
                "You borrowed '{}'. It is due back on {}.",
                title,
                loan.due_at().format("%Y-%m-%d")
            ),
            now,
        );

        Ok(loan)
    }

    /// Queues `member` for a copy somebody else currently holds.
    ///
    /// Returns the member's 1-based position.
    pub fn reserve(&mut self, member: &MemberId, copy: &CatalogKey) -> CoreResult<usize> {
        let now = self.now();
        let book = self.require_copy(copy)?;
        let title = book.title().to_string();
        let already_queued = book.reservations().contains(member);
        self.require_member(member)?;

        if self.holder_of(copy).is_none() {
            return Err(CoreError::AlreadyAvailable { copy: copy.clone() });
        }

        if already_queued {
            return Err(CoreError::AlreadyReserved {
                member: member.clone(),
                copy: copy.clone(),
            });
        }

        let queue = self.copy_mut(copy)?.reservations_mut();
        queue.enqueue(member.clone());
        let position = queue.len();

        info!(member = %member, copy = %copy, position, "Reservation placed");
        self.emit(
            member,
            NotificationCategory::Reservation,
            Priority::Low,
            format!("You are number {} in line for '{}'.", position, title),
            now,
        );

        Ok(position)
    }

    /// Removes `member` from the queue for `copy`.
    ///
    /// Cancelling a reservation that does not exist is not an error; the
    /// return value says whether anything was removed.
    pub fn cancel_reservation(&mut self, member: &MemberId, copy: &CatalogKey) -> CoreResult<bool> {
        let now = self.now();
        let title = self.require_copy(copy)?.title().to_string();
        self.require_member(member)?;

        let removed = self.copy_mut(copy)?.reservations_mut().remove(member);
        if !removed {
            debug!(member = %member, copy = %copy, "No reservation to cancel");
            return Ok(false);
        }

        info!(member = %member, copy = %copy, "Reservation cancelled");
        self.emit(
            member,
            NotificationCategory::Reservation,
            Priority::Low,
            format!("Your reservation for '{}' was cancelled.", title),
            now,
        );

        Ok(true)
    }

    /// Takes `copy` back from `member`, then hands it to the head of the queue.
    ///
    /// The hand-off is a notification only: the next member must still call
    /// [`borrow`](Self::borrow), and until then the copy is simply available.
    pub fn return_copy(&mut self, member: &MemberId, copy: &CatalogKey) -> CoreResult<ReturnOutcome> {
        let now = self.now();
        let per_diem = self.policy.fine_per_day();
        let title = self.require_copy(copy)?.title().to_string();
        self.require_member(member)?;

        let returned = self.member_mut(member)?.return_copy(copy, now, per_diem)?;
        info!(
            member = %member,
            copy = %copy,
            days_overdue = returned.days_overdue,
            fine = %returned.fine,
            "Copy returned"
        );

        if returned.fine.is_positive() {
            self.emit(
                member,
                NotificationCategory::Fine,
                Priority::High,
                format!(
                    "'{}' was returned {} day(s) late. A fine of {} was added to your account.",
                    title, returned.days_overdue, returned.fine
                ),
                now,
            );
        }

        let respond_by = self.policy.respond_by(now);
        let hand_off = self
            .copy_mut(copy)?
            .reservations_mut()
            .dequeue()
            .map(|next| HandOff {
                member: next,
                copy: copy.clone(),
                offered_at: now,
                respond_by,
            });

        if let Some(hand_off) = &hand_off {
            info!(member = %hand_off.member, copy = %copy, "Copy handed to next in queue");
            self.emit(
                &hand_off.member,
                NotificationCategory::Availability,
                Priority::High,
                format!(
                    "'{}' is now available for you. Please borrow it within {} hours.",
                    title, self.policy.hand_off_grace_hours
                ),
                now,
            );
        }

        Ok(ReturnOutcome { returned, hand_off })
    }

    /// Extends `member`'s loan of `copy` by `additional_days`
    /// (one loan period if `None`).
    ///
    /// Refused while anybody, including the requester, is queued for the copy.
    pub fn renew(
        &mut self,
        member: &MemberId,
        copy: &CatalogKey,
        additional_days: Option<i64>,
    ) -> CoreResult<DateTime<Utc>> {
        let now = self.now();
        let per_diem = self.policy.fine_per_day();
        let days = additional_days.unwrap_or(self.policy.loan_days);

        let book = self.require_copy(copy)?;
        let title = book.title().to_string();
        let queued = book.reservations().len();
        self.require_eligible(member, now, per_diem)?;

        if queued > 0 {
            debug!(member = %member, copy = %copy, queued, "Renewal refused: reservations pending");
            return Err(CoreError::ReservationsPending {
                copy: copy.clone(),
                queued,
            });
        }

        let due_at = self.member_mut(member)?.renew(copy, days, now, per_diem)?;

        info!(member = %member, copy = %copy, due_at = %due_at, "Loan renewed");
        self.emit(
            member,
            NotificationCategory::Renewal,
            Priority::Normal,
            format!(
                "'{}' was renewed. It is now due back on {}.",
                title,
                due_at.format("%Y-%m-%d")
            ),
            now,
        );

        Ok(due_at)
    }

    /// Pays toward `member`'s locked-in fine balance. Returns what remains.
    pub fn pay_fine(&mut self, member: &MemberId, amount: Money) -> CoreResult<Money> {
        let now = self.now();
        let before = self.require_member(member)?.fine_balance();

        let remaining = self.member_mut(member)?.pay_fine(amount)?;
        info!(member = %member, paid = %amount, remaining = %remaining, "Fine payment recorded");

        if before.is_positive() && remaining.is_zero() {
            self.emit(
                member,
                NotificationCategory::Fine,
                Priority::Low,
                "All fines are paid. Thank you!".to_string(),
                now,
            );
        }

        Ok(remaining)
    }

    /// Sends one reminder per loan that is due soon or overdue.
    ///
    /// Returns how many reminders were sent.
    pub fn send_due_reminders(&mut self) -> usize {
        let now = self.now();
        let per_diem = self.policy.fine_per_day();
        let due_soon_days = self.policy.due_soon_days;
        let desk: &Self = self;

        let reminders: Vec<(MemberId, Priority, String)> = desk
            .catalog
            .members()
            .flat_map(|member| {
                member.active_loans().iter().filter_map(move |loan| {
                    let status = loan.status(now, due_soon_days);
                    let title = desk.title_of(loan.copy());
                    let due = loan.due_at().format("%Y-%m-%d");
                    match status {
                        LoanStatus::Current => None,
                        LoanStatus::DueSoon => Some((
                            member.id().clone(),
                            Priority::Normal,
                            format!("'{}' is due back on {}.", title, due),
                        )),
                        LoanStatus::Overdue => Some((
                            member.id().clone(),
                            Priority::High,
                            format!(
                                "'{}' was due on {} and is {} day(s) overdue. Current fine: {}.",
                                title,
                                due,
                                loan.days_overdue(now),
                                loan.fine(now, per_diem)
                            ),
                        )),
                    }
                })
            })
            .collect();

        let sent = reminders.len();
        for (member, priority, message) in reminders {
            self.emit(&member, NotificationCategory::Reminder, priority, message, now);
        }

        debug!(sent, "Due reminders sent");
        sent
    }

    // =========================================================================
    // Internal Helpers
    // =========================================================================

    fn require_copy(&self, key: &CatalogKey) -> CoreResult<&BookCopy> {
        self.catalog
            .copy(key)
            .ok_or_else(|| CoreError::copy_not_found(key))
    }

    fn require_member(&self, id: &MemberId) -> CoreResult<&MemberAccount> {
        self.catalog
            .member(id)
            .ok_or_else(|| CoreError::member_not_found(id))
    }

    fn copy_mut(&mut self, key: &CatalogKey) -> CoreResult<&mut BookCopy> {
        self.catalog
            .copy_mut(key)
            .ok_or_else(|| CoreError::copy_not_found(key))
    }

    fn member_mut(&mut self, id: &MemberId) -> CoreResult<&mut MemberAccount> {
        self.catalog
            .member_mut(id)
            .ok_or_else(|| CoreError::member_not_found(id))
    }

    fn require_eligible(&self, id: &MemberId, now: DateTime<Utc>, per_diem: Money) -> CoreResult<()> {
        let amount = self.require_member(id)?.outstanding_fines(now, per_diem);
        if amount.is_positive() {
            debug!(member = %id, owed = %amount, "Refused: outstanding fines");
            return Err(CoreError::OutstandingFines { amount });
        }
        Ok(())
    }

    fn title_of(&self, key: &CatalogKey) -> String {
        self.catalog
            .copy(key)
            .map(|copy| copy.title().to_string())
            .unwrap_or_else(|| key.to_string())
    }

    fn emit(
        &mut self,
        member: &MemberId,
        category: NotificationCategory,
        priority: Priority,
        message: String,
        now: DateTime<Utc>,
    ) {
        self.notifier.notify(Notification::new(
            member.clone(),
            category,
            message,
            priority,
            now,
        ));
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
