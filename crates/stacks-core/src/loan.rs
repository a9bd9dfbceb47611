//! # Loan
//!
//! One active borrowing of one copy by one member.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           Loan Lifecycle                                │
//! │                                                                         │
//! │  MemberAccount::borrow ──► Loan::issue (due = now + duration)          │
//! │                                 │                                       │
//! │                                 ├── MemberAccount::renew ──► extend    │
//! │                                 │   (the only mutation, in place)       │
//! │                                 │                                       │
//! │                                 ▼                                       │
//! │  MemberAccount::return_copy ──► removed; fine locked in if overdue     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every query takes `now` explicitly, so the same loan can be asked about
//! any instant without touching a clock.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{CatalogKey, LoanStatus};
use crate::validation::validate_days;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// An active borrowing record.
///
/// Fields are private: the due date only moves through
/// [`MemberAccount::renew`](crate::member::MemberAccount::renew).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct Loan {
    #[ts(as = "String")]
    id: Uuid,
    copy: CatalogKey,
    #[ts(as = "String")]
    started_at: DateTime<Utc>,
    #[ts(as = "String")]
    due_at: DateTime<Utc>,
}

impl Loan {
    /// Issues a loan starting at `now` and due `duration_days` later.
    pub(crate) fn issue(copy: CatalogKey, now: DateTime<Utc>, duration_days: i64) -> CoreResult<Self> {
        validate_days("loan duration", duration_days)?;
        let due_at = days_after(now, duration_days, "loan duration")?;

        Ok(Loan {
            id: Uuid::new_v4(),
            copy,
            started_at: now,
            due_at,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The copy on loan.
    pub fn copy(&self) -> &CatalogKey {
        &self.copy
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn due_at(&self) -> DateTime<Utc> {
        self.due_at
    }

    /// True iff `now` is strictly past the due date.
    #[inline]
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        now > self.due_at
    }

    /// Whole days overdue, rounded up.
    ///
    /// ## Examples
    /// ```text
    /// now == due            → 0
    /// now == due + 1 minute → 1
    /// now == due + 24 hours → 1
    /// now == due + 25 hours → 2
    /// ```
    pub fn days_overdue(&self, now: DateTime<Utc>) -> i64 {
        if !self.is_overdue(now) {
            return 0;
        }

        let late_ms = (now - self.due_at).num_milliseconds();
        (late_ms + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY
    }

    /// `days_overdue × per_diem`; zero when not overdue.
    pub fn fine(&self, now: DateTime<Utc>, per_diem: Money) -> Money {
        per_diem * self.days_overdue(now)
    }

    /// Current / due soon / overdue, with an inclusive due-soon threshold.
    pub fn status(&self, now: DateTime<Utc>, due_soon_days: i64) -> LoanStatus {
        if self.is_overdue(now) {
            LoanStatus::Overdue
        } else if Duration::try_days(due_soon_days)
            .map_or(true, |window| self.due_at - now <= window)
        {
            LoanStatus::DueSoon
        } else {
            LoanStatus::Current
        }
    }

    /// Pushes the due date forward. Nothing else changes.
    pub(crate) fn extend(&mut self, additional_days: i64) -> CoreResult<DateTime<Utc>> {
        validate_days("extension", additional_days)?;

        self.due_at = days_after(self.due_at, additional_days, "extension")?;
        Ok(self.due_at)
    }
}

/// `from + days`, or `OutOfRange` past the representable calendar.
fn days_after(from: DateTime<Utc>, days: i64, field: &str) -> CoreResult<DateTime<Utc>> {
    Duration::try_days(days)
        .and_then(|span| from.checked_add_signed(span))
        .ok_or_else(|| {
            ValidationError::OutOfRange {
                field: field.to_string(),
            }
            .into()
        })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use chrono::TimeZone;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap()
    }

    fn loan(days: i64) -> Loan {
        Loan::issue(CatalogKey::from("978-0-14"), start(), days).unwrap()
    }

    #[test]
    fn test_issue_sets_due_date() {
        let loan = loan(14);
        assert_eq!(loan.started_at(), start());
        assert_eq!(loan.due_at(), start() + Duration::days(14));
        assert_eq!(loan.copy().as_str(), "978-0-14");
    }

    #[test]
    fn test_issue_rejects_non_positive_duration() {
        let err = Loan::issue(CatalogKey::from("X"), start(), 0).unwrap_err();
        assert!(matches!(err, CoreError::InvalidArgument(_)));
    }

    #[test]
    fn test_days_overdue_is_zero_until_due() {
        let loan = loan(14);
        assert_eq!(loan.days_overdue(start()), 0);
        assert_eq!(loan.days_overdue(loan.due_at()), 0);
        assert!(!loan.is_overdue(loan.due_at()));
    }

    #[test]
    fn test_days_overdue_rounds_up() {
        let loan = loan(14);
        let due = loan.due_at();

        assert_eq!(loan.days_overdue(due + Duration::minutes(1)), 1);
        assert_eq!(loan.days_overdue(due + Duration::hours(24)), 1);
        assert_eq!(loan.days_overdue(due + Duration::hours(25)), 2);
        assert_eq!(loan.days_overdue(due + Duration::days(6)), 6);
    }

    #[test]
    fn test_days_overdue_never_decreases() {
        let loan = loan(7);
        let mut previous = 0;
        for hour in 0..(24 * 10) {
            let days = loan.days_overdue(loan.due_at() + Duration::hours(hour));
            assert!(days >= previous);
            previous = days;
        }
        assert_eq!(previous, 10);
    }

    #[test]
    fn test_fine() {
        let loan = loan(14);
        let per_diem = Money::from_cents(100);

        assert_eq!(loan.fine(start(), per_diem), Money::zero());
        assert_eq!(
            loan.fine(start() + Duration::days(20), per_diem),
            Money::from_cents(600)
        );
    }

    #[test]
    fn test_status_transitions() {
        let loan = loan(14);

        assert_eq!(loan.status(start(), 3), LoanStatus::Current);
        assert_eq!(loan.status(start() + Duration::days(10), 3), LoanStatus::Current);
        // Inclusive boundary: due in exactly three days
        assert_eq!(loan.status(start() + Duration::days(11), 3), LoanStatus::DueSoon);
        assert_eq!(loan.status(loan.due_at(), 3), LoanStatus::DueSoon);
        assert_eq!(
            loan.status(loan.due_at() + Duration::seconds(1), 3),
            LoanStatus::Overdue
        );
    }

    #[test]
    fn test_extend_only_moves_due_date() {
        let mut loan = loan(14);
        let before = loan.clone();

        let due = loan.extend(7).unwrap();
        assert_eq!(due, start() + Duration::days(21));
        assert_eq!(loan.id(), before.id());
        assert_eq!(loan.started_at(), before.started_at());
        assert_eq!(loan.copy(), before.copy());
    }

    #[test]
    fn test_extend_rejects_non_positive_days() {
        let mut loan = loan(14);
        assert!(loan.extend(0).is_err());
        assert!(loan.extend(-2).is_err());
        assert_eq!(loan.due_at(), start() + Duration::days(14));
    }

    #[test]
    fn test_issue_rejects_durations_past_the_calendar() {
        for days in [i64::MAX, 1_000_000_000] {
            let err = Loan::issue(CatalogKey::from("X"), start(), days).unwrap_err();
            assert!(matches!(
                err,
                CoreError::InvalidArgument(ValidationError::OutOfRange { .. })
            ));
        }
    }

    #[test]
    fn test_extend_past_the_calendar_keeps_due_date() {
        let mut loan = loan(14);
        for days in [i64::MAX, 1_000_000_000] {
            let err = loan.extend(days).unwrap_err();
            assert!(matches!(
                err,
                CoreError::InvalidArgument(ValidationError::OutOfRange { .. })
            ));
        }
        assert_eq!(loan.due_at(), start() + Duration::days(14));
    }

    #[test]
    fn test_status_with_huge_window_is_due_soon() {
        let loan = loan(14);
        assert_eq!(loan.status(start(), i64::MAX), LoanStatus::DueSoon);
    }
}
