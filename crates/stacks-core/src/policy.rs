//! # Lending Policy
//!
//! The tunable numbers behind every lending rule.
//!
//! ```toml
//! # [lending] section of desk.toml
//! loan_days = 14
//! fine_per_day_cents = 100
//! due_soon_days = 3
//! hand_off_grace_hours = 24
//! ```

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::error::ValidationError;
use crate::validation::{validate_days, ValidationResult};
use crate::{
    DEFAULT_DUE_SOON_DAYS, DEFAULT_FINE_PER_DAY_CENTS, DEFAULT_HAND_OFF_GRACE_HOURS,
    DEFAULT_LOAN_DAYS, MAX_POLICY_DAYS,
};

/// Loan duration, fine rate and reminder/hand-off windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LendingPolicy {
    /// Loan length used when `borrow` is called without a duration.
    #[serde(default = "default_loan_days")]
    pub loan_days: i64,

    /// Fine charged per overdue day, in cents.
    #[serde(default = "default_fine_per_day_cents")]
    pub fine_per_day_cents: i64,

    /// Loans due within this many days report `DueSoon`.
    #[serde(default = "default_due_soon_days")]
    pub due_soon_days: i64,

    /// How long a handed-off member is told they have to borrow.
    /// Advisory only; nothing re-queues when it lapses.
    #[serde(default = "default_hand_off_grace_hours")]
    pub hand_off_grace_hours: i64,
}

fn default_loan_days() -> i64 {
    DEFAULT_LOAN_DAYS
}

fn default_fine_per_day_cents() -> i64 {
    DEFAULT_FINE_PER_DAY_CENTS
}

fn default_due_soon_days() -> i64 {
    DEFAULT_DUE_SOON_DAYS
}

fn default_hand_off_grace_hours() -> i64 {
    DEFAULT_HAND_OFF_GRACE_HOURS
}

impl Default for LendingPolicy {
    fn default() -> Self {
        LendingPolicy {
            loan_days: default_loan_days(),
            fine_per_day_cents: default_fine_per_day_cents(),
            due_soon_days: default_due_soon_days(),
            hand_off_grace_hours: default_hand_off_grace_hours(),
        }
    }
}

impl LendingPolicy {
    /// Per-diem fine as Money.
    #[inline]
    pub fn fine_per_day(&self) -> Money {
        Money::from_cents(self.fine_per_day_cents)
    }

    /// When a member handed a copy at `offered_at` is asked to borrow by.
    ///
    /// Pins at the end of the calendar for windows too large to add.
    pub fn respond_by(&self, offered_at: DateTime<Utc>) -> DateTime<Utc> {
        Duration::try_hours(self.hand_off_grace_hours)
            .and_then(|grace| offered_at.checked_add_signed(grace))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Checks every field is usable.
    ///
    /// A zero fine rate is allowed (fine-free libraries); the day counts and
    /// grace window must be positive and at most `MAX_POLICY_DAYS` long.
    pub fn validate(&self) -> ValidationResult<()> {
        validate_days("loan_days", self.loan_days)?;
        validate_days("due_soon_days", self.due_soon_days)?;
        validate_days("hand_off_grace_hours", self.hand_off_grace_hours)?;

        within_cap("loan_days", self.loan_days, MAX_POLICY_DAYS)?;
        within_cap("due_soon_days", self.due_soon_days, MAX_POLICY_DAYS)?;
        within_cap("hand_off_grace_hours", self.hand_off_grace_hours, MAX_POLICY_DAYS * 24)?;

        if self.fine_per_day_cents < 0 {
            return Err(ValidationError::MustBePositive {
                field: "fine_per_day_cents".to_string(),
            });
        }

        Ok(())
    }
}

fn within_cap(field: &str, value: i64, max: i64) -> ValidationResult<()> {
    if value > max {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
        });
    }
    Ok(())
}
