//! # Money Module
//!
//! Provides the `Money` type for fines and fine payments.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  FINES ARE COUNTED, NOT MEASURED                                        │
//! │                                                                         │
//! │  A fine is (days overdue) × (per-diem rate). Both factors are exact    │
//! │  integers, so the product is exact as long as the rate is held in the  │
//! │  smallest currency unit:                                                │
//! │                                                                         │
//! │    6 days × 100 minor units = 600 minor units  ($6.00)                 │
//! │                                                                         │
//! │  Balances only ever add fines and subtract payments - no division, no  │
//! │  rounding, nothing lost.                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use stacks_core::money::Money;
//!
//! let per_diem = Money::from_cents(100); // $1.00 per overdue day
//! let fine = per_diem * 6_i64;           // $6.00
//! assert_eq!(fine.cents(), 600);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents for USD).
///
/// ## Where Money is Used
/// ```text
/// LendingPolicy.fine_per_day ──► Loan::fine() ──► MemberAccount balance
///                                                        │
///                         pay_fine(amount) ◄─────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use stacks_core::money::Money;
    ///
    /// let fine = Money::from_cents(250); // Represents $2.50
    /// assert_eq!(fine.cents(), 250);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Subtracts `other`, flooring the result at zero.
    ///
    /// Fine balances never go negative: overpaying simply clears the balance.
    ///
    /// ## Example
    /// ```rust
    /// use stacks_core::money::Money;
    ///
    /// let balance = Money::from_cents(300);
    /// assert_eq!(balance.saturating_sub_floor(Money::from_cents(500)), Money::zero());
    /// assert_eq!(balance.saturating_sub_floor(Money::from_cents(100)).cents(), 200);
    /// ```
    #[inline]
    pub const fn saturating_sub_floor(&self, other: Money) -> Money {
        let remaining = self.0.saturating_sub(other.0);
        if remaining < 0 {
            Money(0)
        } else {
            Money(remaining)
        }
    }

    /// Multiplies a per-day rate by a number of days.
    #[inline]
    pub const fn per_day(&self, days: i64) -> Self {
        Money(self.0.saturating_mul(days))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Human-readable form, used in notification messages and logs.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Saturating, like `per_day`: fine totals pin at the extremes instead of wrapping.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

/// Multiplication by a day count.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, days: i64) -> Self {
        self.per_day(days)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
