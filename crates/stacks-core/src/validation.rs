//! # Validation Module
//!
//! Argument validation for lending operations.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: THIS MODULE                                                  │
//! │  ├── Shape of arguments (positive days, positive payments)             │
//! │  └── Format of identifiers (catalog keys, member ids)                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Lending rules (member / coordinator)                         │
//! │  ├── Fines, holders, queues                                            │
//! │  └── Raised as CoreError variants other than InvalidArgument           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use stacks_core::validation::{validate_days, validate_catalog_key};
//!
//! validate_catalog_key("978-0-14-044913-6").unwrap();
//! assert!(validate_days("duration", 0).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest catalog key accepted (ISBN-13 with hyphens is 17).
pub const MAX_CATALOG_KEY_LEN: usize = 32;

/// Longest member identifier accepted.
pub const MAX_MEMBER_ID_LEN: usize = 64;

// =============================================================================
// Identifier Validators
// =============================================================================

/// Validates a catalog key.
///
/// ## Rules
/// - Must not be empty
/// - At most [`MAX_CATALOG_KEY_LEN`] characters
/// - Only letters, digits and hyphens
///
/// ## Example
/// ```rust
/// use stacks_core::validation::validate_catalog_key;
///
/// assert!(validate_catalog_key("978-0-14-044913-6").is_ok());
/// assert!(validate_catalog_key("").is_err());
/// assert!(validate_catalog_key("has space").is_err());
/// ```
pub fn validate_catalog_key(key: &str) -> ValidationResult<()> {
    if key.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "catalog key".to_string(),
        });
    }

    if key.len() > MAX_CATALOG_KEY_LEN {
        return Err(ValidationError::TooLong {
            field: "catalog key".to_string(),
            max: MAX_CATALOG_KEY_LEN,
        });
    }

    if !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(ValidationError::InvalidFormat {
            field: "catalog key".to_string(),
            reason: "must contain only letters, digits, and hyphens".to_string(),
        });
    }

    Ok(())
}

/// Validates a member identifier.
///
/// ## Rules
/// - Must not be empty or whitespace
/// - At most [`MAX_MEMBER_ID_LEN`] characters
/// - No whitespace inside
pub fn validate_member_id(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "member id".to_string(),
        });
    }

    if id.len() > MAX_MEMBER_ID_LEN {
        return Err(ValidationError::TooLong {
            field: "member id".to_string(),
            max: MAX_MEMBER_ID_LEN,
        });
    }

    if id.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidFormat {
            field: "member id".to_string(),
            reason: "must not contain whitespace".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a day count (loan duration, renewal extension).
///
/// ## Rules
/// - Must be positive (> 0)
///
/// ## User Workflow
/// ```text
/// renew(member, copy, days = 0)
///      │
///      ▼
/// validate_days("extension", 0) ← THIS FUNCTION
///      │
///      └── days <= 0? → InvalidArgument("extension must be positive")
/// ```
pub fn validate_days(field: &str, days: i64) -> ValidationResult<()> {
    if days <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a fine payment.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Overpayment is allowed; the balance floors at zero
pub fn validate_payment(amount: Money) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "payment amount".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_catalog_key() {
        assert!(validate_catalog_key("978-0-14-044913-6").is_ok());
        assert!(validate_catalog_key("QA76").is_ok());

        assert!(validate_catalog_key("").is_err());
        assert!(validate_catalog_key("   ").is_err());
        assert!(validate_catalog_key("has space").is_err());
        assert!(validate_catalog_key("under_score").is_err());
        assert!(validate_catalog_key(&"9".repeat(40)).is_err());
    }

    #[test]
    fn test_validate_member_id() {
        assert!(validate_member_id("M-0042").is_ok());
        assert!(validate_member_id("alice@branch").is_ok());

        assert!(validate_member_id("").is_err());
        assert!(validate_member_id("two words").is_err());
        assert!(validate_member_id(&"m".repeat(65)).is_err());
    }

    #[test]
    fn test_validate_days() {
        assert!(validate_days("duration", 1).is_ok());
        assert!(validate_days("duration", 14).is_ok());

        let err = validate_days("extension", 0).unwrap_err();
        assert_eq!(err.to_string(), "extension must be positive");
        assert!(validate_days("extension", -3).is_err());
    }

    #[test]
    fn test_validate_payment() {
        assert!(validate_payment(Money::from_cents(1)).is_ok());
        assert!(validate_payment(Money::zero()).is_err());
        assert!(validate_payment(Money::from_cents(-100)).is_err());
    }
}
