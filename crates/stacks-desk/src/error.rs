//! # Desk Error Types
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Desk Error Categories                             │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │  Serialization  │  │     Circulation         │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Serialization  │  │  Core(CoreError)        │ │
//! │  │  ConfigLoad     │  │  Failed         │  │  (passed through as-is) │ │
//! │  │  ConfigSave     │  │                 │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use stacks_core::{CoreError, ValidationError};
use thiserror::Error;

/// Result type alias for desk operations.
pub type DeskResult<T> = Result<T, DeskError>;

#[derive(Debug, Error)]
pub enum DeskError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Invalid desk configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Serialization Errors
    // =========================================================================
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    // =========================================================================
    // Circulation Errors
    // =========================================================================
    /// A refusal from the lending rules, unchanged.
    #[error(transparent)]
    Core(#[from] CoreError),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<ValidationError> for DeskError {
    fn from(err: ValidationError) -> Self {
        DeskError::Core(CoreError::InvalidArgument(err))
    }
}

impl From<std::io::Error> for DeskError {
    fn from(err: std::io::Error) -> Self {
        DeskError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for DeskError {
    fn from(err: toml::de::Error) -> Self {
        DeskError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for DeskError {
    fn from(err: toml::ser::Error) -> Self {
        DeskError::ConfigSaveFailed(err.to_string())
    }
}

impl From<serde_json::Error> for DeskError {
    fn from(err: serde_json::Error) -> Self {
        DeskError::SerializationFailed(err.to_string())
    }
}

impl DeskError {
    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            DeskError::InvalidConfig(_)
                | DeskError::ConfigLoadFailed(_)
                | DeskError::ConfigSaveFailed(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stacks_core::CatalogKey;

    #[test]
    fn test_core_errors_pass_through() {
        let err: DeskError = CoreError::Unavailable {
            copy: CatalogKey::from("X"),
        }
        .into();
        assert_eq!(err.to_string(), "Copy X is already on loan");
        assert!(!err.is_config_error());
    }

    #[test]
    fn test_toml_errors_are_config_errors() {
        let parse: Result<toml::Value, _> = toml::from_str("[library\nname = 1");
        let err: DeskError = parse.unwrap_err().into();
        assert!(err.is_config_error());
    }
}
