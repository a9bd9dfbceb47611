//! # Desk Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     STACKS_LOAN_DAYS=21                                                │
//! │     STACKS_FINE_PER_DAY_CENTS=50                                       │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/stacks/desk.toml (Linux)                                 │
//! │     ~/Library/Application Support/org.stacks.desk/desk.toml (macOS)    │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     14-day loans, 100 cents per overdue day                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # desk.toml
//! [library]
//! name = "Riverside Branch"
//!
//! [lending]
//! loan_days = 14
//! fine_per_day_cents = 100
//! due_soon_days = 3
//! hand_off_grace_hours = 24
//!
//! [notifications]
//! outbox_capacity = 500
//! retention_days = 30
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use stacks_core::{LendingPolicy, MAX_POLICY_DAYS};
use tracing::{debug, info, warn};

use crate::error::{DeskError, DeskResult};

// =============================================================================
// Library Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibrarySettings {
    /// Shown in logs and at the top of the seed walkthrough.
    #[serde(default = "default_library_name")]
    pub name: String,
}

fn default_library_name() -> String {
    "Stacks Lending Library".to_string()
}

impl Default for LibrarySettings {
    fn default() -> Self {
        LibrarySettings {
            name: default_library_name(),
        }
    }
}

// =============================================================================
// Notification Settings
// =============================================================================

/// Retention of the in-memory notification outbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationSettings {
    /// Oldest notifications are evicted beyond this many.
    #[serde(default = "default_outbox_capacity")]
    pub outbox_capacity: usize,

    /// Age after which `prune_expired_notifications` drops a notification.
    #[serde(default = "default_retention_days")]
    pub retention_days: i64,
}

fn default_outbox_capacity() -> usize {
    500
}

fn default_retention_days() -> i64 {
    30
}

impl Default for NotificationSettings {
    fn default() -> Self {
        NotificationSettings {
            outbox_capacity: default_outbox_capacity(),
            retention_days: default_retention_days(),
        }
    }
}

// =============================================================================
// Desk Configuration
// =============================================================================

/// Complete desk configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeskConfig {
    #[serde(default)]
    pub library: LibrarySettings,

    #[serde(default)]
    pub lending: LendingPolicy,

    #[serde(default)]
    pub notifications: NotificationSettings,
}

impl DeskConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (desk.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> DeskResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading desk config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load desk config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file as pretty TOML.
    pub fn save(&self, config_path: Option<PathBuf>) -> DeskResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| DeskError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| DeskError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| DeskError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Desk config saved");
        Ok(())
    }

    pub fn validate(&self) -> DeskResult<()> {
        if self.library.name.trim().is_empty() {
            return Err(DeskError::InvalidConfig("library name must not be empty".into()));
        }

        self.lending.validate()?;

        if self.notifications.outbox_capacity == 0 {
            return Err(DeskError::InvalidConfig(
                "outbox_capacity must be greater than 0".into(),
            ));
        }

        if self.notifications.retention_days <= 0 {
            return Err(DeskError::InvalidConfig(
                "retention_days must be greater than 0".into(),
            ));
        }

        if self.notifications.retention_days > MAX_POLICY_DAYS {
            return Err(DeskError::InvalidConfig(format!(
                "retention_days must be at most {}",
                MAX_POLICY_DAYS
            )));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies `STACKS_*` overrides read through `lookup`.
    ///
    /// Unparseable numbers are logged and ignored.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(name) = lookup("STACKS_LIBRARY_NAME") {
            debug!(name = %name, "Overriding library name from environment");
            self.library.name = name;
        }

        if let Some(days) = parse_override(&lookup, "STACKS_LOAN_DAYS") {
            self.lending.loan_days = days;
        }

        if let Some(cents) = parse_override(&lookup, "STACKS_FINE_PER_DAY_CENTS") {
            self.lending.fine_per_day_cents = cents;
        }

        if let Some(days) = parse_override(&lookup, "STACKS_DUE_SOON_DAYS") {
            self.lending.due_soon_days = days;
        }

        if let Some(hours) = parse_override(&lookup, "STACKS_GRACE_HOURS") {
            self.lending.hand_off_grace_hours = hours;
        }

        if let Some(capacity) = parse_override(&lookup, "STACKS_OUTBOX_CAPACITY") {
            self.notifications.outbox_capacity = capacity;
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("org", "stacks", "desk")
            .map(|dirs| dirs.config_dir().join("desk.toml"))
    }
}

fn parse_override<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => {
            debug!(key, value = %raw, "Overriding setting from environment");
            Some(value)
        }
        Err(_) => {
            warn!(key, value = %raw, "Ignoring unparseable environment override");
            None
        }
    }
}
