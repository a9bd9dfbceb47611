//! # stacks-desk: Circulation Desk Runtime
//!
//! Puts [`stacks_core`] to work: configuration from TOML and the
//! environment, a bounded notification outbox, and a thread-safe handle.
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Desk Startup                                     │
//! │                                                                         │
//! │  1. DeskConfig::load(path) ────────► defaults < desk.toml < STACKS_*    │
//! │                                                                         │
//! │  2. open_desk(&config) ────────────► Coordinator {                      │
//! │                                        catalog:  InMemoryCatalog,       │
//! │                                        notifier: NotificationOutbox,    │
//! │                                        clock:    SystemClock,           │
//! │                                        policy:   config.lending }       │
//! │                                                                         │
//! │  3. SharedDesk::new(desk) ─────────► handed to every request handler    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod outbox;
pub mod state;

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use stacks_core::{Clock, Coordinator, InMemoryCatalog, SystemClock};
use tracing::info;

pub use config::{DeskConfig, LibrarySettings, NotificationSettings};
pub use error::{DeskError, DeskResult};
pub use outbox::NotificationOutbox;
pub use state::SharedDesk;

/// The coordinator as a desk runs it.
pub type Desk = Coordinator<InMemoryCatalog, NotificationOutbox>;

/// Opens an empty desk on the system clock.
pub fn open_desk(config: &DeskConfig) -> DeskResult<Desk> {
    open_desk_with_clock(config, Arc::new(SystemClock))
}

/// Opens an empty desk on the given clock.
pub fn open_desk_with_clock(config: &DeskConfig, clock: Arc<dyn Clock>) -> DeskResult<Desk> {
    config.validate()?;

    info!(
        library = %config.library.name,
        loan_days = config.lending.loan_days,
        fine_per_day_cents = config.lending.fine_per_day_cents,
        outbox_capacity = config.notifications.outbox_capacity,
        "Opening circulation desk"
    );

    Ok(Coordinator::new(
        InMemoryCatalog::new(),
        NotificationOutbox::new(config.notifications.outbox_capacity),
        clock,
        config.lending,
    ))
}

/// Drops outbox entries older than the configured retention window.
pub fn prune_expired_notifications(desk: &mut Desk, settings: &NotificationSettings) -> usize {
    let now = desk.now();
    let cutoff = Duration::try_days(settings.retention_days)
        .and_then(|window| now.checked_sub_signed(window))
        .unwrap_or(DateTime::<Utc>::MIN_UTC);
    desk.notifier_mut().prune_older_than(cutoff)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use stacks_core::{BookCopy, CatalogKey, ManualClock, MemberAccount, MemberId};

    #[test]
    fn test_open_desk_rejects_invalid_config() {
        let mut config = DeskConfig::default();
        config.lending.fine_per_day_cents = -1;
        assert!(open_desk(&config).is_err());
    }

    #[test]
    fn test_desk_uses_configured_policy() {
        let mut config = DeskConfig::default();
        config.lending.loan_days = 21;
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 1, 8, 9, 0, 0).unwrap());
        let mut desk = open_desk_with_clock(&config, Arc::new(clock.clone())).unwrap();

        desk.catalog_mut()
            .add_copy(BookCopy::new(CatalogKey::from("X"), "Emma", "Austen"))
            .unwrap();
        desk.catalog_mut()
            .add_member(MemberAccount::new(MemberId::from("A"), "Ada"))
            .unwrap();

        let loan = desk
            .borrow(&MemberId::from("A"), &CatalogKey::from("X"), None)
            .unwrap();
        assert_eq!(loan.due_at(), clock.now() + Duration::days(21));
        assert_eq!(desk.notifier().len(), 1);
    }

    #[test]
    fn test_prune_expired_notifications() {
        let config = DeskConfig::default();
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 1, 8, 9, 0, 0).unwrap());
        let mut desk = open_desk_with_clock(&config, Arc::new(clock.clone())).unwrap();
        desk.catalog_mut()
            .add_copy(BookCopy::new(CatalogKey::from("X"), "Emma", "Austen"))
            .unwrap();
        desk.catalog_mut()
            .add_member(MemberAccount::new(MemberId::from("A"), "Ada"))
            .unwrap();
        desk.borrow(&MemberId::from("A"), &CatalogKey::from("X"), None)
            .unwrap();

        clock.advance_days(10);
        assert_eq!(prune_expired_notifications(&mut desk, &config.notifications), 0);

        clock.advance_days(25);
        assert_eq!(prune_expired_notifications(&mut desk, &config.notifications), 1);
        assert!(desk.notifier().is_empty());
    }

    #[test]
    fn test_prune_with_unbounded_retention_keeps_everything() {
        let config = DeskConfig::default();
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 1, 8, 9, 0, 0).unwrap());
        let mut desk = open_desk_with_clock(&config, Arc::new(clock.clone())).unwrap();
        desk.catalog_mut()
            .add_copy(BookCopy::new(CatalogKey::from("X"), "Emma", "Austen"))
            .unwrap();
        desk.catalog_mut()
            .add_member(MemberAccount::new(MemberId::from("A"), "Ada"))
            .unwrap();
        desk.borrow(&MemberId::from("A"), &CatalogKey::from("X"), None)
            .unwrap();

        let settings = NotificationSettings {
            retention_days: i64::MAX,
            ..NotificationSettings::default()
        };
        clock.advance_days(400);
        assert_eq!(prune_expired_notifications(&mut desk, &settings), 0);
        assert_eq!(desk.notifier().len(), 1);
    }
}
