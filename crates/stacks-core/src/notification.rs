//! # Notifications
//!
//! Events the core emits for members. The core writes them into a
//! [`NotificationSink`] and never reads them back; retention, delivery and
//! formatting belong to the sink.
//!
//! | Trigger                         | Category       | Priority |
//! |---------------------------------|----------------|----------|
//! | reservation placed / cancelled  | `Reservation`  | Low      |
//! | loan created                    | `Loan`         | Normal   |
//! | renewal succeeded               | `Renewal`      | Normal   |
//! | fine incurred on return         | `Fine`         | High     |
//! | fine fully paid                 | `Fine`         | Low      |
//! | queued member handed the copy   | `Availability` | High     |
//! | due-soon / overdue reminder     | `Reminder`     | Normal / High |

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::types::MemberId;

/// What a notification is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum NotificationCategory {
    Reservation,
    Loan,
    Renewal,
    Fine,
    Availability,
    Reminder,
}

/// Delivery urgency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Normal,
    High,
}

/// One message for one member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Notification {
    #[ts(as = "String")]
    pub id: Uuid,
    pub member: MemberId,
    pub category: NotificationCategory,
    pub message: String,
    pub priority: Priority,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(
        member: MemberId,
        category: NotificationCategory,
        message: impl Into<String>,
        priority: Priority,
        created_at: DateTime<Utc>,
    ) -> Self {
        Notification {
            id: Uuid::new_v4(),
            member,
            category,
            message: message.into(),
            priority,
            created_at,
        }
    }
}

/// Receiver of notification events.
pub trait NotificationSink {
    fn notify(&mut self, notification: Notification);
}

/// Collects every notification; handy for tests and short-lived desks.
impl NotificationSink for Vec<Notification> {
    fn notify(&mut self, notification: Notification) {
        self.push(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_sink_keeps_order() {
        let mut sink: Vec<Notification> = Vec::new();
        let now = Utc::now();
        sink.notify(Notification::new(
            MemberId::from("A"),
            NotificationCategory::Loan,
            "first",
            Priority::Normal,
            now,
        ));
        sink.notify(Notification::new(
            MemberId::from("B"),
            NotificationCategory::Fine,
            "second",
            Priority::High,
            now,
        ));

        assert_eq!(sink.len(), 2);
        assert_eq!(sink[0].message, "first");
        assert_ne!(sink[0].id, sink[1].id);
    }

    #[test]
    fn test_priority_ordering() {
        assert!(Priority::High > Priority::Normal);
        assert!(Priority::Normal > Priority::Low);
    }

    #[test]
    fn test_category_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&NotificationCategory::Availability).unwrap(),
            "\"availability\""
        );
    }
}
