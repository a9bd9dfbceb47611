//! # Notification Outbox
//!
//! Bounded, in-memory retention for the notifications the coordinator emits.
//!
//! ## Retention
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      NotificationOutbox                                 │
//! │                                                                         │
//! │   notify(n) ──► [ oldest ... newest ] ──► drain() / to_json()           │
//! │                    │                                                    │
//! │                    ├── len > capacity  → oldest evicted (counted)       │
//! │                    └── prune_older_than(cutoff) → explicit clean-up     │
//! │                                                                         │
//! │   Nothing here is durable; a restart starts with an empty outbox.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use stacks_core::{MemberId, Notification, NotificationSink, Priority};
use tracing::debug;

use crate::error::DeskResult;

/// FIFO of pending notifications with a hard capacity.
#[derive(Debug, Clone)]
pub struct NotificationOutbox {
    entries: VecDeque<Notification>,
    capacity: usize,
    evicted: u64,
}

impl NotificationOutbox {
    /// Creates an outbox holding at most `capacity` notifications (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        NotificationOutbox {
            entries: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
            evicted: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// How many notifications were dropped to stay within capacity.
    pub fn evicted(&self) -> u64 {
        self.evicted
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.entries.iter()
    }

    pub fn for_member(&self, member: &MemberId) -> Vec<&Notification> {
        self.entries.iter().filter(|n| &n.member == member).collect()
    }

    /// Notifications at `min` priority or above, oldest first.
    pub fn at_least(&self, min: Priority) -> Vec<&Notification> {
        self.entries.iter().filter(|n| n.priority >= min).collect()
    }

    /// Removes and returns everything, oldest first.
    pub fn drain(&mut self) -> Vec<Notification> {
        self.entries.drain(..).collect()
    }

    /// Drops notifications created before `cutoff`. Returns how many.
    pub fn prune_older_than(&mut self, cutoff: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|n| n.created_at >= cutoff);
        let pruned = before - self.entries.len();
        if pruned > 0 {
            debug!(pruned, %cutoff, "Pruned old notifications");
        }
        pruned
    }

    /// Pretty JSON array of the current contents.
    pub fn to_json(&self) -> DeskResult<String> {
        Ok(serde_json::to_string_pretty(&self.entries)?)
    }
}

impl Default for NotificationOutbox {
    fn default() -> Self {
        Self::new(crate::config::NotificationSettings::default().outbox_capacity)
    }
}

impl NotificationSink for NotificationOutbox {
    fn notify(&mut self, notification: Notification) {
        self.entries.push_back(notification);
        while self.entries.len() > self.capacity {
            if let Some(dropped) = self.entries.pop_front() {
                self.evicted += 1;
                debug!(id = %dropped.id, member = %dropped.member, "Outbox full, evicted oldest");
            }
        }
    }
}
