//! # Reservation Queue
//!
//! FIFO of members waiting for one copy.
//!
//! ```text
//!   head                                 tail
//!   ┌──────┬──────┬──────┐   enqueue(D)  ┌──────┬──────┬──────┬──────┐
//!   │  A   │  B   │  C   │ ────────────► │  A   │  B   │  C   │  D   │
//!   └──────┴──────┴──────┘               └──────┴──────┴──────┴──────┘
//!      ▲                       remove(B)   works anywhere in the queue
//!      └── dequeue() on return hands the copy to A
//! ```
//!
//! Membership is deduplicated, so insertion order alone decides hand-off
//! priority. All operations are linear in queue length.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::types::MemberId;

/// Ordered, duplicate-free list of waiting members.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReservationQueue {
    members: VecDeque<MemberId>,
}

impl ReservationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `member` at the tail unless already queued.
    ///
    /// Returns `true` if the member was added.
    pub fn enqueue(&mut self, member: MemberId) -> bool {
        if self.contains(&member) {
            return false;
        }
        self.members.push_back(member);
        true
    }

    /// The next member in line, without removing them.
    pub fn peek(&self) -> Option<&MemberId> {
        self.members.front()
    }

    /// Removes and returns the head.
    pub fn dequeue(&mut self) -> Option<MemberId> {
        self.members.pop_front()
    }

    /// Removes `member` wherever they sit. Returns whether anything was removed.
    pub fn remove(&mut self, member: &MemberId) -> bool {
        match self.members.iter().position(|m| m == member) {
            Some(index) => {
                self.members.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, member: &MemberId) -> bool {
        self.members.contains(member)
    }

    /// 1-based position of `member`, if queued.
    pub fn position(&self, member: &MemberId) -> Option<usize> {
        self.members.iter().position(|m| m == member).map(|i| i + 1)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Members from head to tail.
    pub fn iter(&self) -> impl Iterator<Item = &MemberId> {
        self.members.iter()
    }
}
