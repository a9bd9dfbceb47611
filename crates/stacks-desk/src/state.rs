//! # Shared Desk State
//!
//! The desk wrapped in `Arc<Mutex<T>>` so several front-desk handlers can
//! share one coordinator.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Shared Desk Operations                               │
//! │                                                                         │
//! │  Handler A ──► with_desk(|d| d.borrow(..)) ──┐                          │
//! │                                              ├──► one lock covers every │
//! │  Handler B ──► with_desk(|d| d.reserve(..)) ─┘    member, copy & queue  │
//! │                                                                         │
//! │  NOTE: Every operation holds the lock for its whole duration.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex};

use crate::Desk;

/// Cloneable handle to one circulation desk.
#[derive(Debug, Clone)]
pub struct SharedDesk {
    inner: Arc<Mutex<Desk>>,
}

impl SharedDesk {
    pub fn new(desk: Desk) -> Self {
        SharedDesk {
            inner: Arc::new(Mutex::new(desk)),
        }
    }

    /// Runs `f` with exclusive access to the desk.
    ///
    /// A panic in an earlier caller does not lock the desk out; the
    /// coordinator never leaves partial state behind on failure.
    pub fn with_desk<R>(&self, f: impl FnOnce(&mut Desk) -> R) -> R {
        let mut desk = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut desk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DeskConfig;
    use crate::open_desk;
    use stacks_core::{BookCopy, CatalogKey, CoreError, MemberAccount, MemberId};
    use std::thread;

    fn shared() -> SharedDesk {
        let mut desk = open_desk(&DeskConfig::default()).unwrap();
        desk.catalog_mut()
            .add_copy(BookCopy::new(CatalogKey::from("X"), "Walden", "Thoreau"))
            .unwrap();
        for i in 0..8 {
            desk.catalog_mut()
                .add_member(MemberAccount::new(MemberId::new(format!("M-{}", i)), "Reader"))
                .unwrap();
        }
        SharedDesk::new(desk)
    }

    #[test]
    fn test_concurrent_borrows_have_one_winner() {
        let desk = shared();
        let copy = CatalogKey::from("X");

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let desk = desk.clone();
                let copy = copy.clone();
                thread::spawn(move || {
                    let member = MemberId::new(format!("M-{}", i));
                    desk.with_desk(|d| d.borrow(&member, &copy, None))
                })
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let winners = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(winners, 1);
        assert!(results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|e| matches!(e, CoreError::Unavailable { .. })));

        desk.with_desk(|d| {
            assert!(d.holder_of(&copy).is_some());
            assert_eq!(d.notifier().len(), 1);
        });
    }

    #[test]
    fn test_poisoned_lock_is_recovered() {
        let desk = shared();
        let poisoner = desk.clone();
        let _ = thread::spawn(move || {
            poisoner.with_desk(|_| panic!("handler crashed"));
        })
        .join();

        let available = desk.with_desk(|d| d.is_available(&CatalogKey::from("X")));
        assert!(available.unwrap());
    }
}
