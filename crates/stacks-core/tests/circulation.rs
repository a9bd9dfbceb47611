//! End-to-end circulation scenarios driven by a manual clock.

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use stacks_core::{
    BookCopy, Catalog, CatalogKey, Coordinator, CoreError, InMemoryCatalog, LendingPolicy,
    ManualClock, MemberAccount, MemberId, Money, Notification, NotificationCategory,
};

type Desk = Coordinator<InMemoryCatalog, Vec<Notification>>;

struct Library {
    desk: Desk,
    clock: ManualClock,
}

impl Library {
    fn open() -> Self {
        Self::with_policy(LendingPolicy::default())
    }

    fn with_policy(policy: LendingPolicy) -> Self {
        let clock = ManualClock::new(opening());
        let mut catalog = InMemoryCatalog::new();
        for (key, title, author) in [
            ("X", "The Left Hand of Darkness", "Ursula K. Le Guin"),
            ("Y", "Invisible Cities", "Italo Calvino"),
            ("Z", "Beloved", "Toni Morrison"),
        ] {
            catalog
                .add_copy(BookCopy::new(CatalogKey::from(key), title, author))
                .unwrap();
        }
        for (id, name) in [("A", "Ada"), ("B", "Boole"), ("C", "Church")] {
            catalog
                .add_member(MemberAccount::new(MemberId::from(id), name))
                .unwrap();
        }

        let desk = Coordinator::new(catalog, Vec::new(), Arc::new(clock.clone()), policy);
        Library { desk, clock }
    }

    fn holders(&self, copy: &str) -> usize {
        let copy = CatalogKey::from(copy);
        self.desk
            .catalog()
            .members()
            .filter(|member| member.holds(&copy))
            .count()
    }

    fn notices_for(&self, member: &str, category: NotificationCategory) -> usize {
        self.desk
            .notifier()
            .iter()
            .filter(|n| n.member.as_str() == member && n.category == category)
            .count()
    }

    fn queue(&self, copy: &str) -> Vec<String> {
        self.desk
            .catalog()
            .copy(&CatalogKey::from(copy))
            .unwrap()
            .reservations()
            .iter()
            .map(|m| m.to_string())
            .collect()
    }
}

fn opening() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 9, 2, 9, 0, 0).unwrap()
}

fn m(id: &str) -> MemberId {
    MemberId::from(id)
}

fn k(key: &str) -> CatalogKey {
    CatalogKey::from(key)
}

#[test]
fn test_at_most_one_holder_per_copy() {
    let mut lib = Library::open();

    lib.desk.borrow(&m("A"), &k("X"), None).unwrap();
    assert!(lib.desk.borrow(&m("B"), &k("X"), None).is_err());
    assert!(lib.desk.borrow(&m("A"), &k("X"), None).is_err());
    assert_eq!(lib.holders("X"), 1);

    lib.desk.return_copy(&m("A"), &k("X")).unwrap();
    assert_eq!(lib.holders("X"), 0);
    lib.desk.borrow(&m("C"), &k("X"), None).unwrap();
    assert_eq!(lib.holders("X"), 1);
}

#[test]
fn test_member_queued_at_most_once() {
    let mut lib = Library::open();
    lib.desk.borrow(&m("A"), &k("X"), None).unwrap();

    lib.desk.reserve(&m("B"), &k("X")).unwrap();
    assert!(matches!(
        lib.desk.reserve(&m("B"), &k("X")),
        Err(CoreError::AlreadyReserved { .. })
    ));
    assert_eq!(lib.queue("X"), vec!["B"]);
}

#[test]
fn test_borrow_and_immediate_return_is_free() {
    let mut lib = Library::open();

    lib.desk.borrow(&m("A"), &k("X"), None).unwrap();
    let outcome = lib.desk.return_copy(&m("A"), &k("X")).unwrap();

    assert!(outcome.returned.fine.is_zero());
    assert!(lib.desk.outstanding_fines(&m("A")).unwrap().is_zero());
    assert_eq!(lib.notices_for("A", NotificationCategory::Fine), 0);
}

#[test]
fn test_twenty_days_on_a_fourteen_day_loan() {
    let mut lib = Library::open();

    lib.desk.borrow(&m("A"), &k("X"), Some(14)).unwrap();
    lib.clock.advance_days(20);
    let outcome = lib.desk.return_copy(&m("A"), &k("X")).unwrap();

    assert_eq!(outcome.returned.days_overdue, 6);
    assert_eq!(outcome.returned.fine, Money::from_cents(600));
    let summary = lib.desk.member_summary(&m("A")).unwrap();
    assert_eq!(summary.fine_balance, Money::from_cents(600));
    assert_eq!(lib.notices_for("A", NotificationCategory::Fine), 1);
}

#[test]
fn test_days_overdue_never_decreases() {
    let mut lib = Library::open();
    let loan = lib.desk.borrow(&m("A"), &k("X"), Some(1)).unwrap();

    assert_eq!(loan.days_overdue(loan.due_at()), 0);
    assert_eq!(loan.days_overdue(loan.due_at() - Duration::hours(5)), 0);

    let mut previous = 0;
    for hours in [1, 12, 24, 25, 72, 500] {
        let days = loan.days_overdue(loan.due_at() + Duration::hours(hours));
        assert!(days > 0);
        assert!(days >= previous);
        previous = days;
    }
}

#[test]
fn test_outstanding_fines_gate_borrow_and_renew() {
    let mut lib = Library::open();
    lib.desk.borrow(&m("A"), &k("X"), Some(14)).unwrap();
    lib.desk.borrow(&m("A"), &k("Y"), Some(30)).unwrap();

    // Due tomorrow: nothing owed yet
    lib.clock.advance_days(13);
    assert!(lib.desk.outstanding_fines(&m("A")).unwrap().is_zero());
    lib.desk.renew(&m("A"), &k("Y"), Some(7)).unwrap();

    // X is now a day late; the live fine blocks everything
    lib.clock.advance_days(2);
    assert!(lib.desk.outstanding_fines(&m("A")).unwrap().is_positive());
    assert!(matches!(
        lib.desk.borrow(&m("A"), &k("Z"), None),
        Err(CoreError::OutstandingFines { .. })
    ));
    assert!(matches!(
        lib.desk.renew(&m("A"), &k("Y"), Some(7)),
        Err(CoreError::OutstandingFines { .. })
    ));

    // Returning locks the fine in; paying it reopens borrowing
    lib.desk.return_copy(&m("A"), &k("X")).unwrap();
    let owed = lib.desk.outstanding_fines(&m("A")).unwrap();
    assert!(lib.desk.borrow(&m("A"), &k("Z"), None).is_err());
    lib.desk.pay_fine(&m("A"), owed).unwrap();
    lib.desk.borrow(&m("A"), &k("Z"), None).unwrap();
}

#[test]
fn test_cancelled_reservation_gets_no_hand_off() {
    let mut lib = Library::open();
    lib.desk.borrow(&m("A"), &k("X"), None).unwrap();

    assert_eq!(lib.desk.reserve(&m("B"), &k("X")).unwrap(), 1);
    assert!(lib.desk.cancel_reservation(&m("B"), &k("X")).unwrap());

    let outcome = lib.desk.return_copy(&m("A"), &k("X")).unwrap();
    assert!(outcome.hand_off.is_none());
    assert_eq!(lib.notices_for("B", NotificationCategory::Availability), 0);
    assert!(lib.desk.is_available(&k("X")).unwrap());
}

#[test]
fn test_hand_off_is_a_notice_not_a_loan() {
    let mut lib = Library::open();
    lib.desk.borrow(&m("A"), &k("X"), None).unwrap();
    lib.desk.reserve(&m("B"), &k("X")).unwrap();

    let outcome = lib.desk.return_copy(&m("A"), &k("X")).unwrap();
    let hand_off = outcome.hand_off.unwrap();
    assert_eq!(hand_off.member, m("B"));
    assert_eq!(hand_off.respond_by - hand_off.offered_at, Duration::hours(24));

    assert_eq!(lib.notices_for("B", NotificationCategory::Availability), 1);
    assert!(lib.queue("X").is_empty());
    assert_eq!(lib.desk.holder_of(&k("X")), None);
    assert!(lib
        .desk
        .member_summary(&m("B"))
        .unwrap()
        .active_loans
        .is_empty());

    lib.desk.borrow(&m("B"), &k("X"), None).unwrap();
    assert_eq!(lib.desk.holder_of(&k("X")), Some(&m("B")));
}

#[test]
fn test_lapsed_grace_window_changes_nothing() {
    let mut lib = Library::open();
    lib.desk.borrow(&m("A"), &k("X"), None).unwrap();
    lib.desk.reserve(&m("B"), &k("X")).unwrap();
    lib.desk.return_copy(&m("A"), &k("X")).unwrap();

    lib.clock.advance_days(5);
    lib.desk.borrow(&m("C"), &k("X"), None).unwrap();
    assert_eq!(lib.desk.holder_of(&k("X")), Some(&m("C")));
}

#[test]
fn test_renew_refused_while_anyone_waits() {
    let mut lib = Library::open();
    lib.desk.borrow(&m("A"), &k("X"), None).unwrap();
    lib.desk.reserve(&m("B"), &k("X")).unwrap();
    lib.desk.reserve(&m("C"), &k("X")).unwrap();

    for member in ["A", "B", "C"] {
        assert!(matches!(
            lib.desk.renew(&m(member), &k("X"), None),
            Err(CoreError::ReservationsPending { queued: 2, .. })
        ));
    }

    lib.desk.cancel_reservation(&m("B"), &k("X")).unwrap();
    assert!(lib.desk.renew(&m("A"), &k("X"), None).is_err());
    lib.desk.cancel_reservation(&m("C"), &k("X")).unwrap();
    lib.desk.renew(&m("A"), &k("X"), None).unwrap();
}

#[test]
fn test_failed_operations_leave_state_untouched() {
    let mut lib = Library::open();
    lib.desk.borrow(&m("A"), &k("X"), None).unwrap();
    lib.desk.reserve(&m("B"), &k("X")).unwrap();
    let before = lib.desk.member_summary(&m("A")).unwrap();
    let notices = lib.desk.notifier().len();

    assert!(lib.desk.borrow(&m("C"), &k("X"), None).is_err());
    assert!(lib.desk.borrow(&m("C"), &k("Y"), Some(-3)).is_err());
    assert!(lib.desk.return_copy(&m("C"), &k("X")).is_err());
    assert!(lib.desk.renew(&m("A"), &k("X"), Some(7)).is_err());
    assert!(lib.desk.reserve(&m("C"), &k("Y")).is_err());
    assert!(lib.desk.pay_fine(&m("A"), Money::from_cents(-1)).is_err());

    assert_eq!(lib.desk.member_summary(&m("A")).unwrap(), before);
    assert!(lib
        .desk
        .member_summary(&m("C"))
        .unwrap()
        .active_loans
        .is_empty());
    assert_eq!(lib.queue("X"), vec!["B"]);
    assert_eq!(lib.desk.notifier().len(), notices);
}

#[test]
fn test_zero_fine_policy_makes_overdue_renewals_return_first() {
    let policy = LendingPolicy {
        fine_per_day_cents: 0,
        ..LendingPolicy::default()
    };
    let mut lib = Library::with_policy(policy);

    lib.desk.borrow(&m("A"), &k("X"), Some(7)).unwrap();
    lib.clock.advance_days(8);

    assert!(matches!(
        lib.desk.renew(&m("A"), &k("X"), None),
        Err(CoreError::MustReturnFirst { .. })
    ));
    let outcome = lib.desk.return_copy(&m("A"), &k("X")).unwrap();
    assert_eq!(outcome.returned.days_overdue, 1);
    assert!(outcome.returned.fine.is_zero());
}

#[test]
fn test_read_history_feeds_summary() {
    let mut lib = Library::open();
    for copy in ["Z", "X", "Z"] {
        lib.desk.borrow(&m("C"), &k(copy), None).unwrap();
        lib.desk.return_copy(&m("C"), &k(copy)).unwrap();
    }
    lib.desk.borrow(&m("C"), &k("Y"), None).unwrap();

    let summary = lib.desk.member_summary(&m("C")).unwrap();
    assert_eq!(summary.read_history, vec![k("X"), k("Z")]);
    assert_eq!(summary.active_loans.len(), 1);
    assert_eq!(summary.active_loans[0].copy(), &k("Y"));
}
