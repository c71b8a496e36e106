//! End-to-end lending scenarios for biblio-engine
//!
//! These tests drive full borrow/return flows through the public API and
//! check the cross-store guarantees after each step.

use biblio_engine::{
    CatalogService, Error, ErrorKind, LendingEngine, LibrarySnapshot, LoanStore,
    MembershipService, DEFAULT_BORROW_LIMIT, LATE_FEE_PER_DAY,
};
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap()
}

fn today() -> NaiveDate {
    start().date_naive()
}

fn new_engine() -> LendingEngine {
    LendingEngine::new(
        CatalogService::new(),
        MembershipService::new(),
        LoanStore::new(),
    )
}

fn add_book(engine: &mut LendingEngine, isbn: &str, title: &str) {
    engine
        .catalog_mut()
        .add_book(isbn, title, "Test Author", 2001, today())
        .unwrap();
}

fn register(engine: &mut LendingEngine, name: &str, email: &str) -> String {
    engine
        .membership_mut()
        .register_member(name, email, "0123456789", today())
        .unwrap()
        .member_id
}

// ============================================================================
// Borrow / Return Round Trips
// ============================================================================

#[test]
fn borrow_then_return_restores_availability() {
    let mut engine = new_engine();
    add_book(&mut engine, "978-A", "Book A");
    let member = register(&mut engine, "Alice", "alice@example.com");

    let loan = engine.borrow(&member, "978-A", start()).unwrap();
    assert_eq!(
        engine.membership().member(&member).unwrap().borrowed_books().len(),
        1
    );
    assert!(!engine.catalog().is_available("978-A"));

    engine
        .return_book(&member, "978-A", start() + Duration::days(3))
        .unwrap();

    assert!(engine.catalog().is_available("978-A"));
    assert!(engine
        .membership()
        .member(&member)
        .unwrap()
        .borrowed_books()
        .is_empty());

    // Exactly one transaction for the book, and it is closed
    let history = engine.book_transactions("978-A");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].transaction_id, loan.transaction_id);
    assert!(history[0].returned_at().is_some());
}

#[test]
fn second_member_cannot_borrow_a_borrowed_book() {
    let mut engine = new_engine();
    add_book(&mut engine, "978-A", "Book A");
    let m = register(&mut engine, "Alice", "alice@example.com");
    let n = register(&mut engine, "Bob", "bob@example.com");

    engine.borrow(&m, "978-A", start()).unwrap();

    let err = engine.borrow(&n, "978-A", start()).unwrap_err();
    assert!(matches!(err, Error::BookAlreadyBorrowed(_)));
    assert_eq!(err.kind(), ErrorKind::InvalidOperation);

    // Return by the holder frees the book for the second member
    engine.return_book(&m, "978-A", start() + Duration::days(1)).unwrap();
    engine.borrow(&n, "978-A", start() + Duration::days(1)).unwrap();
    assert!(engine.membership().member(&n).unwrap().has_borrowed("978-A"));
}

#[test]
fn open_transaction_per_book_is_zero_or_one() {
    let mut engine = new_engine();
    add_book(&mut engine, "978-A", "Book A");
    add_book(&mut engine, "978-B", "Book B");
    let member = register(&mut engine, "Alice", "alice@example.com");

    let check = |engine: &LendingEngine| {
        for isbn in ["978-A", "978-B"] {
            let open: Vec<_> = engine
                .book_transactions(isbn)
                .into_iter()
                .filter(|t| t.is_open())
                .collect();
            let book = engine.catalog().book(isbn).unwrap();
            assert!(open.len() <= 1);
            assert_eq!(open.len() == 1, !book.is_available());
        }
    };

    check(&engine);
    engine.borrow(&member, "978-A", start()).unwrap();
    check(&engine);
    engine.borrow(&member, "978-B", start()).unwrap();
    check(&engine);
    engine.return_book(&member, "978-A", start() + Duration::days(1)).unwrap();
    check(&engine);
    engine.borrow(&member, "978-A", start() + Duration::days(2)).unwrap();
    check(&engine);
}

// ============================================================================
// Borrow Limit
// ============================================================================

#[test]
fn sixth_borrow_fails_naming_the_limit() {
    let mut engine = new_engine();
    let member = register(&mut engine, "Alice", "alice@example.com");
    for i in 0..=DEFAULT_BORROW_LIMIT {
        add_book(&mut engine, &format!("978-{i:010}"), &format!("Book {i}"));
    }

    for i in 0..DEFAULT_BORROW_LIMIT {
        engine.borrow(&member, &format!("978-{i:010}"), start()).unwrap();
    }
    assert_eq!(
        engine.membership().member(&member).unwrap().borrowed_count(),
        DEFAULT_BORROW_LIMIT
    );

    let err = engine
        .borrow(&member, &format!("978-{DEFAULT_BORROW_LIMIT:010}"), start())
        .unwrap_err();
    match &err {
        Error::BorrowLimitExceeded { limit, .. } => {
            assert_eq!(*limit, DEFAULT_BORROW_LIMIT);
            assert!(err.to_string().contains('5'));
        }
        other => panic!("expected BorrowLimitExceeded, got {other:?}"),
    }

    // Returning one book re-opens capacity
    engine
        .return_book(&member, "978-0000000000", start() + Duration::days(1))
        .unwrap();
    engine
        .borrow(
            &member,
            &format!("978-{DEFAULT_BORROW_LIMIT:010}"),
            start() + Duration::days(1),
        )
        .unwrap();
}

// ============================================================================
// Double Return and Ordering
// ============================================================================

#[test]
fn double_return_fails_and_leaves_the_fee_alone() {
    let mut engine = new_engine();
    add_book(&mut engine, "978-A", "Book A");
    let member = register(&mut engine, "Alice", "alice@example.com");

    engine.borrow(&member, "978-A", start()).unwrap();
    let closed = engine
        .return_book(&member, "978-A", start() + Duration::days(16))
        .unwrap();
    assert_eq!(closed.late_fee(), 2.0 * LATE_FEE_PER_DAY);

    // The member's set no longer holds the book, so the second attempt
    // fails on the member-side check
    let err = engine
        .return_book(&member, "978-A", start() + Duration::days(17))
        .unwrap_err();
    assert!(matches!(err, Error::NotBorrowedByMember { .. }));
    assert_eq!(err.kind(), ErrorKind::InvalidOperation);

    let recorded = engine
        .late_fee(&closed.transaction_id, start() + Duration::days(300))
        .unwrap();
    assert_eq!(recorded, 2.0 * LATE_FEE_PER_DAY);
}

// ============================================================================
// Late Fees
// ============================================================================

#[test]
fn late_fee_two_days_past_due() {
    let mut engine = new_engine();
    add_book(&mut engine, "978-A", "Book A");
    let member = register(&mut engine, "Alice", "alice@example.com");

    engine.borrow(&member, "978-A", start()).unwrap();
    let closed = engine
        .return_book(&member, "978-A", start() + Duration::days(16))
        .unwrap();

    assert_eq!(closed.late_fee(), 2.0 * LATE_FEE_PER_DAY);
}

#[test]
fn no_fee_at_or_before_due() {
    let mut engine = new_engine();
    add_book(&mut engine, "978-A", "Book A");
    add_book(&mut engine, "978-B", "Book B");
    let member = register(&mut engine, "Alice", "alice@example.com");

    engine.borrow(&member, "978-A", start()).unwrap();
    let on_time = engine
        .return_book(&member, "978-A", start() + Duration::days(14))
        .unwrap();
    assert_eq!(on_time.late_fee(), 0.0);

    engine.borrow(&member, "978-B", start()).unwrap();
    let early = engine
        .return_book(&member, "978-B", start() + Duration::days(2))
        .unwrap();
    assert_eq!(early.late_fee(), 0.0);

    assert_eq!(engine.total_late_fees(), 0.0);
}

#[test]
fn overdue_projection_tracks_now() {
    let mut engine = new_engine();
    add_book(&mut engine, "978-A", "Book A");
    let member = register(&mut engine, "Alice", "alice@example.com");
    engine.borrow(&member, "978-A", start()).unwrap();

    assert!(engine.overdue_transactions(start() + Duration::days(14)).is_empty());

    let overdue = engine.overdue_transactions(start() + Duration::days(15));
    assert_eq!(overdue.len(), 1);
    assert_eq!(overdue[0].days_overdue(start() + Duration::days(15)), 1);
}

// ============================================================================
// Membership Lifecycle
// ============================================================================

#[test]
fn deactivation_requires_an_empty_borrowed_set() {
    let mut engine = new_engine();
    add_book(&mut engine, "978-A", "Book A");
    let member = register(&mut engine, "Alice", "alice@example.com");
    engine.borrow(&member, "978-A", start()).unwrap();

    let err = engine.membership_mut().deactivate_member(&member).unwrap_err();
    assert!(matches!(err, Error::MemberHasOpenLoans { .. }));

    engine.return_book(&member, "978-A", start() + Duration::days(1)).unwrap();
    engine.membership_mut().deactivate_member(&member).unwrap();

    let err = engine
        .borrow(&member, "978-A", start() + Duration::days(2))
        .unwrap_err();
    assert!(matches!(err, Error::MemberInactive(_)));
}

// ============================================================================
// Snapshot Round Trip
// ============================================================================

#[test]
fn snapshot_roundtrip_through_json() {
    let mut engine = new_engine();
    add_book(&mut engine, "978-A", "Book A");
    add_book(&mut engine, "978-B", "Book B");
    let member = register(&mut engine, "Alice", "alice@example.com");
    register(&mut engine, "Bob", "bob@example.com");

    engine.borrow(&member, "978-A", start()).unwrap();
    engine
        .return_book(&member, "978-A", start() + Duration::days(16))
        .unwrap();
    engine.borrow(&member, "978-B", start() + Duration::days(17)).unwrap();

    let json = engine.export_snapshot().to_json_pretty().unwrap();
    let snapshot = LibrarySnapshot::from_json(&json).unwrap();

    let mut restored = new_engine();
    restored.import_snapshot(snapshot).unwrap();

    // Observably identical state
    assert_eq!(restored.export_snapshot(), engine.export_snapshot());
    assert_eq!(restored.total_late_fees(), 2.0 * LATE_FEE_PER_DAY);
    assert_eq!(restored.open_transaction_count(), 1);

    // The restored engine keeps enforcing the rules
    let err = restored
        .borrow(&member, "978-B", start() + Duration::days(18))
        .unwrap_err();
    assert!(matches!(err, Error::BookAlreadyBorrowed(_)));
}
