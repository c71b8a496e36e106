//! Lending engine - the one place where multiple stores move together.
//!
//! Borrow and return must update the catalog, the member's borrowed set, and
//! the loan store as a single consistent operation. Every precondition is
//! checked before the first write, so a failed operation leaves no trace and
//! needs no rollback. Single-store operations stay on the individual
//! services; only the engine writes to more than one store per call.

use crate::{
    error::Result, id, BookStatus, CatalogService, Error, LibrarySnapshot, LoanStore,
    MembershipService, Transaction,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Counters for the statistics view. Rendering is the front end's job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryStatistics {
    /// Books in the catalog
    pub total_books: usize,
    /// Books currently available
    pub available_books: usize,
    /// Books currently out
    pub borrowed_books: usize,
    /// Registered members
    pub total_members: usize,
    /// Active members
    pub active_members: usize,
    /// Transactions ever recorded
    pub total_transactions: usize,
    /// Currently open loans
    pub open_transactions: usize,
    /// Loans overdue at the evaluation instant
    pub overdue_transactions: usize,
    /// Late fees recorded across closed transactions
    pub total_late_fees: f64,
}

/// The lending transaction engine.
///
/// Owns the catalog, the roster, and the loan store. Built once by the
/// composition root and passed around explicitly.
#[derive(Debug, Clone, Default)]
pub struct LendingEngine {
    catalog: CatalogService,
    membership: MembershipService,
    loans: LoanStore,
}

impl LendingEngine {
    /// Assemble the engine from its collaborators.
    pub fn new(catalog: CatalogService, membership: MembershipService, loans: LoanStore) -> Self {
        Self {
            catalog,
            membership,
            loans,
        }
    }

    /// The catalog service.
    pub fn catalog(&self) -> &CatalogService {
        &self.catalog
    }

    /// Mutable access to the catalog service for catalog-only operations.
    pub fn catalog_mut(&mut self) -> &mut CatalogService {
        &mut self.catalog
    }

    /// The membership service.
    pub fn membership(&self) -> &MembershipService {
        &self.membership
    }

    /// Mutable access to the membership service for roster-only operations.
    pub fn membership_mut(&mut self) -> &mut MembershipService {
        &mut self.membership
    }

    /// The loan store.
    pub fn loans(&self) -> &LoanStore {
        &self.loans
    }

    /// Borrow a book for a member at `now`.
    ///
    /// Checks, in order: the member exists, is active, and is under the
    /// borrow limit; the book exists and is available. Only then does the
    /// engine write: a new open transaction, the book flipped to borrowed,
    /// the ISBN added to the member's set. Returns a snapshot of the created
    /// transaction.
    pub fn borrow(&mut self, member_id: &str, isbn: &str, now: DateTime<Utc>) -> Result<Transaction> {
        let member = self.membership.member(member_id)?;
        if !member.is_active() {
            return Err(Error::MemberInactive(member_id.to_owned()));
        }
        if member.borrowed_count() >= self.membership.borrow_limit() {
            return Err(Error::BorrowLimitExceeded {
                member_id: member_id.to_owned(),
                limit: self.membership.borrow_limit(),
            });
        }

        let book = self.catalog.book(isbn)?;
        if !book.is_available() {
            return Err(Error::BookAlreadyBorrowed(isbn.to_owned()));
        }

        let transaction_id = id::fresh_id(
            id::TRANSACTION_ID_PREFIX,
            id::TRANSACTION_SUFFIX_LEN,
            |candidate| self.loans.exists(candidate),
        );
        let transaction = Transaction::open(transaction_id, member_id, isbn, now);

        self.catalog.set_status(isbn, BookStatus::Borrowed)?;
        self.membership.record_borrow(member_id, isbn)?;
        self.loans.insert(transaction.clone());

        Ok(transaction)
    }

    /// Return a book for a member at `now`.
    ///
    /// Checks, in order: the member exists; the book exists; the member's
    /// borrowed set contains the ISBN; an open transaction exists for the
    /// ISBN; that transaction belongs to the member. The borrowed-set check
    /// and the open-transaction lookup fail with distinct errors so a drift
    /// between the two stores stays diagnosable. On success the transaction
    /// is closed (fee fixed from the return instant), the book flips back to
    /// available, and the ISBN leaves the member's set.
    pub fn return_book(
        &mut self,
        member_id: &str,
        isbn: &str,
        now: DateTime<Utc>,
    ) -> Result<Transaction> {
        let member = self.membership.member(member_id)?;
        self.catalog.book(isbn)?;

        if !member.has_borrowed(isbn) {
            return Err(Error::NotBorrowedByMember {
                member_id: member_id.to_owned(),
                isbn: isbn.to_owned(),
            });
        }

        let open = self
            .loans
            .open_by_book(isbn)
            .ok_or_else(|| Error::BookNotBorrowed(isbn.to_owned()))?;
        if open.member_id != member_id {
            return Err(Error::BorrowedByOtherMember(isbn.to_owned()));
        }
        let transaction_id = open.transaction_id.clone();

        let transaction = self
            .loans
            .get_mut(&transaction_id)
            .ok_or_else(|| Error::BookNotBorrowed(isbn.to_owned()))?;
        transaction.complete_return(now);
        let closed = transaction.clone();

        self.catalog.set_status(isbn, BookStatus::Available)?;
        self.membership.record_return(member_id, isbn)?;

        Ok(closed)
    }

    /// A member's transactions, most recent borrow first.
    pub fn member_transactions(&self, member_id: &str) -> Vec<&Transaction> {
        self.loans.by_member(member_id)
    }

    /// A book's transactions, most recent borrow first.
    pub fn book_transactions(&self, isbn: &str) -> Vec<&Transaction> {
        self.loans.by_book(isbn)
    }

    /// A member's open loans.
    pub fn member_open_transactions(&self, member_id: &str) -> Vec<&Transaction> {
        self.loans.open_by_member(member_id)
    }

    /// All loans overdue at `now`, soonest due first.
    pub fn overdue_transactions(&self, now: DateTime<Utc>) -> Vec<&Transaction> {
        self.loans.overdue(now)
    }

    /// The full transaction history in insertion order.
    pub fn all_transactions(&self) -> Vec<&Transaction> {
        self.loans.history()
    }

    /// The `limit` most recent transactions.
    pub fn recent_transactions(&self, limit: usize) -> Vec<&Transaction> {
        self.loans.recent(limit)
    }

    /// The fee owed on a transaction at `now`: the recorded fee for a closed
    /// loan, a live projection for an open one.
    pub fn late_fee(&self, transaction_id: &str, now: DateTime<Utc>) -> Result<f64> {
        let transaction = self
            .loans
            .get(transaction_id)
            .ok_or_else(|| Error::TransactionNotFound(transaction_id.to_owned()))?;
        Ok(transaction.late_fee_at(now))
    }

    /// Sum of late fees recorded across closed transactions.
    pub fn total_late_fees(&self) -> f64 {
        self.loans.total_late_fees()
    }

    /// Transactions ever recorded.
    pub fn transaction_count(&self) -> usize {
        self.loans.count()
    }

    /// Currently open loans.
    pub fn open_transaction_count(&self) -> usize {
        self.loans.open_count()
    }

    /// The statistics view at `now`.
    pub fn statistics(&self, now: DateTime<Utc>) -> LibraryStatistics {
        let total_books = self.catalog.book_count();
        let available_books = self.catalog.available_count();
        LibraryStatistics {
            total_books,
            available_books,
            borrowed_books: total_books - available_books,
            total_members: self.membership.member_count(),
            active_members: self.membership.active_member_count(),
            total_transactions: self.loans.count(),
            open_transactions: self.loans.open_count(),
            overdue_transactions: self.loans.overdue(now).len(),
            total_late_fees: self.loans.total_late_fees(),
        }
    }

    /// Export the full state of all three stores.
    pub fn export_snapshot(&self) -> LibrarySnapshot {
        let mut snapshot = LibrarySnapshot::new();
        for book in self.catalog.store().iter() {
            snapshot.add_book(book.clone());
        }
        for member in self.membership.store().iter() {
            snapshot.add_member(member.clone());
        }
        for id in self.loans.history_ids() {
            if let Some(transaction) = self.loans.get(id) {
                snapshot.add_transaction(transaction.clone());
            }
        }
        snapshot
    }

    /// Replace the full state of all three stores with the snapshot's.
    pub fn import_snapshot(&mut self, snapshot: LibrarySnapshot) -> Result<()> {
        snapshot.validate()?;

        self.catalog.clear();
        self.membership.clear();
        self.loans.clear();

        for (_, book) in snapshot.books {
            self.catalog.restore(book);
        }
        for (_, member) in snapshot.members {
            self.membership.restore(member);
        }
        let mut transactions = snapshot.transactions;
        for id in &snapshot.history {
            if let Some(transaction) = transactions.remove(id) {
                self.loans.insert(transaction);
            }
        }

        Ok(())
    }
}
