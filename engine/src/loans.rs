//! Loan store - transaction records and their derived queries.
//!
//! Transactions are keyed by identifier, with a separate list of identifiers
//! preserving insertion order for the permanent history. Records are never
//! deleted; a return closes the record in place.

use crate::{Transaction, TransactionId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Keyed collection of lending transactions plus insertion-ordered history.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanStore {
    transactions: HashMap<TransactionId, Transaction>,
    /// Transaction identifiers in insertion order
    history: Vec<TransactionId>,
}

impl LoanStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            transactions: HashMap::new(),
            history: Vec::new(),
        }
    }

    pub(crate) fn insert(&mut self, transaction: Transaction) {
        self.history.push(transaction.transaction_id.clone());
        self.transactions
            .insert(transaction.transaction_id.clone(), transaction);
    }

    pub(crate) fn get_mut(&mut self, transaction_id: &str) -> Option<&mut Transaction> {
        self.transactions.get_mut(transaction_id)
    }

    pub(crate) fn clear(&mut self) {
        self.transactions.clear();
        self.history.clear();
    }

    /// Get a transaction by identifier.
    pub fn get(&self, transaction_id: &str) -> Option<&Transaction> {
        self.transactions.get(transaction_id)
    }

    /// Check whether a transaction identifier exists.
    pub fn exists(&self, transaction_id: &str) -> bool {
        self.transactions.contains_key(transaction_id)
    }

    /// A member's transactions, most recent borrow first.
    pub fn by_member(&self, member_id: &str) -> Vec<&Transaction> {
        let mut found: Vec<&Transaction> = self
            .transactions
            .values()
            .filter(|t| t.member_id == member_id)
            .collect();
        Self::sort_recent_first(&mut found);
        found
    }

    /// A book's transactions, most recent borrow first.
    pub fn by_book(&self, isbn: &str) -> Vec<&Transaction> {
        let mut found: Vec<&Transaction> =
            self.transactions.values().filter(|t| t.isbn == isbn).collect();
        Self::sort_recent_first(&mut found);
        found
    }

    /// A member's open transactions.
    pub fn open_by_member(&self, member_id: &str) -> Vec<&Transaction> {
        let mut found: Vec<&Transaction> = self
            .transactions
            .values()
            .filter(|t| t.member_id == member_id && t.is_open())
            .collect();
        Self::sort_recent_first(&mut found);
        found
    }

    /// The open transaction for a book, if any. The lending rules keep this
    /// to at most one.
    pub fn open_by_book(&self, isbn: &str) -> Option<&Transaction> {
        self.transactions
            .values()
            .find(|t| t.isbn == isbn && t.is_open())
    }

    /// All transactions overdue at `now`, soonest due first.
    pub fn overdue(&self, now: DateTime<Utc>) -> Vec<&Transaction> {
        let mut found: Vec<&Transaction> = self
            .transactions
            .values()
            .filter(|t| t.is_overdue(now))
            .collect();
        found.sort_by(|a, b| {
            a.due_at
                .cmp(&b.due_at)
                .then_with(|| a.transaction_id.cmp(&b.transaction_id))
        });
        found
    }

    /// The full history in insertion order.
    pub fn history(&self) -> Vec<&Transaction> {
        self.history
            .iter()
            .filter_map(|id| self.transactions.get(id))
            .collect()
    }

    /// The `limit` most recent transactions by borrow time.
    pub fn recent(&self, limit: usize) -> Vec<&Transaction> {
        let mut found: Vec<&Transaction> = self.transactions.values().collect();
        Self::sort_recent_first(&mut found);
        found.truncate(limit);
        found
    }

    /// Total number of transactions ever recorded.
    pub fn count(&self) -> usize {
        self.transactions.len()
    }

    /// Number of currently open transactions.
    pub fn open_count(&self) -> usize {
        self.transactions.values().filter(|t| t.is_open()).count()
    }

    /// Sum of late fees recorded across closed transactions.
    pub fn total_late_fees(&self) -> f64 {
        self.transactions
            .values()
            .filter(|t| !t.is_open())
            .map(Transaction::late_fee)
            .sum()
    }

    /// Iterate over all transactions in store order.
    pub fn iter(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions.values()
    }

    pub(crate) fn history_ids(&self) -> &[TransactionId] {
        &self.history
    }

    fn sort_recent_first(transactions: &mut [&Transaction]) {
        transactions.sort_by(|a, b| {
            b.borrowed_at
                .cmp(&a.borrowed_at)
                .then_with(|| b.transaction_id.cmp(&a.transaction_id))
        });
    }
}
