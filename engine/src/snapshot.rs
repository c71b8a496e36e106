//! Snapshot types for persisting and restoring the whole library state.
//!
//! A snapshot is the bridge between the in-memory stores and persistent
//! storage: the full contents of all three stores, exported on demand and
//! restored wholesale. Serialization order is deterministic.

use crate::{error::Result, Book, Error, Isbn, Member, MemberId, Transaction, TransactionId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Version of the snapshot format for future compatibility.
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

/// A point-in-time snapshot of the catalog, roster, and loan stores.
///
/// Uses BTreeMap instead of HashMap for deterministic serialization order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibrarySnapshot {
    /// Snapshot format version
    pub format_version: u32,
    /// All books keyed by ISBN
    pub books: BTreeMap<Isbn, Book>,
    /// All members keyed by identifier
    pub members: BTreeMap<MemberId, Member>,
    /// All transactions keyed by identifier
    pub transactions: BTreeMap<TransactionId, Transaction>,
    /// Transaction identifiers in original insertion order
    pub history: Vec<TransactionId>,
}

impl Default for LibrarySnapshot {
    fn default() -> Self {
        Self::new()
    }
}

impl LibrarySnapshot {
    /// Create a new empty snapshot.
    pub fn new() -> Self {
        Self {
            format_version: SNAPSHOT_FORMAT_VERSION,
            books: BTreeMap::new(),
            members: BTreeMap::new(),
            transactions: BTreeMap::new(),
            history: Vec::new(),
        }
    }

    /// Add a book to the snapshot.
    pub fn add_book(&mut self, book: Book) {
        self.books.insert(book.isbn.clone(), book);
    }

    /// Add a member to the snapshot.
    pub fn add_member(&mut self, member: Member) {
        self.members.insert(member.member_id.clone(), member);
    }

    /// Add a transaction to the snapshot, appending to the history order.
    pub fn add_transaction(&mut self, transaction: Transaction) {
        self.history.push(transaction.transaction_id.clone());
        self.transactions
            .insert(transaction.transaction_id.clone(), transaction);
    }

    /// Number of books captured.
    pub fn book_count(&self) -> usize {
        self.books.len()
    }

    /// Number of members captured.
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Number of transactions captured.
    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    /// Number of open loans captured.
    pub fn open_loan_count(&self) -> usize {
        self.transactions.values().filter(|t| t.is_open()).count()
    }

    /// Validate internal consistency before a restore.
    ///
    /// The history list must reference exactly the captured transactions,
    /// each exactly once.
    pub fn validate(&self) -> Result<()> {
        if self.format_version > SNAPSHOT_FORMAT_VERSION {
            return Err(Error::InvalidSnapshot(format!(
                "unsupported snapshot format version: {} (max supported: {})",
                self.format_version, SNAPSHOT_FORMAT_VERSION
            )));
        }

        if self.history.len() != self.transactions.len() {
            return Err(Error::InvalidSnapshot(format!(
                "history lists {} entries but {} transactions are captured",
                self.history.len(),
                self.transactions.len()
            )));
        }

        let mut seen = std::collections::BTreeSet::new();
        for id in &self.history {
            if !self.transactions.contains_key(id) {
                return Err(Error::InvalidSnapshot(format!(
                    "history references unknown transaction: {id}"
                )));
            }
            if !seen.insert(id) {
                return Err(Error::InvalidSnapshot(format!(
                    "history references transaction twice: {id}"
                )));
            }
        }

        Ok(())
    }

    /// Serialize to JSON with deterministic ordering.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::InvalidSnapshot(e.to_string()))
    }

    /// Serialize to pretty JSON with deterministic ordering.
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::InvalidSnapshot(e.to_string()))
    }

    /// Deserialize from JSON and validate.
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: Self =
            serde_json::from_str(json).map_err(|e| Error::InvalidSnapshot(e.to_string()))?;
        snapshot.validate()?;
        Ok(snapshot)
    }
}

/// Metadata about a snapshot (without the full data).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotMetadata {
    /// Snapshot format version
    pub format_version: u32,
    /// Total books captured
    pub book_count: usize,
    /// Total members captured
    pub member_count: usize,
    /// Total transactions captured
    pub transaction_count: usize,
    /// Open loans captured
    pub open_loan_count: usize,
}

impl From<&LibrarySnapshot> for SnapshotMetadata {
    fn from(snapshot: &LibrarySnapshot) -> Self {
        Self {
            format_version: snapshot.format_version,
            book_count: snapshot.book_count(),
            member_count: snapshot.member_count(),
            transaction_count: snapshot.transaction_count(),
            open_loan_count: snapshot.open_loan_count(),
        }
    }
}
