//! Error types for the Biblio engine.

use crate::{Isbn, MemberId, TransactionId};
use thiserror::Error;

/// Broad classification of an engine failure.
///
/// Every failure is either a missing entity or a business rule rejecting the
/// operation. Both are terminal for the attempted operation and leave the
/// stores untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A referenced book, member, or transaction does not exist.
    NotFound,
    /// A lifecycle or policy rule rejected the operation.
    InvalidOperation,
}

/// All possible errors from the Biblio engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    // Missing entities
    #[error("book not found: {0}")]
    BookNotFound(Isbn),

    #[error("member not found: {0}")]
    MemberNotFound(MemberId),

    #[error("no member registered with email: {0}")]
    MemberEmailNotFound(String),

    #[error("transaction not found: {0}")]
    TransactionNotFound(TransactionId),

    // Catalog rules
    #[error("book already registered: {0}")]
    BookAlreadyExists(Isbn),

    #[error("cannot remove a borrowed book: {0}")]
    BookCheckedOut(Isbn),

    // Membership rules
    #[error("email already in use: {0}")]
    EmailInUse(String),

    #[error("member inactive: {0}")]
    MemberInactive(MemberId),

    #[error("member already active: {0}")]
    MemberAlreadyActive(MemberId),

    #[error("member already inactive: {0}")]
    MemberAlreadyInactive(MemberId),

    #[error("member {member_id} still has {count} borrowed books")]
    MemberHasOpenLoans { member_id: MemberId, count: usize },

    // Lending rules
    #[error("borrow limit exceeded: member {member_id} may hold at most {limit} books")]
    BorrowLimitExceeded { member_id: MemberId, limit: usize },

    #[error("book already borrowed: {0}")]
    BookAlreadyBorrowed(Isbn),

    #[error("book not currently borrowed: {0}")]
    BookNotBorrowed(Isbn),

    #[error("member {member_id} has not borrowed this book: {isbn}")]
    NotBorrowedByMember { member_id: MemberId, isbn: Isbn },

    #[error("book borrowed by a different member: {0}")]
    BorrowedByOtherMember(Isbn),

    // State errors
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),
}

impl Error {
    /// Classify this error into one of the two failure kinds.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::BookNotFound(_)
            | Error::MemberNotFound(_)
            | Error::MemberEmailNotFound(_)
            | Error::TransactionNotFound(_) => ErrorKind::NotFound,
            _ => ErrorKind::InvalidOperation,
        }
    }
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;
