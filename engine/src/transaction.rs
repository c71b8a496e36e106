//! Transaction entity and late-fee math.

use crate::{Isbn, MemberId, TransactionId};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Length of a loan. The due timestamp is always borrow + this many days.
pub const LOAN_PERIOD_DAYS: i64 = 14;

/// Fee accrued per whole day a return is late.
pub const LATE_FEE_PER_DAY: f64 = 1.0;

/// Phase of a transaction: created as Borrow, flipped to Return on close.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Borrow,
    Return,
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionKind::Borrow => write!(f, "borrow"),
            TransactionKind::Return => write!(f, "return"),
        }
    }
}

/// A single lending transaction.
///
/// A transaction is open while `returned_at` is absent. At most one open
/// transaction exists per ISBN at any time. Once closed, the record is
/// immutable; the late fee is fixed at the return instant and never
/// recomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// System-generated identifier
    pub transaction_id: TransactionId,
    /// Borrowing member
    pub member_id: MemberId,
    /// Borrowed book
    pub isbn: Isbn,
    /// When the loan started
    pub borrowed_at: DateTime<Utc>,
    /// When the loan is due back
    pub due_at: DateTime<Utc>,
    /// When the book came back; absent while the loan is open
    returned_at: Option<DateTime<Utc>>,
    /// Current phase
    kind: TransactionKind,
    /// Fee recorded at close; 0.0 while open
    late_fee: f64,
}

impl Transaction {
    /// Open a new loan starting at `now`, due after the loan period.
    pub fn open(
        transaction_id: impl Into<TransactionId>,
        member_id: impl Into<MemberId>,
        isbn: impl Into<Isbn>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            transaction_id: transaction_id.into(),
            member_id: member_id.into(),
            isbn: isbn.into(),
            borrowed_at: now,
            due_at: now + Duration::days(LOAN_PERIOD_DAYS),
            returned_at: None,
            kind: TransactionKind::Borrow,
            late_fee: 0.0,
        }
    }

    /// When the book came back, if it has.
    pub fn returned_at(&self) -> Option<DateTime<Utc>> {
        self.returned_at
    }

    /// Current phase of the transaction.
    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    /// Fee recorded at close; 0.0 while the loan is open.
    pub fn late_fee(&self) -> f64 {
        self.late_fee
    }

    /// Whether the loan is still open.
    pub fn is_open(&self) -> bool {
        self.returned_at.is_none()
    }

    /// A loan is overdue while it is open and `now` is past the due time.
    /// Closed transactions are never overdue, however late they came back.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.is_open() && now > self.due_at
    }

    /// Whole days past due at `now`; 0 when not overdue.
    pub fn days_overdue(&self, now: DateTime<Utc>) -> i64 {
        if !self.is_overdue(now) {
            return 0;
        }
        (now - self.due_at).num_days()
    }

    /// Fee at the evaluation instant: the recorded fee for a closed loan,
    /// a live projection for an open one.
    pub fn late_fee_at(&self, now: DateTime<Utc>) -> f64 {
        if self.returned_at.is_some() {
            self.late_fee
        } else {
            self.days_overdue(now) as f64 * LATE_FEE_PER_DAY
        }
    }

    /// Close the loan at `now`, fixing the fee from the actual return
    /// instant. Must only be called on an open transaction.
    pub(crate) fn complete_return(&mut self, now: DateTime<Utc>) {
        debug_assert!(self.is_open());
        let overdue_days = (now - self.due_at).num_days().max(0);
        self.late_fee = overdue_days as f64 * LATE_FEE_PER_DAY;
        self.returned_at = Some(now);
        self.kind = TransactionKind::Return;
    }
}
