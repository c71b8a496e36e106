//! # Biblio Engine
//!
//! An in-memory catalog, membership, and lending engine for a small
//! library system.
//!
//! This crate provides the core domain logic: book and member records, the
//! lending transaction ledger, and the rules that keep the three mutually
//! consistent across borrow and return, including due dates and late fees.
//!
//! ## Design Principles
//!
//! - **No IO**: the engine has no knowledge of files, terminals, or clocks;
//!   every time-dependent operation takes the evaluation instant as a
//!   parameter
//! - **Validate, then write**: every mutating operation checks all of its
//!   preconditions before touching any store, so failures never leave
//!   partial state behind
//! - **One writer for multi-store moves**: individual services mutate only
//!   their own store; the [`LendingEngine`] is the single place where a
//!   borrow or return updates the catalog, the member roster, and the loan
//!   ledger together
//!
//! ## Core Concepts
//!
//! ### Entities
//!
//! - [`Book`] - a catalogued title, keyed by ISBN, either available or
//!   borrowed
//! - [`Member`] - a registered borrower with a bounded set of books out
//! - [`Transaction`] - one loan: borrow time, due time, and, once returned,
//!   the return time and the late fee fixed at that instant
//!
//! ### Services
//!
//! [`CatalogService`] and [`MembershipService`] enforce the single-store
//! rules (unique ISBN, unique email, no removal while borrowed, the borrow
//! limit, the active/inactive lifecycle). The [`LendingEngine`] owns both
//! plus the [`LoanStore`] and performs borrow/return as one consistent
//! operation.
//!
//! ## Quick Start
//!
//! ```rust
//! use biblio_engine::{CatalogService, LendingEngine, LoanStore, MembershipService};
//! use chrono::Utc;
//!
//! let mut engine = LendingEngine::new(
//!     CatalogService::new(),
//!     MembershipService::new(),
//!     LoanStore::new(),
//! );
//!
//! let now = Utc::now();
//! engine
//!     .catalog_mut()
//!     .add_book("978-0441172719", "Dune", "Frank Herbert", 1965, now.date_naive())
//!     .unwrap();
//! let member_id = engine
//!     .membership_mut()
//!     .register_member("Alice Nguyen", "alice@example.com", "0123456789", now.date_naive())
//!     .unwrap()
//!     .member_id;
//!
//! let loan = engine.borrow(&member_id, "978-0441172719", now).unwrap();
//! assert!(loan.is_open());
//!
//! let closed = engine.return_book(&member_id, "978-0441172719", now).unwrap();
//! assert_eq!(closed.late_fee(), 0.0);
//! ```
//!
//! ## Persistence
//!
//! Use [`LendingEngine::export_snapshot`] and
//! [`LendingEngine::import_snapshot`] with [`LibrarySnapshot`] for
//! persistence. Snapshots are serializable to JSON with deterministic
//! ordering; restore replaces all store contents wholesale.

pub mod book;
pub mod catalog;
pub mod engine;
pub mod error;
pub mod id;
pub mod loans;
pub mod member;
pub mod membership;
pub mod snapshot;
pub mod transaction;

// Re-export main types at crate root
pub use book::{Book, BookStatus};
pub use catalog::{BookStore, CatalogService};
pub use engine::{LendingEngine, LibraryStatistics};
pub use error::{Error, ErrorKind};
pub use loans::LoanStore;
pub use member::Member;
pub use membership::{MemberStore, MembershipService, DEFAULT_BORROW_LIMIT};
pub use snapshot::{LibrarySnapshot, SnapshotMetadata, SNAPSHOT_FORMAT_VERSION};
pub use transaction::{Transaction, TransactionKind, LATE_FEE_PER_DAY, LOAN_PERIOD_DAYS};

/// Type aliases for clarity
pub type Isbn = String;
pub type MemberId = String;
pub type TransactionId = String;
