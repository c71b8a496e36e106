//! Member entity for the roster.

use crate::{Isbn, MemberId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A registered library member.
///
/// The borrowed set holds the ISBNs the member currently has out, not a
/// history; it must always equal the set of ISBNs in the member's open
/// transactions. Mutation of the set and of the active flag goes through the
/// membership service and the lending path, never through the entity
/// directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    /// System-generated identifier
    pub member_id: MemberId,
    /// Full name
    pub name: String,
    /// Contact email, unique across members
    pub email: String,
    /// Contact phone
    pub phone: String,
    /// Date of registration
    pub registered_on: NaiveDate,
    /// ISBNs currently on loan to this member.
    /// BTreeSet keeps snapshot serialization deterministic.
    borrowed: BTreeSet<Isbn>,
    /// Whether the member may initiate new borrows
    active: bool,
}

impl Member {
    /// Register a new member. Members start active with nothing borrowed.
    pub fn new(
        member_id: impl Into<MemberId>,
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        registered_on: NaiveDate,
    ) -> Self {
        Self {
            member_id: member_id.into(),
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            registered_on,
            borrowed: BTreeSet::new(),
            active: true,
        }
    }

    /// Whether the member may initiate new borrows.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Immutable view of the ISBNs currently on loan.
    pub fn borrowed_books(&self) -> &BTreeSet<Isbn> {
        &self.borrowed
    }

    /// Number of books currently on loan.
    pub fn borrowed_count(&self) -> usize {
        self.borrowed.len()
    }

    /// Whether this member currently has the given book out.
    pub fn has_borrowed(&self, isbn: &str) -> bool {
        self.borrowed.contains(isbn)
    }

    pub(crate) fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub(crate) fn record_borrow(&mut self, isbn: impl Into<Isbn>) {
        self.borrowed.insert(isbn.into());
    }

    pub(crate) fn record_return(&mut self, isbn: &str) -> bool {
        self.borrowed.remove(isbn)
    }
}
