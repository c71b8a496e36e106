//! Membership - the member store and its policy layer.
//!
//! The service owns the roster rules: unique email, the borrow limit, and
//! the active/inactive lifecycle. The borrowed-set mutators are crate-only
//! and driven by the lending engine.

use crate::{error::Result, id, Error, Member, MemberId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Most books a member may have out at once.
pub const DEFAULT_BORROW_LIMIT: usize = 5;

/// Keyed collection of members.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberStore {
    members: HashMap<MemberId, Member>,
}

impl MemberStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            members: HashMap::new(),
        }
    }

    /// Get a member by identifier.
    pub fn get(&self, member_id: &str) -> Option<&Member> {
        self.members.get(member_id)
    }

    pub(crate) fn get_mut(&mut self, member_id: &str) -> Option<&mut Member> {
        self.members.get_mut(member_id)
    }

    pub(crate) fn insert(&mut self, member: Member) {
        self.members.insert(member.member_id.clone(), member);
    }

    pub(crate) fn clear(&mut self) {
        self.members.clear();
    }

    /// Check whether a member identifier is registered.
    pub fn contains(&self, member_id: &str) -> bool {
        self.members.contains_key(member_id)
    }

    /// Iterate over all members in store order.
    pub fn iter(&self) -> impl Iterator<Item = &Member> {
        self.members.values()
    }

    /// Number of registered members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Check whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Roster operations and rules over the member store.
#[derive(Debug, Clone)]
pub struct MembershipService {
    store: MemberStore,
    borrow_limit: usize,
}

impl Default for MembershipService {
    fn default() -> Self {
        Self::new()
    }
}

impl MembershipService {
    /// Create a roster with the default borrow limit.
    pub fn new() -> Self {
        Self::with_borrow_limit(DEFAULT_BORROW_LIMIT)
    }

    /// Create a roster with a custom borrow limit.
    pub fn with_borrow_limit(borrow_limit: usize) -> Self {
        Self {
            store: MemberStore::new(),
            borrow_limit,
        }
    }

    /// The borrow limit in force.
    pub fn borrow_limit(&self) -> usize {
        self.borrow_limit
    }

    /// Register a new member. Email must be unique across the roster
    /// (compared case-insensitively). A fresh MEM- identifier is generated.
    /// Returns a snapshot of the new record.
    pub fn register_member(
        &mut self,
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        today: NaiveDate,
    ) -> Result<Member> {
        let email = email.into();
        if self.email_in_use(&email) {
            return Err(Error::EmailInUse(email));
        }

        let member_id = id::fresh_id(id::MEMBER_ID_PREFIX, id::MEMBER_SUFFIX_LEN, |candidate| {
            self.store.contains(candidate)
        });
        let member = Member::new(member_id, name, email, phone, today);
        self.store.insert(member.clone());

        Ok(member)
    }

    /// Look up a member by identifier.
    pub fn member(&self, member_id: &str) -> Result<&Member> {
        self.store
            .get(member_id)
            .ok_or_else(|| Error::MemberNotFound(member_id.to_owned()))
    }

    /// Look up a member by email, case-insensitive.
    pub fn member_by_email(&self, email: &str) -> Result<&Member> {
        self.store
            .iter()
            .find(|m| m.email.eq_ignore_ascii_case(email))
            .ok_or_else(|| Error::MemberEmailNotFound(email.to_owned()))
    }

    /// Check whether a member identifier is registered.
    pub fn exists(&self, member_id: &str) -> bool {
        self.store.contains(member_id)
    }

    /// Update contact details. Each field is optional; a changed email is
    /// re-checked for uniqueness. Returns a snapshot of the updated record.
    pub fn update_member(
        &mut self,
        member_id: &str,
        name: Option<&str>,
        email: Option<&str>,
        phone: Option<&str>,
    ) -> Result<Member> {
        let current = self.member(member_id)?;
        if let Some(email) = email {
            if !email.eq_ignore_ascii_case(&current.email) && self.email_in_use(email) {
                return Err(Error::EmailInUse(email.to_owned()));
            }
        }

        let member = self
            .store
            .get_mut(member_id)
            .ok_or_else(|| Error::MemberNotFound(member_id.to_owned()))?;
        if let Some(name) = name {
            member.name = name.to_owned();
        }
        if let Some(email) = email {
            member.email = email.to_owned();
        }
        if let Some(phone) = phone {
            member.phone = phone.to_owned();
        }

        Ok(member.clone())
    }

    /// Deactivate a member. Members holding borrowed books cannot be
    /// deactivated; neither can an already-inactive member.
    pub fn deactivate_member(&mut self, member_id: &str) -> Result<()> {
        let member = self.member(member_id)?;

        if member.borrowed_count() > 0 {
            return Err(Error::MemberHasOpenLoans {
                member_id: member_id.to_owned(),
                count: member.borrowed_count(),
            });
        }
        if !member.is_active() {
            return Err(Error::MemberAlreadyInactive(member_id.to_owned()));
        }

        self.store
            .get_mut(member_id)
            .ok_or_else(|| Error::MemberNotFound(member_id.to_owned()))?
            .set_active(false);
        Ok(())
    }

    /// Reactivate a member. Fails if already active.
    pub fn activate_member(&mut self, member_id: &str) -> Result<()> {
        let member = self.member(member_id)?;

        if member.is_active() {
            return Err(Error::MemberAlreadyActive(member_id.to_owned()));
        }

        self.store
            .get_mut(member_id)
            .ok_or_else(|| Error::MemberNotFound(member_id.to_owned()))?
            .set_active(true);
        Ok(())
    }

    /// Whether the member may initiate a new borrow: active and under the
    /// borrow limit.
    pub fn can_borrow(&self, member_id: &str) -> Result<bool> {
        let member = self.member(member_id)?;
        Ok(member.is_active() && member.borrowed_count() < self.borrow_limit)
    }

    /// Number of books the member currently has out.
    pub fn borrowed_count(&self, member_id: &str) -> Result<usize> {
        Ok(self.member(member_id)?.borrowed_count())
    }

    /// Members whose name contains the term, case-insensitive.
    /// An empty term matches nothing.
    pub fn members_by_name(&self, name: &str) -> Vec<&Member> {
        let term = name.trim().to_lowercase();
        if term.is_empty() {
            return Vec::new();
        }
        self.sorted(self.store.iter().filter(|m| m.name.to_lowercase().contains(&term)))
    }

    /// Every member, ordered by identifier.
    pub fn all_members(&self) -> Vec<&Member> {
        self.sorted(self.store.iter())
    }

    /// Active members only.
    pub fn active_members(&self) -> Vec<&Member> {
        self.sorted(self.store.iter().filter(|m| m.is_active()))
    }

    /// Members currently holding at least one book.
    pub fn members_with_loans(&self) -> Vec<&Member> {
        self.sorted(self.store.iter().filter(|m| m.borrowed_count() > 0))
    }

    /// Total number of members.
    pub fn member_count(&self) -> usize {
        self.store.len()
    }

    /// Number of active members.
    pub fn active_member_count(&self) -> usize {
        self.store.iter().filter(|m| m.is_active()).count()
    }

    pub(crate) fn record_borrow(&mut self, member_id: &str, isbn: &str) -> Result<()> {
        let member = self
            .store
            .get_mut(member_id)
            .ok_or_else(|| Error::MemberNotFound(member_id.to_owned()))?;
        member.record_borrow(isbn);
        Ok(())
    }

    pub(crate) fn record_return(&mut self, member_id: &str, isbn: &str) -> Result<()> {
        let member = self
            .store
            .get_mut(member_id)
            .ok_or_else(|| Error::MemberNotFound(member_id.to_owned()))?;
        member.record_return(isbn);
        Ok(())
    }

    pub(crate) fn store(&self) -> &MemberStore {
        &self.store
    }

    pub(crate) fn restore(&mut self, member: Member) {
        self.store.insert(member);
    }

    pub(crate) fn clear(&mut self) {
        self.store.clear();
    }

    fn email_in_use(&self, email: &str) -> bool {
        self.store.iter().any(|m| m.email.eq_ignore_ascii_case(email))
    }

    fn sorted<'a>(&self, members: impl Iterator<Item = &'a Member>) -> Vec<&'a Member> {
        let mut members: Vec<&Member> = members.collect();
        members.sort_by(|a, b| a.member_id.cmp(&b.member_id));
        members
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    fn roster_with_alice() -> (MembershipService, MemberId) {
        let mut roster = MembershipService::new();
        let id = roster
            .register_member("Alice Nguyen", "alice@example.com", "0123456789", today())
            .unwrap()
            .member_id;
        (roster, id)
    }

    #[test]
    fn register_member() {
        let (roster, id) = roster_with_alice();

        let member = roster.member(&id).unwrap();
        assert!(member.member_id.starts_with("MEM-"));
        assert_eq!(member.name, "Alice Nguyen");
        assert!(member.is_active());
        assert_eq!(member.borrowed_count(), 0);
        assert_eq!(roster.member_count(), 1);
    }

    #[test]
    fn duplicate_email_rejected() {
        let (mut roster, _) = roster_with_alice();

        let result = roster.register_member("Other", "ALICE@example.com", "099", today());
        assert!(matches!(result, Err(Error::EmailInUse(_))));
        assert_eq!(roster.member_count(), 1);
    }

    #[test]
    fn find_by_email_is_case_insensitive() {
        let (roster, id) = roster_with_alice();

        let member = roster.member_by_email("Alice@Example.COM").unwrap();
        assert_eq!(member.member_id, id);

        let result = roster.member_by_email("nobody@example.com");
        assert!(matches!(result, Err(Error::MemberEmailNotFound(_))));
    }

    #[test]
    fn find_missing_member() {
        let (roster, _) = roster_with_alice();

        let result = roster.member("MEM-MISSING");
        assert!(matches!(result, Err(Error::MemberNotFound(_))));
    }

    #[test]
    fn update_member_fields() {
        let (mut roster, id) = roster_with_alice();

        let member = roster
            .update_member(&id, Some("Alice N."), None, Some("0987654321"))
            .unwrap();
        assert_eq!(member.name, "Alice N.");
        assert_eq!(member.email, "alice@example.com");
        assert_eq!(member.phone, "0987654321");
    }

    #[test]
    fn update_to_taken_email_rejected() {
        let (mut roster, id) = roster_with_alice();
        roster
            .register_member("Bob", "bob@example.com", "0123", today())
            .unwrap();

        let result = roster.update_member(&id, None, Some("bob@example.com"), None);
        assert!(matches!(result, Err(Error::EmailInUse(_))));

        // Re-submitting the member's own email is fine
        let member = roster
            .update_member(&id, None, Some("alice@example.com"), None)
            .unwrap();
        assert_eq!(member.email, "alice@example.com");
    }

    #[test]
    fn deactivate_and_activate() {
        let (mut roster, id) = roster_with_alice();

        roster.deactivate_member(&id).unwrap();
        assert!(!roster.member(&id).unwrap().is_active());

        let result = roster.deactivate_member(&id);
        assert!(matches!(result, Err(Error::MemberAlreadyInactive(_))));

        roster.activate_member(&id).unwrap();
        assert!(roster.member(&id).unwrap().is_active());

        let result = roster.activate_member(&id);
        assert!(matches!(result, Err(Error::MemberAlreadyActive(_))));
    }

    #[test]
    fn deactivate_with_open_loans_rejected() {
        let (mut roster, id) = roster_with_alice();
        roster.record_borrow(&id, "978-0123456789").unwrap();

        let result = roster.deactivate_member(&id);
        assert!(matches!(result, Err(Error::MemberHasOpenLoans { .. })));

        roster.record_return(&id, "978-0123456789").unwrap();
        roster.deactivate_member(&id).unwrap();
    }

    #[test]
    fn can_borrow_policy() {
        let (mut roster, id) = roster_with_alice();
        assert!(roster.can_borrow(&id).unwrap());

        for i in 0..DEFAULT_BORROW_LIMIT {
            roster.record_borrow(&id, &format!("978-{i:010}")).unwrap();
        }
        assert!(!roster.can_borrow(&id).unwrap());
        assert_eq!(roster.borrowed_count(&id).unwrap(), DEFAULT_BORROW_LIMIT);

        assert!(matches!(
            roster.can_borrow("MEM-MISSING"),
            Err(Error::MemberNotFound(_))
        ));
    }

    #[test]
    fn inactive_member_cannot_borrow() {
        let (mut roster, id) = roster_with_alice();
        roster.deactivate_member(&id).unwrap();

        assert!(!roster.can_borrow(&id).unwrap());
    }

    #[test]
    fn name_search_and_filters() {
        let (mut roster, id) = roster_with_alice();
        let bob = roster
            .register_member("Bob Tran", "bob@example.com", "0456", today())
            .unwrap()
            .member_id;
        roster.deactivate_member(&bob).unwrap();
        roster.record_borrow(&id, "978-0123456789").unwrap();

        assert_eq!(roster.members_by_name("alice").len(), 1);
        assert_eq!(roster.members_by_name("tran").len(), 1);
        assert!(roster.members_by_name("").is_empty());

        assert_eq!(roster.all_members().len(), 2);
        assert_eq!(roster.active_members().len(), 1);
        assert_eq!(roster.members_with_loans().len(), 1);
        assert_eq!(roster.member_count(), 2);
        assert_eq!(roster.active_member_count(), 1);
    }

    #[test]
    fn custom_borrow_limit() {
        let mut roster = MembershipService::with_borrow_limit(1);
        let id = roster
            .register_member("Alice", "alice@example.com", "0123", today())
            .unwrap()
            .member_id;

        assert_eq!(roster.borrow_limit(), 1);
        roster.record_borrow(&id, "978-0123456789").unwrap();
        assert!(!roster.can_borrow(&id).unwrap());
    }
}
