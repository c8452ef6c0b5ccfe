//! Student record.
//!
//! # Invariants
//! - `id` is assigned once by the address book and survives every edit.
//! - Two students are the same logical person when their names are equal.

use crate::model::fields::{Address, Email, Memo, Name, Phone, Tag};
use crate::model::ids::PersonId;
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// A student known to the tutor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    id: PersonId,
    name: Name,
    phone: Phone,
    email: Email,
    address: Address,
    tags: BTreeSet<Tag>,
    memo: Memo,
}

impl Person {
    /// Creates a student without an id; `AddressBook::add_person` assigns one.
    pub fn new(
        name: Name,
        phone: Phone,
        email: Email,
        address: Address,
        tags: BTreeSet<Tag>,
        memo: Memo,
    ) -> Self {
        Self {
            id: PersonId::UNASSIGNED,
            name,
            phone,
            email,
            address,
            tags,
            memo,
        }
    }

    /// Creates a student with only a name; contact fields start empty.
    pub fn named(name: Name) -> Self {
        Self::new(
            name,
            Phone::empty(),
            Email::empty(),
            Address::empty(),
            BTreeSet::new(),
            Memo::empty(),
        )
    }

    /// Returns the same student carrying `id`.
    ///
    /// Used by storage loading and by edits, which must keep the original id.
    pub fn with_id(mut self, id: PersonId) -> Self {
        self.id = id;
        self
    }

    pub fn id(&self) -> PersonId {
        self.id
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn phone(&self) -> &Phone {
        &self.phone
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn tags(&self) -> &BTreeSet<Tag> {
        &self.tags
    }

    pub fn memo(&self) -> &Memo {
        &self.memo
    }

    /// Uniqueness relation: equal names denote the same student.
    pub fn is_same_person(&self, other: &Person) -> bool {
        self.name == other.name
    }

    /// List order: ascending id.
    pub fn compare_by_id(&self, other: &Person) -> Ordering {
        self.id.cmp(&other.id)
    }
}
