//! Student commands: add, edit, delete.
//!
//! # Invariants
//! - Edits merge only the descriptor fields that are present; the student id
//!   is always carried over unchanged.
//! - Delete cascades to the student's sessions and attendance records, and
//!   its reverse restores all of them with their original ids.

use crate::logic::command::{Command, CommandError, CommandOutcome, CommandResult, Focus};
use crate::logic::messages::format_person;
use crate::model::address_book::{AddressBook, EntityKind, RemovedPerson};
use crate::model::fields::{Address, Email, Memo, Name, Phone, Tag};
use crate::model::identity::Identity;
use crate::model::person::Person;
use log::{debug, info};
use std::collections::BTreeSet;

/// Fields to overwrite on an existing student. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditPersonDescriptor {
    pub name: Option<Name>,
    pub phone: Option<Phone>,
    pub email: Option<Email>,
    pub address: Option<Address>,
    pub tags: Option<BTreeSet<Tag>>,
    pub memo: Option<Memo>,
}

impl EditPersonDescriptor {
    /// Descriptor that would reset every field to `person`'s values.
    pub fn from_person(person: &Person) -> Self {
        Self {
            name: Some(person.name().clone()),
            phone: Some(person.phone().clone()),
            email: Some(person.email().clone()),
            address: Some(person.address().clone()),
            tags: Some(person.tags().clone()),
            memo: Some(person.memo().clone()),
        }
    }

    pub fn is_any_field_edited(&self) -> bool {
        self.name.is_some()
            || self.phone.is_some()
            || self.email.is_some()
            || self.address.is_some()
            || self.tags.is_some()
            || self.memo.is_some()
    }

    /// Builds the edited student; the id of `person` is kept.
    pub fn apply_to(&self, person: &Person) -> Person {
        Person::new(
            self.name.clone().unwrap_or_else(|| person.name().clone()),
            self.phone.clone().unwrap_or_else(|| person.phone().clone()),
            self.email.clone().unwrap_or_else(|| person.email().clone()),
            self.address
                .clone()
                .unwrap_or_else(|| person.address().clone()),
            self.tags.clone().unwrap_or_else(|| person.tags().clone()),
            self.memo.clone().unwrap_or_else(|| person.memo().clone()),
        )
        .with_id(person.id())
    }
}

/// Adds a new student.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddStudentCommand {
    person: Person,
}

impl AddStudentCommand {
    pub fn new(person: Person) -> Self {
        Self { person }
    }
}

impl Command for AddStudentCommand {
    fn execute(&self, book: &mut AddressBook) -> CommandResult<CommandOutcome> {
        if book.has_person(&self.person) {
            return Err(CommandError::DuplicateEntity(EntityKind::Student));
        }

        let id = book.add_person(self.person.clone())?;
        let added = book
            .person(id)
            .ok_or(CommandError::EntityNotFound(EntityKind::Student))?;
        debug!("event=command_execute module=logic command=student_add student_id={id}");

        Ok(
            CommandOutcome::builder(format!("New student added: {}", format_person(added)))
                .with_focus(Focus::Student(id))
                .with_reverse(DeleteStudentCommand::new(Identity::from(id)))
                .build(),
        )
    }
}

/// Edits an existing student identified by id or name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditStudentCommand {
    identity: Identity,
    descriptor: EditPersonDescriptor,
}

impl EditStudentCommand {
    /// # Errors
    /// - `NoFieldsEdited` when `descriptor` sets no field. Checked here so an
    ///   empty edit never reaches the address book.
    pub fn new(identity: Identity, descriptor: EditPersonDescriptor) -> CommandResult<Self> {
        if !descriptor.is_any_field_edited() {
            return Err(CommandError::NoFieldsEdited);
        }
        Ok(Self {
            identity,
            descriptor,
        })
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn descriptor(&self) -> &EditPersonDescriptor {
        &self.descriptor
    }
}

impl Command for EditStudentCommand {
    fn execute(&self, book: &mut AddressBook) -> CommandResult<CommandOutcome> {
        let original = book.person_by_identity(&self.identity)?.clone();
        let edited = self.descriptor.apply_to(&original);

        if !original.is_same_person(&edited) && book.has_person(&edited) {
            info!(
                "event=command_reject module=logic command=student_edit reason=duplicate student_id={}",
                original.id()
            );
            return Err(CommandError::DuplicateEntity(EntityKind::Student));
        }

        book.set_person(&original, edited.clone())
            .map_err(CommandError::Internal)?;
        debug!(
            "event=command_execute module=logic command=student_edit student_id={}",
            original.id()
        );

        let reverse = EditStudentCommand {
            identity: Identity::from(original.id()),
            descriptor: EditPersonDescriptor::from_person(&original),
        };
        Ok(
            CommandOutcome::builder(format!("Edited student: {}", format_person(&edited)))
                .with_focus(Focus::Student(edited.id()))
                .with_reverse(reverse)
                .build(),
        )
    }
}

/// Deletes a student together with their sessions and attendance records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteStudentCommand {
    identity: Identity,
}

impl DeleteStudentCommand {
    pub fn new(identity: Identity) -> Self {
        Self { identity }
    }
}

impl Command for DeleteStudentCommand {
    fn execute(&self, book: &mut AddressBook) -> CommandResult<CommandOutcome> {
        let id = book.person_by_identity(&self.identity)?.id();
        let removed = book.remove_person(id)?;
        debug!("event=command_execute module=logic command=student_delete student_id={id}");

        Ok(CommandOutcome::builder(format!(
            "Deleted student: {}",
            format_person(&removed.person)
        ))
        .with_reverse(RestoreStudentCommand { removed })
        .build())
    }
}

/// Reverse of `DeleteStudentCommand`: re-inserts the removed cascade.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RestoreStudentCommand {
    removed: RemovedPerson,
}

impl Command for RestoreStudentCommand {
    fn execute(&self, book: &mut AddressBook) -> CommandResult<CommandOutcome> {
        let person = self.removed.person.clone();
        book.restore_person(self.removed.clone())?;

        Ok(
            CommandOutcome::builder(format!("Restored student: {}", format_person(&person)))
                .with_focus(Focus::Student(person.id()))
                .with_reverse(DeleteStudentCommand::new(Identity::from(person.id())))
                .build(),
        )
    }
}
