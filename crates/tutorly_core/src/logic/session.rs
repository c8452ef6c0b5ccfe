//! Session commands: add, edit, delete.

use crate::logic::command::{Command, CommandError, CommandOutcome, CommandResult, Focus};
use crate::logic::messages::format_session;
use crate::model::address_book::{AddressBook, EntityKind, RemovedSession};
use crate::model::fields::Subject;
use crate::model::ids::SessionId;
use crate::model::session::Session;
use chrono::NaiveDate;
use log::debug;

/// Fields to overwrite on an existing session. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditSessionDescriptor {
    pub date: Option<NaiveDate>,
    pub subject: Option<Subject>,
}

impl EditSessionDescriptor {
    pub fn from_session(session: &Session) -> Self {
        Self {
            date: Some(session.date()),
            subject: Some(session.subject().clone()),
        }
    }

    pub fn is_any_field_edited(&self) -> bool {
        self.date.is_some() || self.subject.is_some()
    }

    /// Builds the edited session; id and booked student are kept.
    pub fn apply_to(&self, session: &Session) -> Session {
        let edited = Session::new(
            self.date.unwrap_or_else(|| session.date()),
            self.subject
                .clone()
                .unwrap_or_else(|| session.subject().clone()),
        )
        .with_id(session.id());

        match session.student_id() {
            Some(student_id) => edited.for_student(student_id),
            None => edited,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddSessionCommand {
    session: Session,
}

impl AddSessionCommand {
    pub fn new(session: Session) -> Self {
        Self { session }
    }
}

impl Command for AddSessionCommand {
    fn execute(&self, book: &mut AddressBook) -> CommandResult<CommandOutcome> {
        if book.has_session(&self.session) {
            return Err(CommandError::DuplicateEntity(EntityKind::Session));
        }

        let id = book.add_session(self.session.clone())?;
        let added = book.session_by_id(id)?;
        debug!("event=command_execute module=logic command=session_add session_id={id}");

        Ok(
            CommandOutcome::builder(format!("New session added: {}", format_session(added)))
                .with_focus(Focus::Session(id))
                .with_reverse(DeleteSessionCommand::new(id))
                .build(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSessionCommand {
    id: SessionId,
    descriptor: EditSessionDescriptor,
}

impl EditSessionCommand {
    /// # Errors
    /// - `NoFieldsEdited` when `descriptor` sets no field.
    pub fn new(id: SessionId, descriptor: EditSessionDescriptor) -> CommandResult<Self> {
        if !descriptor.is_any_field_edited() {
            return Err(CommandError::NoFieldsEdited);
        }
        Ok(Self { id, descriptor })
    }
}

impl Command for EditSessionCommand {
    fn execute(&self, book: &mut AddressBook) -> CommandResult<CommandOutcome> {
        let original = book.session_by_id(self.id)?.clone();
        let edited = self.descriptor.apply_to(&original);

        if !original.is_same_session(&edited) && book.has_session(&edited) {
            return Err(CommandError::DuplicateEntity(EntityKind::Session));
        }

        book.set_session(&original, edited.clone())
            .map_err(CommandError::Internal)?;
        debug!(
            "event=command_execute module=logic command=session_edit session_id={}",
            self.id
        );

        let reverse = EditSessionCommand {
            id: original.id(),
            descriptor: EditSessionDescriptor::from_session(&original),
        };
        Ok(
            CommandOutcome::builder(format!("Edited session: {}", format_session(&edited)))
                .with_focus(Focus::Session(edited.id()))
                .with_reverse(reverse)
                .build(),
        )
    }
}

/// Deletes a session and its attendance records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteSessionCommand {
    id: SessionId,
}

impl DeleteSessionCommand {
    pub fn new(id: SessionId) -> Self {
        Self { id }
    }
}

impl Command for DeleteSessionCommand {
    fn execute(&self, book: &mut AddressBook) -> CommandResult<CommandOutcome> {
        let removed = book.remove_session(self.id)?;
        debug!(
            "event=command_execute module=logic command=session_delete session_id={}",
            self.id
        );

        Ok(CommandOutcome::builder(format!(
            "Deleted session: {}",
            format_session(&removed.session)
        ))
        .with_reverse(RestoreSessionCommand { removed })
        .build())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct RestoreSessionCommand {
    removed: RemovedSession,
}

impl Command for RestoreSessionCommand {
    fn execute(&self, book: &mut AddressBook) -> CommandResult<CommandOutcome> {
        let session = self.removed.session.clone();
        book.restore_session(self.removed.clone())?;

        Ok(
            CommandOutcome::builder(format!("Restored session: {}", format_session(&session)))
                .with_focus(Focus::Session(session.id()))
                .with_reverse(DeleteSessionCommand::new(session.id()))
                .build(),
        )
    }
}
