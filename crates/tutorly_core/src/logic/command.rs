//! Command contract, outcome envelope and command errors.

use crate::logic::messages::{
    MESSAGE_ATTENDANCE_NOT_FOUND, MESSAGE_DUPLICATE_ATTENDANCE, MESSAGE_DUPLICATE_PERSON,
    MESSAGE_DUPLICATE_SESSION, MESSAGE_NOTHING_TO_UNDO, MESSAGE_NOT_EDITED,
    MESSAGE_PERSON_NOT_FOUND, MESSAGE_SESSION_NOT_FOUND,
};
use crate::model::address_book::{AddressBook, BookError, EntityKind};
use crate::model::fields::FieldError;
use crate::model::ids::{PersonId, SessionId};
use crate::uniquelist::UniqueListError;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};

pub type CommandResult<T> = Result<T, CommandError>;

/// An executable, user-facing operation on the address book.
///
/// # Contract
/// - All validation happens before the first mutation; a rejected command
///   leaves the book unchanged.
/// - A successful execution may return a reverse command that undoes it.
pub trait Command: Debug {
    fn execute(&self, book: &mut AddressBook) -> CommandResult<CommandOutcome>;
}

/// UI navigation hint attached to a command outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Student(PersonId),
    Session(SessionId),
}

/// Result of a successful command execution.
#[derive(Debug)]
pub struct CommandOutcome {
    feedback: String,
    focus: Option<Focus>,
    reverse: Option<Box<dyn Command>>,
}

impl CommandOutcome {
    pub fn builder(feedback: impl Into<String>) -> CommandOutcomeBuilder {
        CommandOutcomeBuilder {
            outcome: CommandOutcome {
                feedback: feedback.into(),
                focus: None,
                reverse: None,
            },
        }
    }

    /// Message shown to the user.
    pub fn feedback(&self) -> &str {
        &self.feedback
    }

    pub fn focus(&self) -> Option<Focus> {
        self.focus
    }

    /// Command that undoes this outcome, if the command is reversible.
    pub fn reverse(&self) -> Option<&dyn Command> {
        self.reverse.as_deref()
    }

    /// Moves the reverse command out, e.g. onto an undo stack.
    pub fn take_reverse(&mut self) -> Option<Box<dyn Command>> {
        self.reverse.take()
    }
}

pub struct CommandOutcomeBuilder {
    outcome: CommandOutcome,
}

impl CommandOutcomeBuilder {
    pub fn with_focus(mut self, focus: Focus) -> Self {
        self.outcome.focus = Some(focus);
        self
    }

    pub fn with_reverse(mut self, reverse: impl Command + 'static) -> Self {
        self.outcome.reverse = Some(Box::new(reverse));
        self
    }

    pub fn build(self) -> CommandOutcome {
        self.outcome
    }
}

/// Command rejection, rendered as a user-facing message by `Display`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Referenced entity does not exist.
    EntityNotFound(EntityKind),
    /// A student name matched more than one student.
    AmbiguousIdentity { reference: String, matches: usize },
    /// Edit descriptor carries no field.
    NoFieldsEdited,
    /// Result would duplicate an existing entity.
    DuplicateEntity(EntityKind),
    /// Attendance is already in the requested state.
    AttendanceUnchanged { present: bool },
    NothingToUndo,
    Field(FieldError),
    /// Repository rejected a change that passed validation.
    Internal(BookError),
}

impl Display for CommandError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EntityNotFound(kind) => f.write_str(match kind {
                EntityKind::Student => MESSAGE_PERSON_NOT_FOUND,
                EntityKind::Session => MESSAGE_SESSION_NOT_FOUND,
                EntityKind::AttendanceRecord => MESSAGE_ATTENDANCE_NOT_FOUND,
            }),
            Self::AmbiguousIdentity { reference, matches } => write!(
                f,
                "{matches} students are named `{reference}`; use the student ID instead."
            ),
            Self::NoFieldsEdited => f.write_str(MESSAGE_NOT_EDITED),
            Self::DuplicateEntity(kind) => f.write_str(match kind {
                EntityKind::Student => MESSAGE_DUPLICATE_PERSON,
                EntityKind::Session => MESSAGE_DUPLICATE_SESSION,
                EntityKind::AttendanceRecord => MESSAGE_DUPLICATE_ATTENDANCE,
            }),
            Self::AttendanceUnchanged { present: true } => {
                f.write_str("The student is already marked as present.")
            }
            Self::AttendanceUnchanged { present: false } => {
                f.write_str("The student is already marked as absent.")
            }
            Self::NothingToUndo => f.write_str(MESSAGE_NOTHING_TO_UNDO),
            Self::Field(err) => write!(f, "{err}"),
            Self::Internal(err) => write!(f, "internal error: {err}"),
        }
    }
}

impl Error for CommandError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Field(err) => Some(err),
            Self::Internal(err) => Some(err),
            _ => None,
        }
    }
}

impl From<FieldError> for CommandError {
    fn from(value: FieldError) -> Self {
        Self::Field(value)
    }
}

impl From<BookError> for CommandError {
    fn from(value: BookError) -> Self {
        match value {
            BookError::EntityNotFound { kind, .. } | BookError::MissingReference { kind, .. } => {
                Self::EntityNotFound(kind)
            }
            BookError::AmbiguousIdentity { reference, matches } => {
                Self::AmbiguousIdentity { reference, matches }
            }
            BookError::List {
                kind,
                error: UniqueListError::DuplicateElement,
            } => Self::DuplicateEntity(kind),
            other => Self::Internal(other),
        }
    }
}
