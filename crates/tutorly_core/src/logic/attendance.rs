//! Attendance commands: enrol, unenrol, mark presence.

use crate::logic::command::{Command, CommandError, CommandOutcome, CommandResult, Focus};
use crate::logic::messages::format_attendance;
use crate::model::address_book::{AddressBook, EntityKind};
use crate::model::attendance::AttendanceRecord;
use crate::model::identity::Identity;
use crate::model::ids::SessionId;
use crate::model::person::Person;
use log::debug;

/// Resolves the session and student an attendance command refers to.
fn resolve<'a>(
    book: &'a AddressBook,
    session_id: SessionId,
    identity: &Identity,
) -> CommandResult<&'a Person> {
    book.session_by_id(session_id)?;
    Ok(book.person_by_identity(identity)?)
}

/// Enrols a student in a session, initially marked absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrolStudentCommand {
    session_id: SessionId,
    identity: Identity,
}

impl EnrolStudentCommand {
    pub fn new(session_id: SessionId, identity: Identity) -> Self {
        Self {
            session_id,
            identity,
        }
    }
}

impl Command for EnrolStudentCommand {
    fn execute(&self, book: &mut AddressBook) -> CommandResult<CommandOutcome> {
        let person = resolve(book, self.session_id, &self.identity)?.clone();
        let record = AttendanceRecord::new(self.session_id, person.id(), false);
        book.add_attendance_record(record)?;
        debug!(
            "event=command_execute module=logic command=attendance_enrol session_id={} student_id={}",
            self.session_id,
            person.id()
        );

        Ok(CommandOutcome::builder(format!(
            "Enrolled student: {}",
            format_attendance(&record, &person)
        ))
        .with_focus(Focus::Session(self.session_id))
        .with_reverse(UnenrolStudentCommand::new(
            self.session_id,
            Identity::from(person.id()),
        ))
        .build())
    }
}

/// Removes a student's attendance record from a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnenrolStudentCommand {
    session_id: SessionId,
    identity: Identity,
}

impl UnenrolStudentCommand {
    pub fn new(session_id: SessionId, identity: Identity) -> Self {
        Self {
            session_id,
            identity,
        }
    }
}

impl Command for UnenrolStudentCommand {
    fn execute(&self, book: &mut AddressBook) -> CommandResult<CommandOutcome> {
        let person = resolve(book, self.session_id, &self.identity)?.clone();
        let record = *book
            .attendance_record(self.session_id, person.id())
            .ok_or(CommandError::EntityNotFound(EntityKind::AttendanceRecord))?;
        book.remove_attendance_record(&record)
            .map_err(CommandError::Internal)?;
        debug!(
            "event=command_execute module=logic command=attendance_unenrol session_id={} student_id={}",
            self.session_id,
            person.id()
        );

        Ok(CommandOutcome::builder(format!(
            "Unenrolled student: {}",
            format_attendance(&record, &person)
        ))
        .with_focus(Focus::Session(self.session_id))
        .with_reverse(ReinstateAttendanceCommand { record })
        .build())
    }
}

/// Marks a student present or absent for a session they are enrolled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkAttendanceCommand {
    session_id: SessionId,
    identity: Identity,
    present: bool,
}

impl MarkAttendanceCommand {
    pub fn new(session_id: SessionId, identity: Identity, present: bool) -> Self {
        Self {
            session_id,
            identity,
            present,
        }
    }
}

impl Command for MarkAttendanceCommand {
    fn execute(&self, book: &mut AddressBook) -> CommandResult<CommandOutcome> {
        let person = resolve(book, self.session_id, &self.identity)?.clone();
        let record = *book
            .attendance_record(self.session_id, person.id())
            .ok_or(CommandError::EntityNotFound(EntityKind::AttendanceRecord))?;
        if record.is_present() == self.present {
            return Err(CommandError::AttendanceUnchanged {
                present: self.present,
            });
        }

        let marked = record.with_presence(self.present);
        book.set_attendance_record(&record, marked)
            .map_err(CommandError::Internal)?;

        Ok(CommandOutcome::builder(format!(
            "Marked attendance: {}",
            format_attendance(&marked, &person)
        ))
        .with_focus(Focus::Session(self.session_id))
        .with_reverse(MarkAttendanceCommand::new(
            self.session_id,
            Identity::from(person.id()),
            record.is_present(),
        ))
        .build())
    }
}

/// Reverse of `UnenrolStudentCommand`: re-adds the record as it was.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ReinstateAttendanceCommand {
    record: AttendanceRecord,
}

impl Command for ReinstateAttendanceCommand {
    fn execute(&self, book: &mut AddressBook) -> CommandResult<CommandOutcome> {
        book.add_attendance_record(self.record)?;
        let person = book
            .person(self.record.student_id())
            .ok_or(CommandError::EntityNotFound(EntityKind::Student))?;

        Ok(CommandOutcome::builder(format!(
            "Re-enrolled student: {}",
            format_attendance(&self.record, person)
        ))
        .with_focus(Focus::Session(self.record.session_id()))
        .with_reverse(UnenrolStudentCommand::new(
            self.record.session_id(),
            Identity::from(self.record.student_id()),
        ))
        .build())
    }
}
