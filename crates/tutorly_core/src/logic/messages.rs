//! User-visible messages and entity formatting.

use crate::model::attendance::AttendanceRecord;
use crate::model::person::Person;
use crate::model::session::{Session, SESSION_DATE_FORMAT};

pub const MESSAGE_PERSON_NOT_FOUND: &str = "Person not found!";
pub const MESSAGE_SESSION_NOT_FOUND: &str = "Session not found!";
pub const MESSAGE_ATTENDANCE_NOT_FOUND: &str = "The student is not enrolled in this session!";
pub const MESSAGE_DUPLICATE_PERSON: &str = "This student already exists in the address book.";
pub const MESSAGE_DUPLICATE_SESSION: &str = "This session already exists in the address book.";
pub const MESSAGE_DUPLICATE_ATTENDANCE: &str = "The student is already enrolled in this session.";
pub const MESSAGE_NOT_EDITED: &str = "At least one field to edit must be provided.";
pub const MESSAGE_NOTHING_TO_UNDO: &str = "There is no command to undo!";

/// Formats a student for display to the user.
pub fn format_person(person: &Person) -> String {
    let tags: Vec<&str> = person.tags().iter().map(|tag| tag.as_str()).collect();
    format!(
        "id: {}; Name: {}; Phone: {}; Email: {}; Address: {}; Tags: [{}]; Memo: {}",
        person.id(),
        person.name(),
        person.phone(),
        person.email(),
        person.address(),
        tags.join(", "),
        person.memo()
    )
}

/// Formats a session for display to the user.
pub fn format_session(session: &Session) -> String {
    format!(
        "id: {}; Date: {}; Subject: {}",
        session.id(),
        session.date().format(SESSION_DATE_FORMAT),
        session.subject()
    )
}

pub fn format_attendance(record: &AttendanceRecord, person: &Person) -> String {
    format!(
        "{} in session {} ({})",
        person.name(),
        record.session_id(),
        if record.is_present() {
            "present"
        } else {
            "absent"
        }
    )
}
