use chrono::NaiveDate;
use tutorly_core::logic::attendance::{
    EnrolStudentCommand, MarkAttendanceCommand, UnenrolStudentCommand,
};
use tutorly_core::model::fields::{Name, Subject};
use tutorly_core::{
    AddressBook, Command, CommandError, CommandHistory, EntityKind, Identity, Person, PersonId,
    Session, SessionId,
};

fn roster() -> (AddressBook, SessionId, PersonId) {
    let mut book = AddressBook::new();
    let student = book
        .add_person(Person::named(Name::new("Alice").unwrap()))
        .unwrap();
    let session = book
        .add_session(Session::new(
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            Subject::new("Physics").unwrap(),
        ))
        .unwrap();
    (book, session, student)
}

fn alice() -> Identity {
    Identity::ByName(Name::new("alice").unwrap())
}

#[test]
fn enrol_adds_absent_record_once() {
    let (mut book, session, student) = roster();

    let outcome = EnrolStudentCommand::new(session, alice())
        .execute(&mut book)
        .unwrap();
    assert_eq!(
        outcome.feedback(),
        "Enrolled student: Alice in session 1 (absent)"
    );
    assert!(!book.attendance_record(session, student).unwrap().is_present());

    let error = EnrolStudentCommand::new(session, alice())
        .execute(&mut book)
        .unwrap_err();
    assert_eq!(
        error,
        CommandError::DuplicateEntity(EntityKind::AttendanceRecord)
    );
}

#[test]
fn enrol_into_unknown_session_is_reported() {
    let (mut book, _, _) = roster();
    let error = EnrolStudentCommand::new(SessionId::new(8), alice())
        .execute(&mut book)
        .unwrap_err();
    assert_eq!(error, CommandError::EntityNotFound(EntityKind::Session));
}

#[test]
fn mark_attendance_toggles_and_rejects_no_op() {
    let (mut book, session, student) = roster();
    EnrolStudentCommand::new(session, alice())
        .execute(&mut book)
        .unwrap();

    let unchanged = MarkAttendanceCommand::new(session, alice(), false)
        .execute(&mut book)
        .unwrap_err();
    assert_eq!(unchanged, CommandError::AttendanceUnchanged { present: false });

    let outcome = MarkAttendanceCommand::new(session, alice(), true)
        .execute(&mut book)
        .unwrap();
    assert!(book.attendance_record(session, student).unwrap().is_present());

    outcome.reverse().unwrap().execute(&mut book).unwrap();
    assert!(!book.attendance_record(session, student).unwrap().is_present());
}

#[test]
fn mark_attendance_requires_enrolment() {
    let (mut book, session, _) = roster();
    let error = MarkAttendanceCommand::new(session, alice(), true)
        .execute(&mut book)
        .unwrap_err();
    assert_eq!(
        error.to_string(),
        "The student is not enrolled in this session!"
    );
}

#[test]
fn unenrol_undo_reinstates_previous_presence() {
    let (mut book, session, student) = roster();
    let mut history = CommandHistory::default();
    history
        .execute(&EnrolStudentCommand::new(session, alice()), &mut book)
        .unwrap();
    history
        .execute(
            &MarkAttendanceCommand::new(session, Identity::ById(student.value()), true),
            &mut book,
        )
        .unwrap();
    history
        .execute(&UnenrolStudentCommand::new(session, alice()), &mut book)
        .unwrap();
    assert!(book.attendance_records().is_empty());

    history.undo(&mut book).unwrap();
    assert!(book.attendance_record(session, student).unwrap().is_present());

    history.undo(&mut book).unwrap();
    history.undo(&mut book).unwrap();
    assert!(book.attendance_records().is_empty());
    assert_eq!(
        history.undo(&mut book).unwrap_err(),
        CommandError::NothingToUndo
    );
}

#[test]
fn history_keeps_only_the_most_recent_steps() {
    let (mut book, session, _) = roster();
    let mut history = CommandHistory::new(2);
    history
        .execute(&EnrolStudentCommand::new(session, alice()), &mut book)
        .unwrap();
    for present in [true, false, true] {
        history
            .execute(&MarkAttendanceCommand::new(session, alice(), present), &mut book)
            .unwrap();
    }
    assert_eq!(history.len(), 2);

    history.undo(&mut book).unwrap();
    history.undo(&mut book).unwrap();
    assert_eq!(book.attendance_records().len(), 1);
    assert!(history.undo(&mut book).is_err());
}
