use chrono::NaiveDate;
use std::cell::Cell;
use std::rc::Rc;
use tutorly_core::model::fields::{Name, Subject};
use tutorly_core::uniquelist::ListChange;
use tutorly_core::{
    AddressBook, AttendanceRecord, BookError, EntityKind, Identity, Person, PersonId, Session,
    SessionId,
};

fn person(name: &str) -> Person {
    Person::named(Name::new(name).unwrap())
}

fn session(day: u32, subject: &str) -> Session {
    Session::new(
        NaiveDate::from_ymd_opt(2025, 3, day).unwrap(),
        Subject::new(subject).unwrap(),
    )
}

fn by_name(name: &str) -> Identity {
    Identity::ByName(Name::new(name).unwrap())
}

#[test]
fn add_person_assigns_increasing_ids() {
    let mut book = AddressBook::new();
    let alice = book.add_person(person("Alice")).unwrap();
    let bob = book.add_person(person("Bob")).unwrap();

    assert_eq!(alice, PersonId::new(1));
    assert_eq!(bob, PersonId::new(2));
    assert_eq!(book.person(bob).unwrap().name().as_str(), "Bob");
}

#[test]
fn add_person_rejects_same_name() {
    let mut book = AddressBook::new();
    book.add_person(person("Alice")).unwrap();

    let error = book.add_person(person("Alice")).unwrap_err();
    assert!(error.is_duplicate());
    assert_eq!(book.persons().len(), 1);
}

#[test]
fn remove_student_cascades_to_sessions_and_attendance() {
    let mut book = AddressBook::new();
    let p1 = book.add_person(person("Alice")).unwrap();
    let p2 = book.add_person(person("Bob")).unwrap();
    let s1 = book.add_session(session(1, "Math").for_student(p1)).unwrap();
    let s2 = book.add_session(session(2, "Physics")).unwrap();
    book.add_attendance_record(AttendanceRecord::new(s1, p1, true))
        .unwrap();
    book.add_attendance_record(AttendanceRecord::new(s2, p1, false))
        .unwrap();
    book.add_attendance_record(AttendanceRecord::new(s2, p2, true))
        .unwrap();

    let removed = book.remove_person(p1).unwrap();

    assert_eq!(removed.person.id(), p1);
    assert_eq!(removed.sessions.len(), 1);
    assert_eq!(removed.records.len(), 2);
    assert_eq!(book.persons().len(), 1);
    assert_eq!(book.persons()[0].id(), p2);
    assert_eq!(book.sessions().len(), 1);
    assert_eq!(book.sessions()[0].id(), s2);
    assert_eq!(
        book.attendance_records(),
        &[AttendanceRecord::new(s2, p2, true)]
    );
}

#[test]
fn restore_person_brings_back_the_whole_cascade() {
    let mut book = AddressBook::new();
    let p1 = book.add_person(person("Alice")).unwrap();
    let s1 = book.add_session(session(4, "Math").for_student(p1)).unwrap();
    book.add_attendance_record(AttendanceRecord::new(s1, p1, true))
        .unwrap();
    let snapshot_persons = book.persons().to_vec();
    let snapshot_sessions = book.sessions().to_vec();

    let removed = book.remove_person(p1).unwrap();
    book.restore_person(removed).unwrap();

    assert_eq!(book.persons(), snapshot_persons.as_slice());
    assert_eq!(book.sessions(), snapshot_sessions.as_slice());
    assert!(book.attendance_record(s1, p1).unwrap().is_present());
}

#[test]
fn remove_unknown_student_reports_not_found() {
    let mut book = AddressBook::new();
    let error = book.remove_person(PersonId::new(4)).unwrap_err();
    assert!(matches!(
        error,
        BookError::EntityNotFound {
            kind: EntityKind::Student,
            ..
        }
    ));
}

#[test]
fn session_for_unknown_student_is_rejected() {
    let mut book = AddressBook::new();
    let error = book
        .add_session(session(5, "Math").for_student(PersonId::new(3)))
        .unwrap_err();
    assert!(matches!(error, BookError::MissingReference { .. }));
    assert!(book.sessions().is_empty());
}

#[test]
fn attendance_requires_existing_session_and_student() {
    let mut book = AddressBook::new();
    let p1 = book.add_person(person("Alice")).unwrap();

    let error = book
        .add_attendance_record(AttendanceRecord::new(SessionId::new(1), p1, false))
        .unwrap_err();
    assert!(matches!(
        error,
        BookError::MissingReference {
            kind: EntityKind::Session,
            ..
        }
    ));
}

#[test]
fn identity_resolves_by_id_then_name_ignoring_case() {
    let mut book = AddressBook::new();
    let alice = book.add_person(person("Alice Tan")).unwrap();
    let numeric = book.add_person(person("42")).unwrap();

    assert_eq!(
        book.person_by_identity(&Identity::ById(alice.value()))
            .unwrap()
            .id(),
        alice
    );
    assert_eq!(
        book.person_by_identity(&by_name("alice tan")).unwrap().id(),
        alice
    );
    assert_eq!(
        book.person_by_identity(&Identity::ById(42)).unwrap().id(),
        numeric
    );
    assert!(matches!(
        book.person_by_identity(&Identity::ById(99)),
        Err(BookError::EntityNotFound { .. })
    ));
}

#[test]
fn identity_matching_several_names_is_ambiguous() {
    let mut book = AddressBook::new();
    book.add_person(person("Alice")).unwrap();
    book.add_person(person("alice")).unwrap();

    let error = book.person_by_identity(&by_name("ALICE")).unwrap_err();
    assert_eq!(
        error,
        BookError::AmbiguousIdentity {
            reference: "ALICE".to_string(),
            matches: 2,
        }
    );
}

#[test]
fn from_parts_continues_ids_after_highest_loaded() {
    let persons = vec![
        person("Alice").with_id(PersonId::new(3)),
        person("Bob").with_id(PersonId::new(7)),
    ];
    let sessions = vec![session(2, "Math")
        .with_id(SessionId::new(5))
        .for_student(PersonId::new(7))];
    let records = vec![AttendanceRecord::new(
        SessionId::new(5),
        PersonId::new(3),
        true,
    )];

    let mut book = AddressBook::from_parts(persons, sessions, records).unwrap();

    assert_eq!(book.add_person(person("Cara")).unwrap(), PersonId::new(8));
    assert_eq!(
        book.add_session(session(9, "Chemistry")).unwrap(),
        SessionId::new(6)
    );
}

#[test]
fn from_parts_rejects_dangling_and_duplicate_data() {
    let dangling = AddressBook::from_parts(
        vec![person("Alice").with_id(PersonId::new(1))],
        Vec::new(),
        vec![AttendanceRecord::new(
            SessionId::new(2),
            PersonId::new(1),
            false,
        )],
    );
    assert!(matches!(
        dangling,
        Err(BookError::MissingReference { .. })
    ));

    let duplicate_ids = AddressBook::from_parts(
        vec![
            person("Alice").with_id(PersonId::new(1)),
            person("Bob").with_id(PersonId::new(1)),
        ],
        Vec::new(),
        Vec::new(),
    );
    assert!(duplicate_ids.unwrap_err().is_duplicate());
}

#[test]
fn edit_cannot_change_student_id() {
    let mut book = AddressBook::new();
    let id = book.add_person(person("Alice")).unwrap();
    let original = book.person(id).unwrap().clone();

    let error = book
        .set_person(&original, person("Alicia").with_id(PersonId::new(9)))
        .unwrap_err();
    assert_eq!(
        error,
        BookError::IdentityChanged {
            kind: EntityKind::Student
        }
    );
}

#[test]
fn observers_are_notified_per_list() {
    let mut book = AddressBook::new();
    let student_changes = Rc::new(Cell::new(0));
    let counter = Rc::clone(&student_changes);
    book.subscribe(
        EntityKind::Student,
        Rc::new(move |_change: ListChange| counter.set(counter.get() + 1)),
    );

    let id = book.add_person(person("Alice")).unwrap();
    book.add_session(session(3, "Math")).unwrap();
    book.remove_person(id).unwrap();

    assert_eq!(student_changes.get(), 2);
}

#[test]
fn reset_data_replaces_everything_and_keeps_observers() {
    let mut book = AddressBook::new();
    book.add_person(person("Alice")).unwrap();
    let resets = Rc::new(Cell::new(0));
    let counter = Rc::clone(&resets);
    book.subscribe(
        EntityKind::Session,
        Rc::new(move |_change: ListChange| counter.set(counter.get() + 1)),
    );

    let mut replacement = AddressBook::new();
    let bob = replacement.add_person(person("Bob")).unwrap();
    replacement
        .add_session(session(6, "Math").for_student(bob))
        .unwrap();
    let expected = AddressBook::from_parts(
        replacement.persons().to_vec(),
        replacement.sessions().to_vec(),
        Vec::new(),
    )
    .unwrap();

    book.reset_data(replacement).unwrap();

    assert_eq!(book, expected);
    assert_eq!(resets.get(), 2);
    assert_eq!(book.add_person(person("Cara")).unwrap(), PersonId::new(2));
}

#[test]
fn rejected_add_does_not_consume_an_id() {
    let mut book = AddressBook::new();
    book.add_person(person("Alice")).unwrap();
    book.add_person(person("Alice")).unwrap_err();
    assert_eq!(book.add_person(person("Bob")).unwrap(), PersonId::new(2));

    book.add_session(session(1, "Math")).unwrap();
    book.add_session(session(1, "Math")).unwrap_err();
    book.add_session(session(2, "Math").for_student(PersonId::new(9)))
        .unwrap_err();
    assert_eq!(
        book.add_session(session(3, "Math")).unwrap(),
        SessionId::new(2)
    );
}

#[test]
fn exhausted_ids_are_reported_instead_of_reused() {
    let mut book = AddressBook::from_parts(
        vec![person("Alice").with_id(PersonId::new(u32::MAX))],
        vec![session(1, "Math").with_id(SessionId::new(u32::MAX))],
        Vec::new(),
    )
    .unwrap();

    assert_eq!(
        book.add_person(person("Bob")).unwrap_err(),
        BookError::IdsExhausted {
            kind: EntityKind::Student
        }
    );
    assert_eq!(
        book.add_session(session(2, "Physics")).unwrap_err(),
        BookError::IdsExhausted {
            kind: EntityKind::Session
        }
    );
    assert!(book
        .add_person(person("Bob").with_id(PersonId::new(u32::MAX)))
        .unwrap_err()
        .is_duplicate());
    assert_eq!(book.persons().len(), 1);
    assert_eq!(book.sessions().len(), 1);

    assert_eq!(
        book.add_person(person("Cara").with_id(PersonId::new(5)))
            .unwrap(),
        PersonId::new(5)
    );
}

#[test]
fn from_parts_reports_exhausted_ids_for_unassigned_entities() {
    let result = AddressBook::from_parts(
        vec![
            person("Alice").with_id(PersonId::new(u32::MAX)),
            person("Bob"),
        ],
        Vec::new(),
        Vec::new(),
    );
    assert!(matches!(
        result,
        Err(BookError::IdsExhausted {
            kind: EntityKind::Student
        })
    ));
}

#[test]
fn exact_case_name_wins_over_case_insensitive_matches() {
    let mut book = AddressBook::new();
    let upper = book.add_person(person("Alice")).unwrap();
    let lower = book.add_person(person("alice")).unwrap();

    assert_eq!(book.person_by_identity(&by_name("Alice")).unwrap().id(), upper);
    assert_eq!(book.person_by_identity(&by_name("alice")).unwrap().id(), lower);
}

#[test]
fn failed_student_restore_leaves_book_unchanged() {
    let mut book = AddressBook::new();
    let alice = book.add_person(person("Alice")).unwrap();
    let bob = book.add_person(person("Bob")).unwrap();
    let booked = book
        .add_session(session(8, "Math").for_student(alice))
        .unwrap();
    book.add_attendance_record(AttendanceRecord::new(booked, alice, true))
        .unwrap();
    book.add_attendance_record(AttendanceRecord::new(booked, bob, false))
        .unwrap();

    let removed_alice = book.remove_person(alice).unwrap();
    book.remove_person(bob).unwrap();
    let persons = book.persons().to_vec();
    let sessions = book.sessions().to_vec();
    let records = book.attendance_records().to_vec();

    let error = book.restore_person(removed_alice).unwrap_err();

    assert!(matches!(
        error,
        BookError::MissingReference {
            kind: EntityKind::Student,
            ..
        }
    ));
    assert_eq!(book.persons(), persons.as_slice());
    assert_eq!(book.sessions(), sessions.as_slice());
    assert_eq!(book.attendance_records(), records.as_slice());
    assert_eq!(book.add_person(person("Cara")).unwrap(), PersonId::new(3));
}

#[test]
fn failed_session_restore_leaves_book_unchanged() {
    let mut book = AddressBook::new();
    let alice = book.add_person(person("Alice")).unwrap();
    let bob = book.add_person(person("Bob")).unwrap();
    let group = book.add_session(session(9, "Physics")).unwrap();
    book.add_attendance_record(AttendanceRecord::new(group, alice, true))
        .unwrap();
    book.add_attendance_record(AttendanceRecord::new(group, bob, true))
        .unwrap();

    let removed = book.remove_session(group).unwrap();
    book.remove_person(bob).unwrap();
    let persons = book.persons().to_vec();
    let records = book.attendance_records().to_vec();

    let error = book.restore_session(removed).unwrap_err();

    assert!(matches!(error, BookError::MissingReference { .. }));
    assert_eq!(book.persons(), persons.as_slice());
    assert!(book.sessions().is_empty());
    assert_eq!(book.attendance_records(), records.as_slice());
    assert_eq!(
        book.add_session(session(10, "Physics")).unwrap(),
        SessionId::new(2)
    );
}
