//! JSON file storage for the address book.
//!
//! Stored records keep raw strings and signed ids so that hand-edited or
//! corrupted files can be reported field by field instead of failing at the
//! serde layer.

use crate::model::address_book::{AddressBook, BookError, EntityKind};
use crate::model::attendance::AttendanceRecord;
use crate::model::fields::{Address, Email, FieldError, Memo, Name, Phone, Subject, Tag};
use crate::model::ids::{PersonId, SessionId};
use crate::model::person::Person;
use crate::model::session::{parse_session_date, Session, SESSION_DATE_FORMAT};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

pub type StorageResult<T> = Result<T, StorageError>;

/// Storage error for load and save operations.
#[derive(Debug)]
pub enum StorageError {
    Io(std::io::Error),
    Json(serde_json::Error),
    /// A required field is absent from a stored record.
    MissingField {
        entity: &'static str,
        field: &'static str,
    },
    Field(FieldError),
    /// A stored id is zero or negative.
    InvalidId { entity: &'static str },
    /// The loaded records break an address book invariant as a whole.
    Book(BookError),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "storage io error: {err}"),
            Self::Json(err) => write!(f, "storage json error: {err}"),
            Self::MissingField { entity, field } => {
                write!(f, "{entity}'s {field} field is missing!")
            }
            Self::Field(err) => write!(f, "{err}"),
            Self::InvalidId { entity } => write!(f, "{entity} ID must be a positive integer"),
            Self::Book(err) => write!(f, "invalid address book data: {err}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::Field(err) => Some(err),
            Self::Book(err) => Some(err),
            Self::MissingField { .. } | Self::InvalidId { .. } => None,
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<FieldError> for StorageError {
    fn from(value: FieldError) -> Self {
        Self::Field(value)
    }
}

impl From<BookError> for StorageError {
    fn from(value: BookError) -> Self {
        Self::Book(value)
    }
}

/// Stored form of a student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredPerson {
    pub id: i64,
    pub name: Option<String>,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub memo: String,
}

impl StoredPerson {
    pub fn from_model(person: &Person) -> Self {
        Self {
            id: i64::from(person.id().value()),
            name: Some(person.name().to_string()),
            phone: person.phone().to_string(),
            email: person.email().to_string(),
            address: person.address().to_string(),
            tags: person.tags().iter().map(Tag::to_string).collect(),
            memo: person.memo().to_string(),
        }
    }

    /// Validates the record and builds the model student.
    ///
    /// # Errors
    /// - `InvalidId` for a non-positive id.
    /// - `MissingField` when the name is absent.
    /// - `Field` for the first field violating its constraint.
    pub fn to_model(&self) -> StorageResult<Person> {
        let id = PersonId::new(positive_id(self.id, "Person")?);
        let name = self.name.clone().ok_or(StorageError::MissingField {
            entity: "Person",
            field: "Name",
        })?;

        let tags = self
            .tags
            .iter()
            .map(|tag| Tag::new(tag.as_str()))
            .collect::<Result<BTreeSet<Tag>, FieldError>>()?;

        Ok(Person::new(
            Name::new(name)?,
            Phone::new(self.phone.as_str())?,
            Email::new(self.email.as_str())?,
            Address::new(self.address.as_str())?,
            tags,
            Memo::new(self.memo.as_str())?,
        )
        .with_id(id))
    }
}

/// Stored form of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    pub id: i64,
    pub date: Option<String>,
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_id: Option<i64>,
}

impl StoredSession {
    pub fn from_model(session: &Session) -> Self {
        Self {
            id: i64::from(session.id().value()),
            date: Some(session.date().format(SESSION_DATE_FORMAT).to_string()),
            subject: Some(session.subject().to_string()),
            student_id: session.student_id().map(|id| i64::from(id.value())),
        }
    }

    pub fn to_model(&self) -> StorageResult<Session> {
        let id = SessionId::new(positive_id(self.id, "Session")?);
        let date = self.date.as_deref().ok_or(StorageError::MissingField {
            entity: "Session",
            field: "Date",
        })?;
        let subject = self.subject.clone().ok_or(StorageError::MissingField {
            entity: "Session",
            field: "Subject",
        })?;

        let session = Session::new(parse_session_date(date)?, Subject::new(subject)?).with_id(id);
        match self.student_id {
            Some(student_id) => Ok(session.for_student(PersonId::new(positive_id(
                student_id, "Person",
            )?))),
            None => Ok(session),
        }
    }
}

/// Stored form of an attendance record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredAttendance {
    pub session_id: i64,
    pub student_id: i64,
    #[serde(default)]
    pub present: bool,
}

impl StoredAttendance {
    pub fn from_model(record: &AttendanceRecord) -> Self {
        Self {
            session_id: i64::from(record.session_id().value()),
            student_id: i64::from(record.student_id().value()),
            present: record.is_present(),
        }
    }

    pub fn to_model(&self) -> StorageResult<AttendanceRecord> {
        Ok(AttendanceRecord::new(
            SessionId::new(positive_id(self.session_id, "Session")?),
            PersonId::new(positive_id(self.student_id, "Person")?),
            self.present,
        ))
    }
}

/// Root JSON document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredAddressBook {
    #[serde(default)]
    pub persons: Vec<StoredPerson>,
    #[serde(default)]
    pub sessions: Vec<StoredSession>,
    #[serde(default)]
    pub attendance: Vec<StoredAttendance>,
}

/// A stored record that could not be loaded.
#[derive(Debug)]
pub struct SkippedRecord {
    pub kind: EntityKind,
    /// Position of the record within its stored list.
    pub index: usize,
    pub error: StorageError,
}

impl Display for SkippedRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} #{}: {}", self.kind.as_str(), self.index, self.error)
    }
}

/// Result of converting stored data into a model.
#[derive(Debug)]
pub struct LoadReport {
    pub book: AddressBook,
    pub skipped: Vec<SkippedRecord>,
}

impl StoredAddressBook {
    pub fn from_model(book: &AddressBook) -> Self {
        Self {
            persons: book.persons().iter().map(StoredPerson::from_model).collect(),
            sessions: book
                .sessions()
                .iter()
                .map(StoredSession::from_model)
                .collect(),
            attendance: book
                .attendance_records()
                .iter()
                .map(StoredAttendance::from_model)
                .collect(),
        }
    }

    /// Builds an address book, skipping records that fail validation.
    ///
    /// Sessions booked for a skipped or unknown student, and attendance
    /// records pointing at a skipped or unknown entity, are skipped too.
    ///
    /// # Errors
    /// - `Book` when the remaining records contain duplicates.
    pub fn to_model(&self) -> StorageResult<LoadReport> {
        let mut skipped = Vec::new();

        let persons = convert_all(&self.persons, EntityKind::Student, &mut skipped, |stored| {
            stored.to_model()
        });
        let person_ids: HashSet<PersonId> = persons.iter().map(Person::id).collect();

        let sessions = convert_all(&self.sessions, EntityKind::Session, &mut skipped, |stored| {
            let session = stored.to_model()?;
            match session.student_id() {
                Some(student_id) if !person_ids.contains(&student_id) => {
                    Err(missing_reference(EntityKind::Student, student_id))
                }
                _ => Ok(session),
            }
        });
        let session_ids: HashSet<SessionId> = sessions.iter().map(Session::id).collect();

        let records = convert_all(
            &self.attendance,
            EntityKind::AttendanceRecord,
            &mut skipped,
            |stored| {
                let record = stored.to_model()?;
                if !session_ids.contains(&record.session_id()) {
                    return Err(missing_reference(EntityKind::Session, record.session_id()));
                }
                if !person_ids.contains(&record.student_id()) {
                    return Err(missing_reference(EntityKind::Student, record.student_id()));
                }
                Ok(record)
            },
        );

        let book = AddressBook::from_parts(persons, sessions, records)?;
        Ok(LoadReport { book, skipped })
    }
}

/// Reads the address book at `path`.
///
/// Returns `Ok(None)` when the file does not exist.
///
/// # Errors
/// - `Io` / `Json` when the file cannot be read or parsed.
/// - `Book` when the stored data holds duplicates.
pub fn read_address_book(path: &Path) -> StorageResult<Option<LoadReport>> {
    if !path.exists() {
        info!(
            "event=storage_load module=storage status=missing path={}",
            path.display()
        );
        return Ok(None);
    }

    let raw = std::fs::read_to_string(path)?;
    let stored: StoredAddressBook = serde_json::from_str(&raw)?;
    let report = stored.to_model()?;

    for record in &report.skipped {
        warn!(
            "event=storage_skip module=storage status=error kind={} index={} reason=\"{}\"",
            record.kind.as_str(),
            record.index,
            record.error
        );
    }
    info!(
        "event=storage_load module=storage status=ok path={} students={} sessions={} records={} skipped={}",
        path.display(),
        report.book.persons().len(),
        report.book.sessions().len(),
        report.book.attendance_records().len(),
        report.skipped.len()
    );
    Ok(Some(report))
}

/// Writes `book` to `path` as pretty-printed JSON, creating parent directories.
pub fn write_address_book(path: &Path, book: &AddressBook) -> StorageResult<()> {
    let rendered = serde_json::to_string_pretty(&StoredAddressBook::from_model(book))?;

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, rendered)?;

    info!(
        "event=storage_save module=storage status=ok path={} students={} sessions={} records={}",
        path.display(),
        book.persons().len(),
        book.sessions().len(),
        book.attendance_records().len()
    );
    Ok(())
}

fn positive_id(raw: i64, entity: &'static str) -> StorageResult<u32> {
    u32::try_from(raw)
        .ok()
        .filter(|id| *id > 0)
        .ok_or(StorageError::InvalidId { entity })
}

fn missing_reference(kind: EntityKind, id: impl Display) -> StorageError {
    StorageError::Book(BookError::MissingReference {
        kind,
        reference: id.to_string(),
    })
}

fn convert_all<S, M>(
    stored: &[S],
    kind: EntityKind,
    skipped: &mut Vec<SkippedRecord>,
    mut convert: impl FnMut(&S) -> StorageResult<M>,
) -> Vec<M> {
    let mut converted = Vec::with_capacity(stored.len());
    for (index, record) in stored.iter().enumerate() {
        match convert(record) {
            Ok(model) => converted.push(model),
            Err(error) => skipped.push(SkippedRecord { kind, index, error }),
        }
    }
    converted
}

#[cfg(test)]
mod tests {
    use super::{positive_id, StorageError, StoredPerson};

    fn stored_person() -> StoredPerson {
        StoredPerson {
            id: 1,
            name: Some("Benson Meier".to_string()),
            phone: "98765432".to_string(),
            email: "johnd@example.com".to_string(),
            address: "311, Clementi Ave 2, #02-25".to_string(),
            tags: vec!["owesMoney".to_string(), "friends".to_string()],
            memo: "Needs extra help".to_string(),
        }
    }

    #[test]
    fn positive_id_rejects_zero_negative_and_overflow() {
        assert_eq!(positive_id(7, "Person").expect("7 is valid"), 7);
        for raw in [0, -1, i64::from(u32::MAX) + 1] {
            let error = positive_id(raw, "Person").expect_err("id should be rejected");
            assert_eq!(error.to_string(), "Person ID must be a positive integer");
        }
    }

    #[test]
    fn stored_person_converts_to_model() {
        let person = stored_person().to_model().expect("valid record");
        assert_eq!(person.id().value(), 1);
        assert_eq!(person.name().as_str(), "Benson Meier");
        assert_eq!(person.tags().len(), 2);
        assert_eq!(StoredPerson::from_model(&person).name, stored_person().name);
    }

    #[test]
    fn missing_name_reports_field() {
        let mut stored = stored_person();
        stored.name = None;
        let error = stored.to_model().expect_err("missing name must fail");
        assert!(matches!(error, StorageError::MissingField { .. }));
        assert_eq!(error.to_string(), "Person's Name field is missing!");
    }

    #[test]
    fn invalid_tag_is_rejected() {
        let mut stored = stored_person();
        stored.tags.push(" ".to_string());
        assert!(matches!(
            stored.to_model(),
            Err(StorageError::Field(_))
        ));
    }
}
