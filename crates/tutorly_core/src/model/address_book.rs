//! In-memory entity repository.
//!
//! # Responsibility
//! - Own the student, session and attendance lists exclusively.
//! - Assign numeric ids to newly added students and sessions.
//! - Keep cross-entity references consistent through cascading removals.
//!
//! # Invariants
//! - Every session's booked student and every attendance record's session and
//!   student resolve to stored entities.
//! - Cascades are computed in full before the first mutation and applied
//!   dependents-first, so no intermediate state holds a dangling reference.
//! - Edits never change an entity's identity token.

use crate::model::attendance::AttendanceRecord;
use crate::model::identity::Identity;
use crate::model::ids::{PersonId, SessionId};
use crate::model::person::Person;
use crate::model::session::Session;
use crate::uniquelist::{ListObserver, ListPolicy, UniqueList, UniqueListError};
use log::{debug, info, warn};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

pub type BookResult<T> = Result<T, BookError>;

type IdCounters = (Option<PersonId>, Option<SessionId>);

/// Entity category, used in errors and observer registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Student,
    Session,
    AttendanceRecord,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Session => "session",
            Self::AttendanceRecord => "attendance record",
        }
    }
}

/// Repository error for address book operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookError {
    /// Uniqueness or lookup failure raised by the backing list.
    List {
        kind: EntityKind,
        error: UniqueListError,
    },
    /// No entity matches the requested reference.
    EntityNotFound { kind: EntityKind, reference: String },
    /// A name lookup matched several students.
    AmbiguousIdentity { reference: String, matches: usize },
    /// An entity refers to another entity that is not stored.
    MissingReference { kind: EntityKind, reference: String },
    /// An edit tried to replace an entity with one of a different identity.
    IdentityChanged { kind: EntityKind },
    /// Every id of this kind is taken; no new one can be assigned.
    IdsExhausted { kind: EntityKind },
}

impl BookError {
    fn list(kind: EntityKind) -> impl FnOnce(UniqueListError) -> Self {
        move |error| Self::List { kind, error }
    }

    fn duplicate(kind: EntityKind) -> Self {
        Self::List {
            kind,
            error: UniqueListError::DuplicateElement,
        }
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(
            self,
            Self::List {
                error: UniqueListError::DuplicateElement,
                ..
            }
        )
    }
}

impl Display for BookError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::List { kind, error } => write!(f, "{} list: {error}", kind.as_str()),
            Self::EntityNotFound { kind, reference } => {
                write!(f, "{} not found: {reference}", kind.as_str())
            }
            Self::AmbiguousIdentity { reference, matches } => write!(
                f,
                "student reference `{reference}` is ambiguous: {matches} students match"
            ),
            Self::MissingReference { kind, reference } => write!(
                f,
                "referenced {} does not exist: {reference}",
                kind.as_str()
            ),
            Self::IdentityChanged { kind } => {
                write!(f, "{} identity cannot be changed by an edit", kind.as_str())
            }
            Self::IdsExhausted { kind } => write!(f, "no {} ids left to assign", kind.as_str()),
        }
    }
}

impl Error for BookError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::List { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// Everything removed by one cascading student deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovedPerson {
    pub person: Person,
    pub sessions: Vec<Session>,
    pub records: Vec<AttendanceRecord>,
}

/// Everything removed by one cascading session deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovedSession {
    pub session: Session,
    pub records: Vec<AttendanceRecord>,
}

/// Owner of all student, session and attendance data.
#[derive(Debug)]
pub struct AddressBook {
    persons: UniqueList<Person>,
    sessions: UniqueList<Session>,
    attendance: UniqueList<AttendanceRecord>,
    /// Next id handed to a new student; `None` once ids are exhausted.
    next_person_id: Option<PersonId>,
    next_session_id: Option<SessionId>,
}

impl Default for AddressBook {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for AddressBook {
    fn eq(&self, other: &Self) -> bool {
        self.persons == other.persons
            && self.sessions == other.sessions
            && self.attendance == other.attendance
    }
}

impl AddressBook {
    pub fn new() -> Self {
        Self {
            persons: UniqueList::new(ListPolicy::new(
                Person::is_same_person,
                Person::compare_by_id,
            )),
            sessions: UniqueList::new(ListPolicy::new(
                Session::is_same_session,
                Session::compare_chronologically,
            )),
            attendance: UniqueList::new(ListPolicy::new(
                AttendanceRecord::is_same_record,
                AttendanceRecord::compare_by_key,
            )),
            next_person_id: Some(PersonId::new(1)),
            next_session_id: Some(SessionId::new(1)),
        }
    }

    /// Builds a book from bulk-loaded entities.
    ///
    /// Entities without an id get fresh ones after the highest loaded id.
    ///
    /// # Errors
    /// - Duplicate entities or ids within one kind.
    /// - Sessions or records referring to entities absent from the batch.
    pub fn from_parts(
        persons: Vec<Person>,
        sessions: Vec<Session>,
        records: Vec<AttendanceRecord>,
    ) -> BookResult<Self> {
        let mut book = Self::new();

        ensure_unique_ids(persons.iter().map(Person::id), EntityKind::Student)?;
        ensure_unique_ids(sessions.iter().map(Session::id), EntityKind::Session)?;

        book.next_person_id = next_free(persons.iter().map(Person::id), PersonId::new(1));
        let persons = assign_missing_ids(
            persons,
            &mut book.next_person_id,
            EntityKind::Student,
            Person::id,
            Person::with_id,
        )?;
        book.persons
            .set_all(persons)
            .map_err(BookError::list(EntityKind::Student))?;

        book.next_session_id = next_free(sessions.iter().map(Session::id), SessionId::new(1));
        let sessions = assign_missing_ids(
            sessions,
            &mut book.next_session_id,
            EntityKind::Session,
            Session::id,
            Session::with_id,
        )?;
        for session in &sessions {
            book.ensure_booked_student_exists(session)?;
        }
        book.sessions
            .set_all(sessions)
            .map_err(BookError::list(EntityKind::Session))?;

        for record in &records {
            book.ensure_record_references_exist(record)?;
        }
        book.attendance
            .set_all(records)
            .map_err(BookError::list(EntityKind::AttendanceRecord))?;

        debug!(
            "event=book_load module=book status=ok students={} sessions={} records={}",
            book.persons.len(),
            book.sessions.len(),
            book.attendance.len()
        );
        Ok(book)
    }

    /// Replaces all data with `replacement`, notifying observers once per list.
    pub fn reset_data(&mut self, replacement: AddressBook) -> BookResult<()> {
        let AddressBook {
            persons,
            sessions,
            attendance,
            next_person_id,
            next_session_id,
        } = replacement;

        // Dependents are cleared first so observers never see dangling links.
        self.attendance.clear();
        self.sessions.clear();
        self.persons
            .set_all(persons.into_vec())
            .map_err(BookError::list(EntityKind::Student))?;
        self.sessions
            .set_all(sessions.into_vec())
            .map_err(BookError::list(EntityKind::Session))?;
        self.attendance
            .set_all(attendance.into_vec())
            .map_err(BookError::list(EntityKind::AttendanceRecord))?;
        self.next_person_id = next_person_id;
        self.next_session_id = next_session_id;
        Ok(())
    }

    /// Registers a change observer on the list holding `kind`.
    pub fn subscribe(&mut self, kind: EntityKind, observer: Rc<dyn ListObserver>) {
        match kind {
            EntityKind::Student => self.persons.subscribe(observer),
            EntityKind::Session => self.sessions.subscribe(observer),
            EntityKind::AttendanceRecord => self.attendance.subscribe(observer),
        }
    }

    pub fn persons(&self) -> &[Person] {
        self.persons.as_slice()
    }

    pub fn sessions(&self) -> &[Session] {
        self.sessions.as_slice()
    }

    pub fn attendance_records(&self) -> &[AttendanceRecord] {
        self.attendance.as_slice()
    }

    pub fn person(&self, id: PersonId) -> Option<&Person> {
        self.persons.iter().find(|person| person.id() == id)
    }

    pub fn session(&self, id: SessionId) -> Option<&Session> {
        self.sessions.iter().find(|session| session.id() == id)
    }

    pub fn attendance_record(
        &self,
        session_id: SessionId,
        student_id: PersonId,
    ) -> Option<&AttendanceRecord> {
        self.attendance
            .iter()
            .find(|record| record.key() == (session_id, student_id))
    }

    /// Returns whether a student equivalent to `person` is stored.
    pub fn has_person(&self, person: &Person) -> bool {
        self.persons.contains(person)
    }

    pub fn has_session(&self, session: &Session) -> bool {
        self.sessions.contains(session)
    }

    /// Sessions booked for `student_id`, chronologically.
    pub fn sessions_of(&self, student_id: PersonId) -> Vec<&Session> {
        self.sessions
            .iter()
            .filter(|session| session.is_for_student(student_id))
            .collect()
    }

    /// Attendance records of one session, ordered by student id.
    pub fn records_of_session(&self, session_id: SessionId) -> Vec<&AttendanceRecord> {
        self.attendance
            .iter()
            .filter(|record| record.references_session(session_id))
            .collect()
    }

    /// Resolves a student reference.
    ///
    /// `ById` tries the id first and falls back to a name match on the same
    /// digits. An exact-case name match wins; otherwise the name must match
    /// exactly one student ignoring ASCII case.
    ///
    /// # Errors
    /// - `EntityNotFound` when nothing matches.
    /// - `AmbiguousIdentity` when several students match by name.
    pub fn person_by_identity(&self, identity: &Identity) -> BookResult<&Person> {
        match identity {
            Identity::ById(id) => match self.person(PersonId::new(*id)) {
                Some(person) => Ok(person),
                None => self.person_named(&id.to_string(), identity),
            },
            Identity::ByName(name) => self.person_named(name.as_str(), identity),
        }
    }

    pub fn session_by_id(&self, id: SessionId) -> BookResult<&Session> {
        self.session(id).ok_or_else(|| BookError::EntityNotFound {
            kind: EntityKind::Session,
            reference: id.to_string(),
        })
    }

    /// Adds a student, assigning the next id when it has none.
    ///
    /// The id counter only moves once the student is stored.
    pub fn add_person(&mut self, person: Person) -> BookResult<PersonId> {
        let id = candidate_id(person.id(), self.next_person_id, EntityKind::Student)?;
        if self.person(id).is_some() {
            return Err(BookError::duplicate(EntityKind::Student));
        }

        self.persons
            .add(person.with_id(id))
            .map_err(BookError::list(EntityKind::Student))?;
        self.next_person_id = advance(self.next_person_id, id);
        Ok(id)
    }

    /// Replaces `target` with `edited`; both must carry the same id.
    pub fn set_person(&mut self, target: &Person, edited: Person) -> BookResult<()> {
        if target.id() != edited.id() {
            return Err(BookError::IdentityChanged {
                kind: EntityKind::Student,
            });
        }

        self.persons
            .set(target, edited)
            .map_err(BookError::list(EntityKind::Student))
    }

    /// Removes a student with every session booked for them and every
    /// attendance record touching them or those sessions.
    pub fn remove_person(&mut self, id: PersonId) -> BookResult<RemovedPerson> {
        let person = self
            .person(id)
            .cloned()
            .ok_or_else(|| BookError::EntityNotFound {
                kind: EntityKind::Student,
                reference: id.to_string(),
            })?;

        let sessions: Vec<Session> = self.sessions_of(id).into_iter().cloned().collect();
        let session_ids: BTreeSet<SessionId> = sessions.iter().map(Session::id).collect();
        let records: Vec<AttendanceRecord> = self
            .attendance
            .iter()
            .filter(|record| {
                record.references_student(id) || session_ids.contains(&record.session_id())
            })
            .copied()
            .collect();

        for record in &records {
            self.attendance
                .remove(record)
                .map_err(BookError::list(EntityKind::AttendanceRecord))?;
        }
        for session in &sessions {
            self.sessions
                .remove(session)
                .map_err(BookError::list(EntityKind::Session))?;
        }
        self.persons
            .remove(&person)
            .map_err(BookError::list(EntityKind::Student))?;

        info!(
            "event=student_remove module=book status=ok student_id={} cascaded_sessions={} cascaded_records={}",
            id,
            sessions.len(),
            records.len()
        );
        Ok(RemovedPerson {
            person,
            sessions,
            records,
        })
    }

    /// Re-inserts a cascade produced by `remove_person`, all or nothing.
    pub fn restore_person(&mut self, removed: RemovedPerson) -> BookResult<()> {
        let RemovedPerson {
            person,
            sessions,
            records,
        } = removed;
        let person_id = person.id();
        let counters = self.id_counters();

        self.add_person(person)?;
        let mut restored_sessions = Vec::with_capacity(sessions.len());
        for session in sessions {
            let session_id = session.id();
            if let Err(err) = self.add_session(session) {
                self.roll_back(&[], &restored_sessions, Some(person_id), counters);
                return Err(err);
            }
            restored_sessions.push(session_id);
        }
        if let Err(err) = self.add_records(records) {
            self.roll_back(&[], &restored_sessions, Some(person_id), counters);
            return Err(err);
        }

        info!(
            "event=student_restore module=book status=ok student_id={} sessions={}",
            person_id,
            restored_sessions.len()
        );
        Ok(())
    }

    /// Adds a session, assigning the next id when it has none.
    pub fn add_session(&mut self, session: Session) -> BookResult<SessionId> {
        let id = candidate_id(session.id(), self.next_session_id, EntityKind::Session)?;
        if self.session(id).is_some() {
            return Err(BookError::duplicate(EntityKind::Session));
        }
        self.ensure_booked_student_exists(&session)?;

        self.sessions
            .add(session.with_id(id))
            .map_err(BookError::list(EntityKind::Session))?;
        self.next_session_id = advance(self.next_session_id, id);
        Ok(id)
    }

    pub fn set_session(&mut self, target: &Session, edited: Session) -> BookResult<()> {
        if target.id() != edited.id() {
            return Err(BookError::IdentityChanged {
                kind: EntityKind::Session,
            });
        }
        self.ensure_booked_student_exists(&edited)?;

        self.sessions
            .set(target, edited)
            .map_err(BookError::list(EntityKind::Session))
    }

    /// Removes a session with all of its attendance records.
    pub fn remove_session(&mut self, id: SessionId) -> BookResult<RemovedSession> {
        let session = self.session_by_id(id)?.clone();
        let records: Vec<AttendanceRecord> =
            self.records_of_session(id).into_iter().copied().collect();

        for record in &records {
            self.attendance
                .remove(record)
                .map_err(BookError::list(EntityKind::AttendanceRecord))?;
        }
        self.sessions
            .remove(&session)
            .map_err(BookError::list(EntityKind::Session))?;

        info!(
            "event=session_remove module=book status=ok session_id={} cascaded_records={}",
            id,
            records.len()
        );
        Ok(RemovedSession { session, records })
    }

    /// Re-inserts a cascade produced by `remove_session`, all or nothing.
    pub fn restore_session(&mut self, removed: RemovedSession) -> BookResult<()> {
        let RemovedSession { session, records } = removed;
        let counters = self.id_counters();
        let session_id = self.add_session(session)?;
        if let Err(err) = self.add_records(records) {
            self.roll_back(&[], &[session_id], None, counters);
            return Err(err);
        }
        Ok(())
    }

    pub fn add_attendance_record(&mut self, record: AttendanceRecord) -> BookResult<()> {
        self.ensure_record_references_exist(&record)?;
        self.attendance
            .add(record)
            .map_err(BookError::list(EntityKind::AttendanceRecord))
    }

    /// Replaces `target` with `edited`; both must link the same pair.
    pub fn set_attendance_record(
        &mut self,
        target: &AttendanceRecord,
        edited: AttendanceRecord,
    ) -> BookResult<()> {
        if target.key() != edited.key() {
            return Err(BookError::IdentityChanged {
                kind: EntityKind::AttendanceRecord,
            });
        }

        self.attendance
            .set(target, edited)
            .map_err(BookError::list(EntityKind::AttendanceRecord))
    }

    pub fn remove_attendance_record(
        &mut self,
        record: &AttendanceRecord,
    ) -> BookResult<AttendanceRecord> {
        self.attendance
            .remove(record)
            .map_err(BookError::list(EntityKind::AttendanceRecord))
    }

    /// An exact-case match wins; otherwise the name must match exactly one
    /// student ignoring case.
    fn person_named(&self, name: &str, identity: &Identity) -> BookResult<&Person> {
        if let Some(person) = self
            .persons
            .iter()
            .find(|person| person.name().as_str() == name)
        {
            return Ok(person);
        }

        let mut matches = self
            .persons
            .iter()
            .filter(|person| person.name().matches_ignore_case(name));

        match (matches.next(), matches.next()) {
            (Some(person), None) => Ok(person),
            (None, _) => Err(BookError::EntityNotFound {
                kind: EntityKind::Student,
                reference: identity.to_string(),
            }),
            (Some(_), Some(_)) => Err(BookError::AmbiguousIdentity {
                reference: identity.to_string(),
                matches: 2 + matches.count(),
            }),
        }
    }

    fn ensure_booked_student_exists(&self, session: &Session) -> BookResult<()> {
        match session.student_id() {
            Some(student_id) if self.person(student_id).is_none() => {
                Err(BookError::MissingReference {
                    kind: EntityKind::Student,
                    reference: student_id.to_string(),
                })
            }
            _ => Ok(()),
        }
    }

    fn ensure_record_references_exist(&self, record: &AttendanceRecord) -> BookResult<()> {
        if self.session(record.session_id()).is_none() {
            return Err(BookError::MissingReference {
                kind: EntityKind::Session,
                reference: record.session_id().to_string(),
            });
        }
        if self.person(record.student_id()).is_none() {
            return Err(BookError::MissingReference {
                kind: EntityKind::Student,
                reference: record.student_id().to_string(),
            });
        }
        Ok(())
    }

    fn add_records(&mut self, records: Vec<AttendanceRecord>) -> BookResult<()> {
        let mut added: Vec<AttendanceRecord> = Vec::with_capacity(records.len());
        for record in records {
            if let Err(err) = self.add_attendance_record(record) {
                self.roll_back(&added, &[], None, self.id_counters());
                return Err(err);
            }
            added.push(record);
        }
        Ok(())
    }

    fn id_counters(&self) -> IdCounters {
        (self.next_person_id, self.next_session_id)
    }

    /// Undoes a partially applied restore, dependents first, and rewinds the
    /// id counters to `counters`.
    fn roll_back(
        &mut self,
        records: &[AttendanceRecord],
        sessions: &[SessionId],
        person: Option<PersonId>,
        counters: IdCounters,
    ) {
        warn!(
            "event=restore_rollback module=book status=error records={} sessions={}",
            records.len(),
            sessions.len()
        );
        for record in records {
            let _ = self.attendance.remove(record);
        }
        for id in sessions {
            if let Some(session) = self.session(*id).cloned() {
                let _ = self.sessions.remove(&session);
            }
        }
        if let Some(id) = person {
            if let Some(person) = self.person(id).cloned() {
                let _ = self.persons.remove(&person);
            }
        }
        (self.next_person_id, self.next_session_id) = counters;
    }
}

fn ensure_unique_ids<I>(ids: impl Iterator<Item = I>, kind: EntityKind) -> BookResult<()>
where
    I: Ord + Copy + Default,
{
    let mut seen = BTreeSet::new();
    for id in ids.filter(|id| *id != I::default()) {
        if !seen.insert(id) {
            return Err(BookError::duplicate(kind));
        }
    }
    Ok(())
}

/// Id a new entity will be stored under: its own, or the next free one.
fn candidate_id<I: EntityId>(own: I, next: Option<I>, kind: EntityKind) -> BookResult<I> {
    if own.is_assigned() {
        return Ok(own);
    }
    next.ok_or(BookError::IdsExhausted { kind })
}

/// Counter value after `used` has been stored.
fn advance<I: EntityId>(next: Option<I>, used: I) -> Option<I> {
    match (next, used.following()) {
        (Some(next), Some(following)) => Some(next.max(following)),
        _ => None,
    }
}

fn next_free<I: EntityId>(ids: impl Iterator<Item = I>, floor: I) -> Option<I> {
    ids.filter(|id| id.is_assigned())
        .fold(Some(floor), advance)
}

fn assign_missing_ids<T, I: EntityId>(
    items: Vec<T>,
    next: &mut Option<I>,
    kind: EntityKind,
    id_of: fn(&T) -> I,
    with_id: fn(T, I) -> T,
) -> BookResult<Vec<T>> {
    let mut assigned = Vec::with_capacity(items.len());
    for item in items {
        if id_of(&item).is_assigned() {
            assigned.push(item);
            continue;
        }
        let id = next.ok_or(BookError::IdsExhausted { kind })?;
        *next = id.following();
        assigned.push(with_id(item, id));
    }
    Ok(assigned)
}

trait EntityId: Ord + Copy {
    fn is_assigned(self) -> bool;
    fn following(self) -> Option<Self>;
}

impl EntityId for PersonId {
    fn is_assigned(self) -> bool {
        PersonId::is_assigned(self)
    }

    fn following(self) -> Option<Self> {
        self.next()
    }
}

impl EntityId for SessionId {
    fn is_assigned(self) -> bool {
        SessionId::is_assigned(self)
    }

    fn following(self) -> Option<Self> {
        self.next()
    }
}
