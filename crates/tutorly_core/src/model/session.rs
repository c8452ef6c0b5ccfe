//! Tutoring session record.

use crate::model::fields::{FieldError, FieldKind, Subject};
use crate::model::ids::{PersonId, SessionId};
use chrono::NaiveDate;
use std::cmp::Ordering;

/// Wire/input format for session dates.
pub const SESSION_DATE_FORMAT: &str = "%Y-%m-%d";
pub const DATE_MESSAGE_CONSTRAINTS: &str = "Dates should be valid calendar dates in the format YYYY-MM-DD";

/// Parses a session date in `YYYY-MM-DD` form.
pub fn parse_session_date(value: &str) -> Result<NaiveDate, FieldError> {
    NaiveDate::parse_from_str(value, SESSION_DATE_FORMAT)
        .map_err(|_| FieldError::new(FieldKind::Date, DATE_MESSAGE_CONSTRAINTS))
}

/// A scheduled lesson.
///
/// One-to-one sessions reference the student they were booked for; group
/// sessions have no owning student and collect attendees through attendance
/// records only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    id: SessionId,
    date: NaiveDate,
    subject: Subject,
    student_id: Option<PersonId>,
}

impl Session {
    /// Creates a group session without an id.
    pub fn new(date: NaiveDate, subject: Subject) -> Self {
        Self {
            id: SessionId::UNASSIGNED,
            date,
            subject,
            student_id: None,
        }
    }

    /// Books the session for one student.
    pub fn for_student(mut self, student_id: PersonId) -> Self {
        self.student_id = Some(student_id);
        self
    }

    pub fn with_id(mut self, id: SessionId) -> Self {
        self.id = id;
        self
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    pub fn student_id(&self) -> Option<PersonId> {
        self.student_id
    }

    pub fn is_for_student(&self, student_id: PersonId) -> bool {
        self.student_id == Some(student_id)
    }

    /// Uniqueness relation: same day, subject and booked student.
    pub fn is_same_session(&self, other: &Session) -> bool {
        self.date == other.date
            && self.subject == other.subject
            && self.student_id == other.student_id
    }

    /// List order: chronological, ties broken by id.
    pub fn compare_chronologically(&self, other: &Session) -> Ordering {
        self.date
            .cmp(&other.date)
            .then_with(|| self.id.cmp(&other.id))
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_session_date, Session};
    use crate::model::fields::{FieldKind, Subject};
    use crate::model::ids::{PersonId, SessionId};
    use std::cmp::Ordering;

    fn session(id: u32, date: &str, subject: &str) -> Session {
        Session::new(
            parse_session_date(date).expect("valid date"),
            Subject::new(subject).expect("valid subject"),
        )
        .with_id(SessionId::new(id))
    }

    #[test]
    fn parse_session_date_rejects_bad_calendar_dates() {
        assert!(parse_session_date("2025-02-28").is_ok());
        let err = parse_session_date("2025-02-30").expect_err("no 30th of February");
        assert_eq!(err.field, FieldKind::Date);
        assert!(parse_session_date("28/02/2025").is_err());
    }

    #[test]
    fn sessions_order_by_date_then_id() {
        let early = session(7, "2025-01-01", "Math");
        let late = session(1, "2025-03-01", "Math");
        let same_day = session(8, "2025-01-01", "Science");

        assert_eq!(early.compare_chronologically(&late), Ordering::Less);
        assert_eq!(early.compare_chronologically(&same_day), Ordering::Less);
    }

    #[test]
    fn same_session_ignores_id_but_not_owner() {
        let first = session(1, "2025-01-01", "Math");
        let second = session(2, "2025-01-01", "Math");
        assert!(first.is_same_session(&second));

        let booked = second.for_student(PersonId::new(3));
        assert!(!first.is_same_session(&booked));
        assert!(booked.is_for_student(PersonId::new(3)));
    }
}
