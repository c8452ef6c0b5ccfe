//! Attendance record linking one student to one session.

use crate::model::ids::{PersonId, SessionId};
use std::cmp::Ordering;

/// Presence of one student at one session.
///
/// The `(session_id, student_id)` pair is the record's identity; at most one
/// record exists per pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttendanceRecord {
    session_id: SessionId,
    student_id: PersonId,
    is_present: bool,
}

impl AttendanceRecord {
    pub fn new(session_id: SessionId, student_id: PersonId, is_present: bool) -> Self {
        Self {
            session_id,
            student_id,
            is_present,
        }
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn student_id(&self) -> PersonId {
        self.student_id
    }

    pub fn is_present(&self) -> bool {
        self.is_present
    }

    pub fn key(&self) -> (SessionId, PersonId) {
        (self.session_id, self.student_id)
    }

    /// Returns the same record with presence set to `is_present`.
    pub fn with_presence(self, is_present: bool) -> Self {
        Self { is_present, ..self }
    }

    pub fn references_student(&self, student_id: PersonId) -> bool {
        self.student_id == student_id
    }

    pub fn references_session(&self, session_id: SessionId) -> bool {
        self.session_id == session_id
    }

    /// Uniqueness relation: same session and student.
    pub fn is_same_record(&self, other: &AttendanceRecord) -> bool {
        self.key() == other.key()
    }

    /// List order: by session, then by student.
    pub fn compare_by_key(&self, other: &AttendanceRecord) -> Ordering {
        self.key().cmp(&other.key())
    }
}
