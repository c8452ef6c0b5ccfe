//! Core domain logic for Tutorly, a tutoring address book.
//! This crate is the single source of truth for roster invariants.

pub mod config;
pub mod logging;
pub mod logic;
pub mod model;
pub mod storage;
pub mod uniquelist;

pub use config::{ConfigError, ConfigResult, CoreConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use logic::command::{
    Command, CommandError, CommandOutcome, CommandOutcomeBuilder, CommandResult, Focus,
};
pub use logic::history::{CommandHistory, DEFAULT_UNDO_LIMIT};
pub use model::address_book::{
    AddressBook, BookError, BookResult, EntityKind, RemovedPerson, RemovedSession,
};
pub use model::attendance::AttendanceRecord;
pub use model::identity::{Identity, IdentityParseError};
pub use model::ids::{PersonId, SessionId};
pub use model::person::Person;
pub use model::session::Session;
pub use storage::{read_address_book, write_address_book, LoadReport, StorageError};
pub use uniquelist::{ListObserver, ListPolicy, UniqueList, UniqueListError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
