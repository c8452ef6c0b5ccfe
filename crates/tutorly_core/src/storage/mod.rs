//! Persistence adapters.
//!
//! # Responsibility
//! - Convert the address book to and from its on-disk JSON representation.
//! - Validate every stored record through the model constructors on load.
//!
//! # Invariants
//! - A loaded book satisfies every address book invariant; records that
//!   cannot be loaded are skipped and reported, never silently repaired.
//! - Writes never leave a partially serialized file behind on a
//!   serialization error; the document is rendered before the file is opened.

pub mod json;

pub use json::{
    read_address_book, write_address_book, LoadReport, SkippedRecord, StorageError,
    StorageResult, StoredAddressBook, StoredAttendance, StoredPerson, StoredSession,
};
