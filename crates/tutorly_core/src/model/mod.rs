//! Domain model for students, sessions and attendance.
//!
//! # Responsibility
//! - Define validated field values and entity records.
//! - Own the in-memory repository (`AddressBook`) and its consistency rules.
//!
//! # Invariants
//! - Every entity carries a stable identity token that edits never change.
//! - Field values are validated at construction; invalid input never reaches
//!   an entity.

pub mod address_book;
pub mod attendance;
pub mod fields;
pub mod identity;
pub mod ids;
pub mod person;
pub mod session;
