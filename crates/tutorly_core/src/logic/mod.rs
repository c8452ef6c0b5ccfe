//! Command layer.
//!
//! # Responsibility
//! - Validate user intents against the address book and apply them.
//! - Produce user-facing feedback, a UI focus hint and a reverse command.
//! - Keep an undo stack of reverse commands.
//!
//! # Invariants
//! - Commands validate before mutating; rejection leaves the book unchanged.
//! - Commands are executed one at a time by the owner of the address book.

pub mod attendance;
pub mod command;
pub mod history;
pub mod messages;
pub mod session;
pub mod student;
