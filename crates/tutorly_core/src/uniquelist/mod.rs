//! Generic uniqueness-enforcing ordered list.
//!
//! # Responsibility
//! - Back every entity collection (students, sessions, attendance records).
//! - Enforce a caller-defined equivalence relation for duplicate detection.
//! - Keep elements sorted by a caller-defined order after every mutation.
//!
//! # Invariants
//! - No two stored elements are equivalent.
//! - The list is sorted by the policy comparator after `add`/`set`/`set_all`.
//! - Removal and replacement targets match by `PartialEq`, never by
//!   equivalence.
//! - A failed operation leaves the list untouched and notifies nobody.

mod observer;
mod unique_list;

pub use observer::{ChangeKind, ListChange, ListObserver};
pub use unique_list::{ListPolicy, ListResult, UniqueList, UniqueListError};
