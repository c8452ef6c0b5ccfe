//! Undo stack built from reverse commands.

use crate::logic::command::{Command, CommandError, CommandOutcome, CommandResult};
use crate::model::address_book::AddressBook;
use log::{debug, warn};
use std::collections::VecDeque;

pub const DEFAULT_UNDO_LIMIT: usize = 50;

/// Executes commands and remembers how to undo them.
///
/// # Invariants
/// - At most `limit` reverse commands are kept; the oldest is dropped first.
/// - A rejected command leaves the stack untouched.
#[derive(Debug)]
pub struct CommandHistory {
    undo_stack: VecDeque<Box<dyn Command>>,
    limit: usize,
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self::new(DEFAULT_UNDO_LIMIT)
    }
}

impl CommandHistory {
    /// Creates a history keeping at most `limit` undo steps (minimum 1).
    pub fn new(limit: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            limit: limit.max(1),
        }
    }

    /// Executes `command` and records its reverse.
    ///
    /// The returned outcome no longer carries the reverse command; it now
    /// lives on the undo stack.
    pub fn execute(
        &mut self,
        command: &dyn Command,
        book: &mut AddressBook,
    ) -> CommandResult<CommandOutcome> {
        let mut outcome = command.execute(book).inspect_err(|err| {
            debug!("event=command_reject module=history reason=\"{err}\"");
        })?;

        if let Some(reverse) = outcome.take_reverse() {
            if self.undo_stack.len() == self.limit {
                self.undo_stack.pop_front();
            }
            self.undo_stack.push_back(reverse);
        }
        Ok(outcome)
    }

    /// Undoes the most recent reversible command.
    ///
    /// # Errors
    /// - `NothingToUndo` when the stack is empty.
    /// - Any error of the reverse command; the entry is discarded either way.
    pub fn undo(&mut self, book: &mut AddressBook) -> CommandResult<CommandOutcome> {
        let reverse = self
            .undo_stack
            .pop_back()
            .ok_or(CommandError::NothingToUndo)?;

        match reverse.execute(book) {
            Ok(mut outcome) => {
                outcome.take_reverse();
                debug!(
                    "event=undo module=history status=ok remaining={}",
                    self.undo_stack.len()
                );
                Ok(outcome)
            }
            Err(err) => {
                warn!("event=undo module=history status=error error=\"{err}\"");
                Err(err)
            }
        }
    }

    pub fn len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.undo_stack.is_empty()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
    }
}
