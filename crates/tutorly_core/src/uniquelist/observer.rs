//! Change notifications emitted by `UniqueList` after successful mutations.

/// Mutation category carried by a [`ListChange`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Added,
    Replaced,
    Removed,
    /// Whole contents replaced through `set_all`.
    Reset,
    Cleared,
}

/// Notification payload delivered to observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListChange {
    pub kind: ChangeKind,
    /// Number of elements after the mutation.
    pub len: usize,
}

/// Receiver for list change notifications (UI refresh hooks).
///
/// Observers run synchronously on the mutating thread, after the list has
/// reached its new consistent state.
pub trait ListObserver {
    fn on_change(&self, change: ListChange);
}

impl<F> ListObserver for F
where
    F: Fn(ListChange),
{
    fn on_change(&self, change: ListChange) {
        self(change)
    }
}
