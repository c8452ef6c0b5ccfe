use super::observer::{ChangeKind, ListChange, ListObserver};
use std::cmp::Ordering;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::rc::Rc;

pub type ListResult<T> = Result<T, UniqueListError>;

/// Errors raised by `UniqueList` mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueListError {
    /// Element is equivalent to one already stored.
    DuplicateElement,
    /// No stored element equals the requested target.
    ElementNotFound,
}

impl Display for UniqueListError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateElement => write!(f, "operation would result in duplicate elements"),
            Self::ElementNotFound => write!(f, "element not found in list"),
        }
    }
}

impl Error for UniqueListError {}

/// Equivalence and order configuration for one `UniqueList`.
pub struct ListPolicy<T> {
    /// "Same logical entity" test used for duplicate detection.
    pub equivalent: fn(&T, &T) -> bool,
    /// Sort order maintained after every mutation.
    pub compare: fn(&T, &T) -> Ordering,
}

impl<T> ListPolicy<T> {
    pub fn new(equivalent: fn(&T, &T) -> bool, compare: fn(&T, &T) -> Ordering) -> Self {
        Self {
            equivalent,
            compare,
        }
    }
}

impl<T: PartialEq> Default for ListPolicy<T> {
    /// Equivalence falls back to `PartialEq`; insertion order is kept.
    fn default() -> Self {
        Self::new(equal_elements::<T>, insertion_order::<T>)
    }
}

impl<T> Clone for ListPolicy<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ListPolicy<T> {}

fn equal_elements<T: PartialEq>(left: &T, right: &T) -> bool {
    left == right
}

fn insertion_order<T>(_: &T, _: &T) -> Ordering {
    Ordering::Equal
}

/// Ordered list that rejects equivalent elements.
///
/// Mutation goes only through `add`, `set`, `remove`, `set_all` and `clear`;
/// readers get shared slices or iterators.
pub struct UniqueList<T> {
    items: Vec<T>,
    policy: ListPolicy<T>,
    observers: Vec<Rc<dyn ListObserver>>,
}

impl<T: PartialEq> Default for UniqueList<T> {
    fn default() -> Self {
        Self::new(ListPolicy::default())
    }
}

impl<T: PartialEq> UniqueList<T> {
    pub fn new(policy: ListPolicy<T>) -> Self {
        Self {
            items: Vec::new(),
            policy,
            observers: Vec::new(),
        }
    }

    /// Returns whether an element equivalent to `candidate` is stored.
    pub fn contains(&self, candidate: &T) -> bool {
        self.find(candidate).is_some()
    }

    /// Returns the first stored element equivalent to `candidate`, in list order.
    pub fn find(&self, candidate: &T) -> Option<&T> {
        let equivalent = self.policy.equivalent;
        self.items.iter().find(|&item| equivalent(item, candidate))
    }

    /// Adds one element and re-sorts.
    ///
    /// # Errors
    /// - `DuplicateElement` when an equivalent element is already stored.
    pub fn add(&mut self, element: T) -> ListResult<()> {
        if self.contains(&element) {
            return Err(UniqueListError::DuplicateElement);
        }

        self.items.push(element);
        self.sort();
        self.notify(ChangeKind::Added);
        Ok(())
    }

    /// Replaces `target` with `edited` and re-sorts.
    ///
    /// # Errors
    /// - `ElementNotFound` when no stored element equals `target`.
    /// - `DuplicateElement` when `edited` is equivalent to a stored element
    ///   other than `target`.
    pub fn set(&mut self, target: &T, edited: T) -> ListResult<()> {
        let index = self
            .position_of(target)
            .ok_or(UniqueListError::ElementNotFound)?;

        let equivalent = self.policy.equivalent;
        let clashes = self
            .items
            .iter()
            .enumerate()
            .any(|(position, item)| position != index && equivalent(item, &edited));
        if clashes {
            return Err(UniqueListError::DuplicateElement);
        }

        self.items[index] = edited;
        self.sort();
        self.notify(ChangeKind::Replaced);
        Ok(())
    }

    /// Removes and returns the element equal to `target`.
    ///
    /// Removal cannot break ordering, so no re-sort happens.
    ///
    /// # Errors
    /// - `ElementNotFound` when no stored element equals `target`; an
    ///   equivalent-but-different element is left in place.
    pub fn remove(&mut self, target: &T) -> ListResult<T> {
        let index = self
            .position_of(target)
            .ok_or(UniqueListError::ElementNotFound)?;

        let removed = self.items.remove(index);
        self.notify(ChangeKind::Removed);
        Ok(removed)
    }

    /// Replaces the whole contents with `replacement`.
    ///
    /// Uniqueness is checked pairwise (quadratic), which is fine for roster
    /// sized collections.
    ///
    /// # Errors
    /// - `DuplicateElement` when two replacement elements are equivalent;
    ///   previous contents are kept.
    pub fn set_all(&mut self, replacement: Vec<T>) -> ListResult<()> {
        if !self.elements_are_unique(&replacement) {
            return Err(UniqueListError::DuplicateElement);
        }

        self.items = replacement;
        self.sort();
        self.notify(ChangeKind::Reset);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.notify(ChangeKind::Cleared);
    }

    /// Registers an observer notified after every successful mutation.
    pub fn subscribe(&mut self, observer: Rc<dyn ListObserver>) {
        self.observers.push(observer);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// Read-only view of the current contents in list order.
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Consumes the list, returning its elements in list order.
    pub fn into_vec(self) -> Vec<T> {
        self.items
    }

    fn position_of(&self, target: &T) -> Option<usize> {
        self.items.iter().position(|item| item == target)
    }

    fn elements_are_unique(&self, candidates: &[T]) -> bool {
        let equivalent = self.policy.equivalent;
        candidates.iter().enumerate().all(|(index, left)| {
            candidates[index + 1..]
                .iter()
                .all(|right| !equivalent(left, right))
        })
    }

    fn sort(&mut self) {
        // `sort_by` is stable: elements the comparator ties keep their
        // relative positions.
        self.items.sort_by(self.policy.compare);
    }

    fn notify(&self, kind: ChangeKind) {
        let change = ListChange {
            kind,
            len: self.items.len(),
        };
        for observer in &self.observers {
            observer.on_change(change);
        }
    }
}

impl<'a, T> IntoIterator for &'a UniqueList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: PartialEq> PartialEq for UniqueList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl<T: Debug> Debug for UniqueList<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.items.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{ListPolicy, UniqueList, UniqueListError};

    #[derive(Debug, Clone, PartialEq)]
    struct Entry {
        key: &'static str,
        rank: u32,
    }

    fn entry(key: &'static str, rank: u32) -> Entry {
        Entry { key, rank }
    }

    fn ranked_policy() -> ListPolicy<Entry> {
        ListPolicy::new(
            |left: &Entry, right: &Entry| left.key == right.key,
            |left: &Entry, right: &Entry| left.rank.cmp(&right.rank),
        )
    }

    #[test]
    fn default_policy_keeps_insertion_order() {
        let mut list = UniqueList::default();
        list.add(3).expect("add 3");
        list.add(1).expect("add 1");
        list.add(2).expect("add 2");
        assert_eq!(list.as_slice(), &[3, 1, 2]);
    }

    #[test]
    fn add_sorts_by_policy_comparator() {
        let mut list = UniqueList::new(ranked_policy());
        list.add(entry("c", 3)).expect("add c");
        list.add(entry("a", 1)).expect("add a");
        list.add(entry("b", 2)).expect("add b");

        let keys: Vec<_> = list.iter().map(|item| item.key).collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
    }

    #[test]
    fn ties_keep_relative_order() {
        let mut list = UniqueList::new(ranked_policy());
        list.add(entry("first", 1)).expect("add first");
        list.add(entry("second", 1)).expect("add second");
        list.add(entry("zero", 0)).expect("add zero");

        let keys: Vec<_> = list.iter().map(|item| item.key).collect();
        assert_eq!(keys, vec!["zero", "first", "second"]);
    }

    #[test]
    fn set_allows_edit_equivalent_to_target_itself() {
        let mut list = UniqueList::new(ranked_policy());
        let original = entry("a", 1);
        list.add(original.clone()).expect("add a");

        list.set(&original, entry("a", 5)).expect("self-equivalent edit");
        assert_eq!(list.as_slice(), &[entry("a", 5)]);
    }

    #[test]
    fn set_with_unknown_target_fails() {
        let mut list = UniqueList::new(ranked_policy());
        list.add(entry("a", 1)).expect("add a");

        let err = list
            .set(&entry("a", 2), entry("b", 2))
            .expect_err("target equivalent but not equal must not match");
        assert_eq!(err, UniqueListError::ElementNotFound);
    }

    #[test]
    fn set_reorders_after_replacement() {
        let mut list = UniqueList::new(ranked_policy());
        let first = entry("a", 1);
        list.add(first.clone()).expect("add a");
        list.add(entry("b", 2)).expect("add b");

        list.set(&first, entry("a", 9)).expect("move a to the end");
        let keys: Vec<_> = list.iter().map(|item| item.key).collect();
        assert_eq!(keys, vec!["b", "a"]);
    }

    #[test]
    fn clear_empties_list() {
        let mut list = UniqueList::new(ranked_policy());
        list.add(entry("a", 1)).expect("add a");
        list.clear();
        assert!(list.is_empty());
        assert_eq!(list.len(), 0);
    }

    #[test]
    fn comparator_output_is_a_fixed_point() {
        let mut list = UniqueList::new(ranked_policy());
        for (key, rank) in [("d", 4), ("b", 2), ("a", 1), ("c", 3)] {
            list.add(entry(key, rank)).expect("add");
        }

        let mut resorted = list.as_slice().to_vec();
        resorted.sort_by(|left, right| left.rank.cmp(&right.rank));
        assert_eq!(resorted.as_slice(), list.as_slice());
    }
}
