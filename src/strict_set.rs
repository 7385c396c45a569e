use core::fmt;
use core::iter::FusedIterator;

use crate::comparator::{Comparator, NaturalOrder};
use crate::error::{Error, Result, check_bounds};
use crate::raw::{DuplicatePolicy, InsertOutcome, RawIter, RawRbTree};

/// An ordered set that refuses duplicates loudly.
///
/// `StrictSet` runs on the same red-black engine as [`SortedMap`](crate::SortedMap), with the
/// engine's duplicate policy fixed to *reject*. Where an ordinary set treats inserting an
/// element it already holds as a silent no-op, [`StrictSet::insert`] reports
/// [`Error::DuplicateKey`] and leaves the set untouched, so callers that promise uniqueness
/// can detect a violation.
///
/// # Examples
///
/// ```
/// use redblack_map::{Error, StrictSet};
///
/// let mut ids = StrictSet::new();
/// ids.insert(7).unwrap();
/// ids.insert(3).unwrap();
///
/// assert_eq!(ids.insert(7), Err(Error::DuplicateKey));
/// assert_eq!(ids.len(), 2);
/// assert_eq!(ids.iter().copied().collect::<Vec<_>>(), [3, 7]);
/// ```
pub struct StrictSet<T, C = NaturalOrder> {
    raw: RawRbTree<T, (), C>,
}

/// An iterator over the elements of a `StrictSet`, in ascending order.
///
/// This `struct` is created by the [`iter`] method on [`StrictSet`].
///
/// [`iter`]: StrictSet::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, T> {
    inner: RawIter<'a, T, ()>,
}

impl<T> StrictSet<T> {
    /// Makes a new, empty `StrictSet` ordered by [`NaturalOrder`].
    #[must_use]
    pub const fn new() -> Self {
        Self::with_comparator(NaturalOrder)
    }
}

impl<T, C> StrictSet<T, C> {
    /// Makes a new, empty `StrictSet` ordered by `comparator`.
    #[must_use]
    pub const fn with_comparator(comparator: C) -> Self {
        StrictSet {
            raw: RawRbTree::new(comparator, DuplicatePolicy::Reject),
        }
    }

    /// Creates a set holding the same elements as `source` by copying its tree structure.
    ///
    /// No element is compared.
    #[must_use]
    pub fn from_set(source: &StrictSet<T, C>) -> Self
    where
        T: Clone,
        C: Clone,
    {
        StrictSet {
            raw: source.raw.adopt(),
        }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Returns the comparator that orders this set.
    #[must_use]
    pub const fn comparer(&self) -> &C {
        self.raw.comparator()
    }

    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Returns the smallest element.
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.raw.first().map(|handle| &self.raw.node(handle).key)
    }

    /// Returns the largest element.
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.raw.last().map(|handle| &self.raw.node(handle).key)
    }

    pub fn pop_first(&mut self) -> Option<T> {
        let handle = self.raw.first()?;
        Some(self.raw.remove_handle(handle).0)
    }

    pub fn pop_last(&mut self) -> Option<T> {
        let handle = self.raw.last()?;
        Some(self.raw.remove_handle(handle).0)
    }

    /// Gets an iterator that visits the elements in ascending order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.raw.iter(),
        }
    }

    /// Clones every element, in order, into `destination` starting at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bounds`] without writing anything if the elements do not fit.
    pub fn copy_to(&self, destination: &mut [T], offset: usize) -> Result<()>
    where
        T: Clone,
    {
        check_bounds(offset, destination.len(), self.len())?;
        for (slot, value) in destination[offset..].iter_mut().zip(self.iter()) {
            slot.clone_from(value);
        }
        Ok(())
    }
}

impl<T, C: Comparator<T>> StrictSet<T, C> {
    /// Builds a set ordered by `comparator`, failing on the first repeated element.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateKey`] if `values` yields two elements the comparator
    /// considers equal.
    ///
    /// ```
    /// use redblack_map::{Error, NaturalOrder, StrictSet};
    ///
    /// assert!(StrictSet::try_from_iter([3, 1, 2], NaturalOrder).is_ok());
    /// assert_eq!(StrictSet::try_from_iter([3, 1, 3], NaturalOrder).err(), Some(Error::DuplicateKey));
    /// ```
    pub fn try_from_iter<I>(values: I, comparator: C) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
    {
        let mut set = StrictSet::with_comparator(comparator);
        for value in values {
            set.insert(value)?;
        }
        Ok(set)
    }

    /// Adds `value` to the set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateKey`] if an equal element is already present. The set,
    /// including its version, is unchanged in that case.
    pub fn insert(&mut self, value: T) -> Result<()> {
        match self.raw.insert(value, ()) {
            InsertOutcome::Inserted => Ok(()),
            InsertOutcome::Rejected(..) | InsertOutcome::Overwritten(()) => Err(Error::DuplicateKey),
        }
    }

    /// Alias of [`StrictSet::insert`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateKey`] if an equal element is already present.
    pub fn add(&mut self, value: T) -> Result<()> {
        self.insert(value)
    }

    /// Returns `true` if the set holds an element equal to `value`.
    #[must_use]
    pub fn contains(&self, value: &T) -> bool {
        self.raw.contains_key(value)
    }

    /// Returns the stored element equal to `value`.
    #[must_use]
    pub fn get(&self, value: &T) -> Option<&T> {
        self.raw.get_key_value(value).map(|(stored, ())| stored)
    }

    /// Removes `value`, returning whether it was present.
    pub fn remove(&mut self, value: &T) -> bool {
        self.raw.remove(value).is_some()
    }

    /// Removes and returns the stored element equal to `value`.
    pub fn take(&mut self, value: &T) -> Option<T> {
        self.raw.remove(value).map(|(stored, ())| stored)
    }
}

impl<T: Clone, C: Clone> Clone for StrictSet<T, C> {
    fn clone(&self) -> Self {
        StrictSet::from_set(self)
    }
}

impl<T: PartialEq, C> PartialEq for StrictSet<T, C> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq, C> Eq for StrictSet<T, C> {}

impl<T: fmt::Debug, C> fmt::Debug for StrictSet<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T, C: Default> Default for StrictSet<T, C> {
    fn default() -> Self {
        StrictSet::with_comparator(C::default())
    }
}

impl<'a, T, C> IntoIterator for &'a StrictSet<T, C> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        self.inner.next().map(|(value, ())| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(value, ())| value)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter {
            inner: self.inner.clone(),
        }
    }
}
