use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::FusedIterator;
use core::ops::{ControlFlow, Index};

use crate::comparator::{Comparator, NaturalOrder};
use crate::error::{Error, Result, check_bounds};
use crate::raw::{DuplicatePolicy, InsertOutcome, RawIter, RawRbTree};

mod cursor;
mod views;

pub use cursor::Cursor;
pub use views::{KeysView, ValuesView};

/// An ordered map based on a [red-black tree].
///
/// Keys are kept in ascending order as decided by the map's [`Comparator`]. With the
/// default [`NaturalOrder`] that is the key type's [`Ord`] order; any other total order
/// can be injected with [`SortedMap::with_comparator`].
///
/// Lookups, inserts and removals take O(log n) comparisons: after every structural
/// change the tree is recoloured and rotated so that no root-to-leaf path is more than
/// twice as long as any other.
///
/// The map keeps a *version* that changes whenever a key is added or removed, or the map
/// is cleared. Replacing the value of an existing key is not a structural change and
/// leaves the version alone. A [`Cursor`] captures the version and refuses to continue once
/// it has moved on.
///
/// It is a logic error for a key to be modified in such a way that its ordering relative
/// to any other key changes while it is in the map. The behavior resulting from such a
/// logic error is not specified, but will be encapsulated to the `SortedMap` that observed
/// it and not result in undefined behavior.
///
/// # Examples
///
/// ```
/// use redblack_map::{Error, SortedMap};
///
/// let mut movie_reviews = SortedMap::new();
///
/// movie_reviews.add("Office Space", "Deals with real issues in the workplace.").unwrap();
/// movie_reviews.add("Pulp Fiction", "Masterpiece.").unwrap();
/// movie_reviews.add("The Godfather", "Very enjoyable.").unwrap();
///
/// // `add` never overwrites.
/// assert_eq!(movie_reviews.add("Pulp Fiction", "Meh."), Err(Error::DuplicateKey));
///
/// // `insert` does, and hands back the old value.
/// assert_eq!(movie_reviews.insert("Pulp Fiction", "Still a masterpiece."), Some("Masterpiece."));
///
/// if !movie_reviews.contains_key(&"Les Miserables") {
///     println!("We've got {} reviews, but Les Miserables ain't one.", movie_reviews.len());
/// }
///
/// assert!(movie_reviews.remove(&"Office Space"));
///
/// for (movie, review) in &movie_reviews {
///     println!("{movie}: \"{review}\"");
/// }
/// ```
///
/// [red-black tree]: https://en.wikipedia.org/wiki/Red%E2%80%93black_tree
pub struct SortedMap<K, V, C = NaturalOrder> {
    raw: RawRbTree<K, V, C>,
}

/// An iterator over the entries of a `SortedMap`, in key order.
///
/// This `struct` is created by the [`iter`] method on [`SortedMap`].
///
/// ```
/// use redblack_map::SortedMap;
///
/// let map = SortedMap::from([(1, "a"), (2, "b")]);
/// let mut iter = map.iter();
/// assert_eq!(iter.next(), Some((&1, &"a")));
/// assert_eq!(iter.next_back(), Some((&2, &"b")));
/// assert_eq!(iter.next(), None);
/// ```
///
/// [`iter`]: SortedMap::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, K, V> {
    inner: RawIter<'a, K, V>,
}

/// An iterator over the keys of a `SortedMap`, created by [`KeysView::iter`].
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

/// An iterator over the values of a `SortedMap`, created by [`ValuesView::iter`].
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

/// An owning iterator over the entries of a `SortedMap`, sorted by key.
pub struct IntoIter<K, V> {
    inner: alloc::vec::IntoIter<(K, V)>,
}

impl<K, V> SortedMap<K, V> {
    /// Makes a new, empty `SortedMap` ordered by [`NaturalOrder`].
    ///
    /// Does not allocate anything on its own.
    ///
    /// # Examples
    ///
    /// ```
    /// use redblack_map::SortedMap;
    ///
    /// let mut map = SortedMap::new();
    /// map.insert(1, "a");
    /// ```
    #[must_use]
    pub const fn new() -> Self {
        Self::with_comparator(NaturalOrder)
    }

    /// Creates an empty map with room for at least `capacity` entries.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_comparator(capacity, NaturalOrder)
    }
}

impl<K, V, C> SortedMap<K, V, C> {
    /// Makes a new, empty `SortedMap` ordered by `comparator`.
    ///
    /// # Examples
    ///
    /// ```
    /// use redblack_map::SortedMap;
    ///
    /// let mut map = SortedMap::with_comparator(|a: &&str, b: &&str| a.len().cmp(&b.len()));
    /// map.insert("ccc", 3);
    /// map.insert("a", 1);
    /// map.insert("bb", 2);
    /// assert_eq!(map.values().iter().copied().collect::<Vec<_>>(), [1, 2, 3]);
    /// ```
    #[must_use]
    pub const fn with_comparator(comparator: C) -> Self {
        SortedMap {
            raw: RawRbTree::new(comparator, DuplicatePolicy::Overwrite),
        }
    }

    /// Creates an empty map ordered by `comparator` with room for at least `capacity` entries.
    #[must_use]
    pub fn with_capacity_and_comparator(capacity: usize, comparator: C) -> Self {
        SortedMap {
            raw: RawRbTree::with_capacity(capacity, comparator, DuplicatePolicy::Overwrite),
        }
    }

    /// Creates a map holding the same entries as `source`, sharing its comparator.
    ///
    /// The source's tree is copied node for node, so no key is compared and the cost is
    /// O(n) rather than the O(n log n) of inserting every pair again.
    ///
    /// # Examples
    ///
    /// ```
    /// use redblack_map::SortedMap;
    ///
    /// let source = SortedMap::from([(5, 'e'), (3, 'c'), (8, 'h')]);
    /// let copy = SortedMap::from_map(&source);
    /// assert_eq!(copy, source);
    /// ```
    #[must_use]
    pub fn from_map(source: &SortedMap<K, V, C>) -> Self
    where
        K: Clone,
        V: Clone,
        C: Clone,
    {
        SortedMap {
            raw: source.raw.adopt(),
        }
    }

    /// Returns the number of entries in the map.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the map contains no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Returns how many entries the map can hold before reallocating its node storage.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// Returns the comparator that orders this map's keys.
    #[must_use]
    pub const fn comparer(&self) -> &C {
        self.raw.comparator()
    }

    /// Removes every entry. Always a structural change, even on an empty map.
    ///
    /// # Examples
    ///
    /// ```
    /// use redblack_map::SortedMap;
    ///
    /// let mut a = SortedMap::from([(1, "a")]);
    /// a.clear();
    /// assert!(a.is_empty());
    /// ```
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Returns the entry with the smallest key.
    #[must_use]
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.raw.first().map(|handle| {
            let node = self.raw.node(handle);
            (&node.key, &node.value)
        })
    }

    /// Returns the entry with the largest key.
    #[must_use]
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.raw.last().map(|handle| {
            let node = self.raw.node(handle);
            (&node.key, &node.value)
        })
    }

    /// Removes and returns the entry with the smallest key.
    ///
    /// # Examples
    ///
    /// ```
    /// use redblack_map::SortedMap;
    ///
    /// let mut map = SortedMap::from([(2, 'b'), (1, 'a')]);
    /// assert_eq!(map.pop_first(), Some((1, 'a')));
    /// assert_eq!(map.pop_first(), Some((2, 'b')));
    /// assert_eq!(map.pop_first(), None);
    /// ```
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        let handle = self.raw.first()?;
        Some(self.raw.remove_handle(handle))
    }

    /// Removes and returns the entry with the largest key.
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        let handle = self.raw.last()?;
        Some(self.raw.remove_handle(handle))
    }

    /// Returns `true` if some entry holds `value` under `PartialEq`.
    ///
    /// The tree is ordered by key, not by value, so this scans every entry.
    ///
    /// # Complexity
    ///
    /// O(n)
    #[must_use]
    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.contains_value_by(value, <V as PartialEq>::eq)
    }

    /// Returns `true` if some entry's value equals `value` according to `eq`.
    ///
    /// ```
    /// use redblack_map::SortedMap;
    ///
    /// let map = SortedMap::from([(1, "Apple"), (2, "pear")]);
    /// assert!(map.contains_value_by(&"apple", |a, b| a.eq_ignore_ascii_case(b)));
    /// ```
    #[must_use]
    pub fn contains_value_by<F>(&self, value: &V, eq: F) -> bool
    where
        F: Fn(&V, &V) -> bool,
    {
        self.raw
            .walk(|_, candidate| {
                if eq(candidate, value) {
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            })
            .is_break()
    }

    /// Clones every entry, in key order, into `destination` starting at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bounds`] if `offset` is past the end of `destination` or fewer than
    /// [`len`](SortedMap::len) slots remain after it. Nothing is written in that case.
    ///
    /// # Examples
    ///
    /// ```
    /// use redblack_map::{Error, SortedMap};
    ///
    /// let map = SortedMap::from([(2, 'b'), (1, 'a')]);
    /// let mut slots = [(0, ' '); 3];
    /// map.copy_to(&mut slots, 1).unwrap();
    /// assert_eq!(slots, [(0, ' '), (1, 'a'), (2, 'b')]);
    ///
    /// assert!(matches!(map.copy_to(&mut slots, 2), Err(Error::Bounds { .. })));
    /// ```
    pub fn copy_to(&self, destination: &mut [(K, V)], offset: usize) -> Result<()>
    where
        K: Clone,
        V: Clone,
    {
        check_bounds(offset, destination.len(), self.len())?;
        for (slot, (key, value)) in destination[offset..].iter_mut().zip(self.iter()) {
            *slot = (key.clone(), value.clone());
        }
        Ok(())
    }

    /// Gets an iterator over the entries of the map, sorted by key.
    ///
    /// # Complexity
    ///
    /// O(log n) to create the iterator; O(1) amortized per step.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.raw.iter(),
        }
    }

    /// Returns a read-only, order-preserving view of the keys.
    ///
    /// ```
    /// use redblack_map::SortedMap;
    ///
    /// let map = SortedMap::from([(2, "b"), (1, "a")]);
    /// let keys = map.keys();
    /// assert_eq!(keys.len(), 2);
    /// assert!(keys.contains(&1));
    /// assert_eq!(keys.iter().copied().collect::<Vec<_>>(), [1, 2]);
    /// ```
    pub const fn keys(&self) -> KeysView<'_, K, V, C> {
        KeysView::new(self)
    }

    /// Returns a read-only view of the values, in key order.
    pub const fn values(&self) -> ValuesView<'_, K, V, C> {
        ValuesView::new(self)
    }

    /// Returns a cursor positioned before the first entry.
    ///
    /// The cursor does not borrow the map; it is handed the map on every call and fails
    /// with [`Error::InvalidState`] once the map's structure changed after the cursor was
    /// created or last [`reset`](Cursor::reset).
    pub fn cursor(&self) -> Cursor<K, V, C> {
        Cursor::new(self.raw.version())
    }
}

impl<K, V, C: Comparator<K>> SortedMap<K, V, C> {
    /// Builds a map ordered by `comparator` from arbitrary pairs.
    ///
    /// A later pair replaces the value of an earlier pair with an equal key.
    ///
    /// # Complexity
    ///
    /// O(n log n)
    pub fn from_entries_with<I>(entries: I, comparator: C) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut map = SortedMap::with_comparator(comparator);
        map.extend(entries);
        map
    }

    /// Creates a map holding the entries of `source` ordered by `comparator`.
    ///
    /// When `comparator` equals the source's comparator the tree structure is copied as in
    /// [`from_map`](SortedMap::from_map); otherwise every pair is inserted again. If the
    /// new order considers two source keys equal, the later one wins.
    ///
    /// # Examples
    ///
    /// ```
    /// use redblack_map::{NaturalOrder, Reversed, SortedMap};
    ///
    /// let source = SortedMap::from_entries_with([(1, 'a'), (2, 'b')], Reversed(NaturalOrder));
    ///
    /// let same = SortedMap::from_map_with(&source, Reversed(NaturalOrder));
    /// assert_eq!(same.keys().iter().copied().collect::<Vec<_>>(), [2, 1]);
    /// ```
    #[must_use]
    pub fn from_map_with(source: &SortedMap<K, V, C>, comparator: C) -> Self
    where
        K: Clone,
        V: Clone,
        C: Clone + PartialEq,
    {
        if *source.comparer() == comparator {
            return SortedMap::from_map(source);
        }
        SortedMap {
            raw: RawRbTree::rebuild_from(&source.raw, comparator, DuplicatePolicy::Overwrite),
        }
    }

    /// Creates a map holding the entries of `source`, re-sorted under a comparator of a
    /// different type.
    ///
    /// ```
    /// use redblack_map::SortedMap;
    ///
    /// let source = SortedMap::from([(1, 'a'), (2, 'b'), (3, 'c')]);
    /// let reversed = SortedMap::from_map_reordered(&source, |a: &i32, b: &i32| b.cmp(a));
    /// assert_eq!(reversed.values().iter().collect::<String>(), "cba");
    /// ```
    #[must_use]
    pub fn from_map_reordered<C2>(source: &SortedMap<K, V, C2>, comparator: C) -> Self
    where
        K: Clone,
        V: Clone,
    {
        SortedMap {
            raw: RawRbTree::rebuild_from(&source.raw, comparator, DuplicatePolicy::Overwrite),
        }
    }

    /// Adds a new entry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateKey`] if the key is already present; the map is left
    /// unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use redblack_map::{Error, SortedMap};
    ///
    /// let mut map = SortedMap::new();
    /// assert_eq!(map.add(37, "a"), Ok(()));
    /// assert_eq!(map.add(37, "b"), Err(Error::DuplicateKey));
    /// assert_eq!(map[&37], "a");
    /// ```
    pub fn add(&mut self, key: K, value: V) -> Result<()> {
        match self.raw.insert_with_policy(key, value, DuplicatePolicy::Reject) {
            InsertOutcome::Inserted => Ok(()),
            InsertOutcome::Rejected(..) | InsertOutcome::Overwritten(_) => Err(Error::DuplicateKey),
        }
    }

    /// Sets the value stored under `key`, inserting the key if it is absent.
    ///
    /// If the key was present its value is replaced in place and the old value returned.
    /// That replacement is not a structural change: the map's version stays the same and
    /// live cursors keep working.
    ///
    /// # Examples
    ///
    /// ```
    /// use redblack_map::SortedMap;
    ///
    /// let mut map = SortedMap::new();
    /// assert_eq!(map.insert(37, "a"), None);
    /// assert_eq!(map.insert(37, "b"), Some("a"));
    /// assert_eq!(map[&37], "b");
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.raw.insert(key, value) {
            InsertOutcome::Inserted | InsertOutcome::Rejected(..) => None,
            InsertOutcome::Overwritten(old) => Some(old),
        }
    }

    /// Returns a reference to the value stored under `key`.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use redblack_map::SortedMap;
    ///
    /// let map = SortedMap::from([(1, "a")]);
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// assert_eq!(map.get(&2), None);
    /// ```
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.raw.get(key)
    }

    /// Returns the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if the key is absent.
    pub fn value_of(&self, key: &K) -> Result<&V> {
        self.raw.get(key).ok_or(Error::KeyNotFound)
    }

    /// Returns the stored key together with its value.
    #[must_use]
    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        self.raw.get_key_value(key)
    }

    /// Returns a mutable reference to the value stored under `key`.
    ///
    /// Writing through it is a value-only update and leaves the version unchanged.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.raw.get_mut(key)
    }

    /// Returns `true` if the map holds `key`.
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.raw.contains_key(key)
    }

    /// Removes `key`, returning whether it was present.
    ///
    /// # Examples
    ///
    /// ```
    /// use redblack_map::SortedMap;
    ///
    /// let mut map = SortedMap::from([(1, "a")]);
    /// assert!(map.remove(&1));
    /// assert!(!map.remove(&1));
    /// ```
    pub fn remove(&mut self, key: &K) -> bool {
        self.raw.remove(key).is_some()
    }

    /// Removes `key` and returns the stored pair.
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        self.raw.remove(key)
    }
}

impl<K: Clone, V: Clone, C: Clone> Clone for SortedMap<K, V, C> {
    fn clone(&self) -> Self {
        SortedMap::from_map(self)
    }
}

impl<K: Hash, V: Hash, C> Hash for SortedMap<K, V, C> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for (k, v) in self {
            k.hash(state);
            v.hash(state);
        }
    }
}

impl<K: PartialEq, V: PartialEq, C> PartialEq for SortedMap<K, V, C> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<K: Eq, V: Eq, C> Eq for SortedMap<K, V, C> {}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for SortedMap<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, C: Default> Default for SortedMap<K, V, C> {
    fn default() -> Self {
        SortedMap::with_comparator(C::default())
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for SortedMap<K, V> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        SortedMap::from_entries_with(iter, NaturalOrder)
    }
}

impl<K, V, C: Comparator<K>> Extend<(K, V)> for SortedMap<K, V, C> {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<'a, K: Copy, V: Copy, C: Comparator<K>> Extend<(&'a K, &'a V)> for SortedMap<K, V, C> {
    fn extend<T: IntoIterator<Item = (&'a K, &'a V)>>(&mut self, iter: T) {
        for (&k, &v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K: Ord, V, const N: usize> From<[(K, V); N]> for SortedMap<K, V> {
    fn from(arr: [(K, V); N]) -> Self {
        arr.into_iter().collect()
    }
}

impl<K, V, C: Comparator<K>> Index<&K> for SortedMap<K, V, C> {
    type Output = V;

    /// Returns the value stored under `key`.
    ///
    /// # Panics
    ///
    /// Panics if the key is not present. Use [`SortedMap::value_of`] for the fallible form.
    fn index(&self, key: &K) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

impl<'a, K, V, C> IntoIterator for &'a SortedMap<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<K, V, C> IntoIterator for SortedMap<K, V, C> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    /// Gets an owning iterator over the entries of the map, sorted by key.
    ///
    /// ```
    /// use redblack_map::SortedMap;
    ///
    /// let map = SortedMap::from([(2, "b"), (1, "a")]);
    /// assert_eq!(map.into_iter().collect::<Vec<_>>(), [(1, "a"), (2, "b")]);
    /// ```
    fn into_iter(mut self) -> IntoIter<K, V> {
        IntoIter {
            inner: self.raw.drain_to_vec().into_iter(),
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            inner: self.inner.clone(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Keys<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, _)| k)
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

impl<K, V> FusedIterator for Keys<'_, K, V> {}

impl<K, V> Clone for Keys<'_, K, V> {
    fn clone(&self) -> Self {
        Keys {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Values<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, v)| v)
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

impl<K, V> FusedIterator for Values<'_, K, V> {}

impl<K, V> Clone for Values<'_, K, V> {
    fn clone(&self) -> Self {
        Values {
            inner: self.inner.clone(),
        }
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<(K, V)> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<(K, V)> {
        self.inner.next_back()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

impl<K, V> FusedIterator for IntoIter<K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for IntoIter<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.as_slice()).finish()
    }
}
