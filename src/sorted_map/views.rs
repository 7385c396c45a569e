use core::fmt;

use super::{Keys, SortedMap, Values};
use crate::comparator::{Comparator, NaturalOrder};
use crate::error::{Error, Result, check_bounds};

/// A read-only, order-preserving view of a [`SortedMap`]'s keys.
///
/// The view reads through to the live map; it holds no copy of the keys. Its mutating
/// members exist for interface parity with a full collection and always fail with
/// [`Error::Unsupported`].
///
/// ```
/// use redblack_map::{Error, SortedMap};
///
/// let map = SortedMap::from([(3, 'c'), (1, 'a')]);
/// let keys = map.keys();
///
/// assert_eq!(keys.len(), map.len());
/// assert!(keys.contains(&3));
/// assert_eq!(keys.iter().collect::<Vec<_>>(), [&1, &3]);
/// assert!(matches!(keys.clear(), Err(Error::Unsupported { .. })));
/// ```
pub struct KeysView<'a, K, V, C = NaturalOrder> {
    map: &'a SortedMap<K, V, C>,
}

/// A read-only view of a [`SortedMap`]'s values, in key order.
///
/// Like [`KeysView`], it reads through to the live map and rejects every mutation.
///
/// ```
/// use redblack_map::SortedMap;
///
/// let map = SortedMap::from([(2, "two"), (1, "one")]);
/// let values = map.values();
///
/// assert!(values.contains(&"two"));
/// let mut copy = [""; 2];
/// values.copy_to(&mut copy, 0).unwrap();
/// assert_eq!(copy, ["one", "two"]);
/// ```
pub struct ValuesView<'a, K, V, C = NaturalOrder> {
    map: &'a SortedMap<K, V, C>,
}

/// Clones `items` into `destination[offset..]` after checking that all of them fit.
fn copy_checked<'a, T, I>(items: I, destination: &mut [T], offset: usize) -> Result<()>
where
    T: Clone + 'a,
    I: ExactSizeIterator<Item = &'a T>,
{
    check_bounds(offset, destination.len(), items.len())?;
    for (slot, item) in destination[offset..].iter_mut().zip(items) {
        slot.clone_from(item);
    }
    Ok(())
}

impl<'a, K, V, C> KeysView<'a, K, V, C> {
    pub(super) const fn new(map: &'a SortedMap<K, V, C>) -> Self {
        KeysView { map }
    }

    /// Returns the number of keys, which is always the map's [`len`](SortedMap::len).
    #[must_use]
    pub const fn len(&self) -> usize {
        self.map.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterates over the keys in ascending order.
    pub fn iter(&self) -> Keys<'a, K, V> {
        Keys { inner: self.map.iter() }
    }

    /// Clones the keys, in order, into `destination` starting at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bounds`] without writing anything if the keys do not fit.
    pub fn copy_to(&self, destination: &mut [K], offset: usize) -> Result<()>
    where
        K: Clone,
    {
        copy_checked(self.iter(), destination, offset)
    }

    /// Always fails: keys cannot be added through a view.
    ///
    /// # Errors
    ///
    /// Always returns [`Error::Unsupported`].
    #[allow(clippy::unused_self, clippy::needless_pass_by_value)]
    pub fn add(&self, _key: K) -> Result<()> {
        Err(Error::Unsupported { operation: "add" })
    }

    /// Always fails: keys cannot be removed through a view.
    ///
    /// # Errors
    ///
    /// Always returns [`Error::Unsupported`].
    #[allow(clippy::unused_self)]
    pub fn remove(&self, _key: &K) -> Result<bool> {
        Err(Error::Unsupported { operation: "remove" })
    }

    /// Always fails: a view cannot clear its map.
    ///
    /// # Errors
    ///
    /// Always returns [`Error::Unsupported`].
    #[allow(clippy::unused_self)]
    pub fn clear(&self) -> Result<()> {
        Err(Error::Unsupported { operation: "clear" })
    }
}

impl<K, V, C: Comparator<K>> KeysView<'_, K, V, C> {
    /// Returns `true` if the map holds `key`. O(log n).
    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }
}

impl<'a, K, V, C> ValuesView<'a, K, V, C> {
    pub(super) const fn new(map: &'a SortedMap<K, V, C>) -> Self {
        ValuesView { map }
    }

    /// Returns the number of values, which is always the map's [`len`](SortedMap::len).
    #[must_use]
    pub const fn len(&self) -> usize {
        self.map.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterates over the values in the order of their keys.
    pub fn iter(&self) -> Values<'a, K, V> {
        Values { inner: self.map.iter() }
    }

    /// Returns `true` if some entry holds `value`. O(n).
    #[must_use]
    pub fn contains(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.map.contains_value(value)
    }

    /// Returns `true` if some entry's value equals `value` according to `eq`. O(n).
    #[must_use]
    pub fn contains_by<F>(&self, value: &V, eq: F) -> bool
    where
        F: Fn(&V, &V) -> bool,
    {
        self.map.contains_value_by(value, eq)
    }

    /// Clones the values, in key order, into `destination` starting at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bounds`] without writing anything if the values do not fit.
    pub fn copy_to(&self, destination: &mut [V], offset: usize) -> Result<()>
    where
        V: Clone,
    {
        copy_checked(self.iter(), destination, offset)
    }

    /// Always fails: values cannot be added through a view.
    ///
    /// # Errors
    ///
    /// Always returns [`Error::Unsupported`].
    #[allow(clippy::unused_self, clippy::needless_pass_by_value)]
    pub fn add(&self, _value: V) -> Result<()> {
        Err(Error::Unsupported { operation: "add" })
    }

    /// Always fails: values cannot be removed through a view.
    ///
    /// # Errors
    ///
    /// Always returns [`Error::Unsupported`].
    #[allow(clippy::unused_self)]
    pub fn remove(&self, _value: &V) -> Result<bool> {
        Err(Error::Unsupported { operation: "remove" })
    }

    /// Always fails: a view cannot clear its map.
    ///
    /// # Errors
    ///
    /// Always returns [`Error::Unsupported`].
    #[allow(clippy::unused_self)]
    pub fn clear(&self) -> Result<()> {
        Err(Error::Unsupported { operation: "clear" })
    }
}

impl<K, V, C> Clone for KeysView<'_, K, V, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V, C> Copy for KeysView<'_, K, V, C> {}

impl<K, V, C> Clone for ValuesView<'_, K, V, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V, C> Copy for ValuesView<'_, K, V, C> {}

impl<'a, K, V, C> IntoIterator for KeysView<'a, K, V, C> {
    type Item = &'a K;
    type IntoIter = Keys<'a, K, V>;

    fn into_iter(self) -> Keys<'a, K, V> {
        self.iter()
    }
}

impl<'a, K, V, C> IntoIterator for &KeysView<'a, K, V, C> {
    type Item = &'a K;
    type IntoIter = Keys<'a, K, V>;

    fn into_iter(self) -> Keys<'a, K, V> {
        self.iter()
    }
}

impl<'a, K, V, C> IntoIterator for ValuesView<'a, K, V, C> {
    type Item = &'a V;
    type IntoIter = Values<'a, K, V>;

    fn into_iter(self) -> Values<'a, K, V> {
        self.iter()
    }
}

impl<'a, K, V, C> IntoIterator for &ValuesView<'a, K, V, C> {
    type Item = &'a V;
    type IntoIter = Values<'a, K, V>;

    fn into_iter(self) -> Values<'a, K, V> {
        self.iter()
    }
}

impl<K: fmt::Debug, V, C> fmt::Debug for KeysView<'_, K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<K, V: fmt::Debug, C> fmt::Debug for ValuesView<'_, K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
