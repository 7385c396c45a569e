//! Key ordering strategies.
//!
//! A [`SortedMap`](crate::SortedMap) or [`StrictSet`](crate::StrictSet) orders its keys
//! with a value implementing [`Comparator`]. The comparator is stored inside the
//! container, so two containers never share ordering state.

use core::cmp::Ordering;

/// A total order over keys.
///
/// Implementations must be consistent: `compare(a, b)` returns the reverse of
/// `compare(b, a)`, and the relation is transitive. A comparator that breaks these
/// rules produces unspecified (but memory-safe) results.
///
/// Closures of the shape `Fn(&K, &K) -> Ordering` are comparators:
///
/// ```
/// use redblack_map::SortedMap;
///
/// let mut map = SortedMap::with_comparator(|a: &i32, b: &i32| b.cmp(a));
/// map.insert(1, "one");
/// map.insert(2, "two");
/// assert_eq!(map.keys().iter().copied().collect::<Vec<_>>(), [2, 1]);
/// ```
pub trait Comparator<K: ?Sized> {
    /// Three-way comparison of `a` against `b`.
    fn compare(&self, a: &K, b: &K) -> Ordering;
}

/// Orders keys by their [`Ord`] implementation. The default comparator.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct NaturalOrder;

impl<K: Ord + ?Sized> Comparator<K> for NaturalOrder {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

/// Inverts another comparator.
///
/// ```
/// use redblack_map::{NaturalOrder, Reversed, SortedMap};
///
/// let map: SortedMap<_, _, _> = SortedMap::from_entries_with([(1, 'a'), (3, 'c'), (2, 'b')], Reversed(NaturalOrder));
/// assert_eq!(map.values().iter().collect::<String>(), "cba");
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Reversed<C>(pub C);

impl<K: ?Sized, C: Comparator<K>> Comparator<K> for Reversed<C> {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        self.0.compare(b, a)
    }
}

impl<K: ?Sized, F> Comparator<K> for F
where
    F: Fn(&K, &K) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        self(a, b)
    }
}
