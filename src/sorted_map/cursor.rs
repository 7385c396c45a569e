use core::fmt;
use core::marker::PhantomData;

use super::SortedMap;
use crate::comparator::NaturalOrder;
use crate::error::{CursorFault, Error, Result};
use crate::raw::Handle;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum State {
    NotStarted,
    Iterating(Handle),
    Ended,
}

/// A versioned, detached position in a [`SortedMap`]'s key order.
///
/// Unlike [`Iter`](super::Iter), a cursor holds no borrow of the map: every call is handed
/// the map explicitly, so the map can be mutated while a cursor is parked. The cursor
/// remembers the map's version from when it was created or last [`reset`](Cursor::reset),
/// and any later structural change (adding or removing a key, clearing) makes
/// [`move_next`](Cursor::move_next) and [`current`](Cursor::current) fail with
/// [`CursorFault::Modified`]. Replacing the value of an existing key is not structural
/// and does not invalidate the cursor.
///
/// The check happens lazily, at the next call. Every map, and every copy of a map, that
/// has changed at least once carries a version no other map shares, so a cursor handed a
/// different map than the one that created it fails the same way.
///
/// # Examples
///
/// ```
/// use redblack_map::{CursorFault, Error, SortedMap};
///
/// let mut map = SortedMap::from([(1, "a"), (2, "b")]);
/// let mut cursor = map.cursor();
///
/// assert_eq!(cursor.current(&map), Err(Error::InvalidState(CursorFault::NotStarted)));
/// assert_eq!(cursor.move_next(&map), Ok(true));
/// assert_eq!(cursor.current(&map), Ok((&1, &"a")));
///
/// // Value-only update: the cursor keeps going.
/// map.insert(2, "B");
/// assert_eq!(cursor.move_next(&map), Ok(true));
/// assert_eq!(cursor.current(&map), Ok((&2, &"B")));
/// assert_eq!(cursor.move_next(&map), Ok(false));
///
/// // Structural change: the cursor refuses to continue until reset.
/// map.insert(3, "c");
/// assert_eq!(cursor.move_next(&map), Err(Error::InvalidState(CursorFault::Modified)));
/// cursor.reset(&map);
/// assert_eq!(cursor.move_next(&map), Ok(true));
/// ```
pub struct Cursor<K, V, C = NaturalOrder> {
    version: u64,
    state: State,
    _marker: PhantomData<fn(&SortedMap<K, V, C>)>,
}

impl<K, V, C> Cursor<K, V, C> {
    pub(super) const fn new(version: u64) -> Self {
        Cursor {
            version,
            state: State::NotStarted,
            _marker: PhantomData,
        }
    }

    /// Advances to the next entry in key order.
    ///
    /// Returns `Ok(false)`, and stays at the end, once every entry has been visited.
    ///
    /// # Errors
    ///
    /// Returns [`CursorFault::Modified`] if `map` changed structurally since the version was
    /// captured.
    pub fn move_next(&mut self, map: &SortedMap<K, V, C>) -> Result<bool> {
        self.check_version(map)?;

        let next = match self.state {
            State::NotStarted => map.raw.first(),
            State::Iterating(handle) if map.raw.try_node(handle).is_none() => {
                return Err(Error::InvalidState(CursorFault::Modified));
            }
            State::Iterating(handle) => map.raw.successor(handle),
            State::Ended => None,
        };
        self.state = next.map_or(State::Ended, State::Iterating);
        Ok(next.is_some())
    }

    /// Returns the entry the cursor is positioned on.
    ///
    /// # Errors
    ///
    /// Returns [`CursorFault::NotStarted`] before the first [`move_next`](Cursor::move_next),
    /// [`CursorFault::Ended`] after the last one, and [`CursorFault::Modified`] if `map` changed
    /// structurally since the version was captured.
    pub fn current<'a>(&self, map: &'a SortedMap<K, V, C>) -> Result<(&'a K, &'a V)> {
        self.check_version(map)?;

        match self.state {
            State::NotStarted => Err(Error::InvalidState(CursorFault::NotStarted)),
            State::Ended => Err(Error::InvalidState(CursorFault::Ended)),
            State::Iterating(handle) => map
                .raw
                .try_node(handle)
                .map(|node| (&node.key, &node.value))
                .ok_or(Error::InvalidState(CursorFault::Modified)),
        }
    }

    /// Moves the cursor back before the first entry and captures `map`'s current version.
    pub fn reset(&mut self, map: &SortedMap<K, V, C>) {
        self.version = map.raw.version();
        self.state = State::NotStarted;
    }

    fn check_version(&self, map: &SortedMap<K, V, C>) -> Result<()> {
        if map.raw.version() == self.version {
            Ok(())
        } else {
            Err(Error::InvalidState(CursorFault::Modified))
        }
    }
}

impl<K, V, C> Clone for Cursor<K, V, C> {
    fn clone(&self) -> Self {
        Cursor {
            version: self.version,
            state: self.state,
            _marker: PhantomData,
        }
    }
}

impl<K, V, C> fmt::Debug for Cursor<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("version", &self.version)
            .field("state", &self.state)
            .finish()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn drain<K: Copy, V: Copy, C>(cursor: &mut Cursor<K, V, C>, map: &SortedMap<K, V, C>) -> Result<Vec<(K, V)>> {
        let mut seen = Vec::new();
        while cursor.move_next(map)? {
            let (&k, &v) = cursor.current(map)?;
            seen.push((k, v));
        }
        Ok(seen)
    }

    #[test]
    fn walks_in_key_order() {
        let map = SortedMap::from([(3, 'c'), (1, 'a'), (2, 'b')]);
        let mut cursor = map.cursor();
        assert_eq!(drain(&mut cursor, &map), Ok(alloc::vec![(1, 'a'), (2, 'b'), (3, 'c')]));
        assert_eq!(cursor.current(&map), Err(Error::InvalidState(CursorFault::Ended)));
        assert_eq!(cursor.move_next(&map), Ok(false));
    }

    #[test]
    fn empty_map_ends_immediately() {
        let map: SortedMap<i32, i32> = SortedMap::new();
        let mut cursor = map.cursor();
        assert_eq!(cursor.move_next(&map), Ok(false));
        assert_eq!(cursor.current(&map), Err(Error::InvalidState(CursorFault::Ended)));
    }

    #[test]
    fn removal_invalidates_both_calls() {
        let mut map = SortedMap::from([(1, ()), (2, ()), (3, ())]);
        let mut cursor = map.cursor();
        cursor.move_next(&map).unwrap();

        map.remove(&1);
        assert_eq!(cursor.current(&map), Err(Error::InvalidState(CursorFault::Modified)));
        assert_eq!(cursor.move_next(&map), Err(Error::InvalidState(CursorFault::Modified)));
    }

    #[test]
    fn clear_invalidates_even_when_empty() {
        let mut map: SortedMap<i32, i32> = SortedMap::new();
        let cursor = map.cursor();
        map.clear();
        assert_eq!(cursor.clone().move_next(&map), Err(Error::InvalidState(CursorFault::Modified)));
    }

    #[test]
    fn reset_recaptures_version() {
        let mut map = SortedMap::from([(1, 10)]);
        let mut cursor = map.cursor();
        map.add(2, 20).unwrap();
        assert!(cursor.move_next(&map).is_err());

        cursor.reset(&map);
        assert_eq!(drain(&mut cursor, &map), Ok(alloc::vec![(1, 10), (2, 20)]));
    }

    #[test]
    fn replaced_map_with_equal_history_is_refused() {
        let mut map: SortedMap<i32, i32> = (0..7).map(|k| (k, k)).collect();
        let mut cursor = map.cursor();
        assert_eq!(drain(&mut cursor, &map).map(|seen| seen.len()), Ok(7));

        let mut other = SortedMap::new();
        for key in 10..14 {
            other.add(key, key).unwrap();
        }
        for key in 10..13 {
            other.remove(&key);
        }
        map = other;

        assert_eq!(cursor.current(&map), Err(Error::InvalidState(CursorFault::Modified)));
        assert_eq!(cursor.move_next(&map), Err(Error::InvalidState(CursorFault::Modified)));
    }

    #[test]
    fn parked_cursor_refuses_stale_position_in_replacement() {
        let mut map: SortedMap<i32, i32> = (0..7).map(|k| (k, k)).collect();
        let mut cursor = map.cursor();
        for _ in 0..5 {
            cursor.move_next(&map).unwrap();
        }

        map = SortedMap::from([(1, 1)]);
        assert_eq!(cursor.move_next(&map), Err(Error::InvalidState(CursorFault::Modified)));
        assert_eq!(cursor.current(&map), Err(Error::InvalidState(CursorFault::Modified)));
    }

    #[test]
    fn handle_past_the_arena_is_reported_not_followed() {
        let map = SortedMap::from([(1, 1), (2, 2)]);
        let mut cursor = Cursor {
            version: map.raw.version(),
            state: State::Iterating(Handle::from_index(40)),
            _marker: PhantomData,
        };
        assert_eq!(cursor.current(&map), Err(Error::InvalidState(CursorFault::Modified)));
        assert_eq!(cursor.move_next(&map), Err(Error::InvalidState(CursorFault::Modified)));
    }

    #[test]
    fn cursor_on_empty_map_rejects_its_clone_of_another() {
        let source: SortedMap<i32, i32> = (0..5).map(|k| (k, k)).collect();
        let mut map = SortedMap::new();
        let mut cursor = map.cursor();

        map = source.clone();
        assert_eq!(cursor.move_next(&map), Err(Error::InvalidState(CursorFault::Modified)));

        let copy = SortedMap::from_map(&map);
        let mut on_original = map.cursor();
        assert_eq!(on_original.move_next(&copy), Err(Error::InvalidState(CursorFault::Modified)));
    }

    #[test]
    fn value_updates_keep_cursor_valid() {
        let mut map = SortedMap::from([(1, 10), (2, 20)]);
        let mut cursor = map.cursor();
        cursor.move_next(&map).unwrap();

        *map.get_mut(&1).unwrap() = 11;
        map.insert(2, 21);
        assert_eq!(map.add(2, 22), Err(Error::DuplicateKey));

        assert_eq!(cursor.current(&map), Ok((&1, &11)));
        assert_eq!(drain(&mut cursor, &map), Ok(alloc::vec![(2, 21)]));
    }
}
