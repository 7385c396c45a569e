use core::cmp::Ordering;
use core::iter::FusedIterator;
use core::mem;
use core::ops::ControlFlow;
use core::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

use alloc::vec::Vec;
use smallvec::SmallVec;

use super::arena::Arena;
use super::handle::{Handle, Link};
use super::node::{Color, Node, Side};
use crate::comparator::Comparator;

/// What an insert does when the key is already present.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum DuplicatePolicy {
    /// Replace the stored value in place. Not a structural change.
    Overwrite,
    /// Leave the tree untouched and hand the pair back.
    Reject,
}

/// Result of [`RawRbTree::insert_with_policy`].
pub(crate) enum InsertOutcome<K, V> {
    Inserted,
    Overwritten(V),
    Rejected(K, V),
}

/// Source of version stamps, shared by every tree in the process.
///
/// A stamp is never handed out twice until the counter wraps, so two distinct trees
/// that have each changed at least once never report the same version.
static NEXT_STAMP: AtomicUsize = AtomicUsize::new(1);

fn next_stamp() -> u64 {
    NEXT_STAMP.fetch_add(1, AtomicOrdering::Relaxed) as u64
}

/// Traversal stack. Red-black height is at most `2 * log2(n + 1)`, so 64 inline
/// slots cover every tree that fits in a 32-bit handle space.
type Stack = SmallVec<[Handle; 64]>;

/// The red-black tree engine behind `SortedMap` and `StrictSet`.
pub(crate) struct RawRbTree<K, V, C> {
    /// Arena owning every node reachable from `root`.
    nodes: Arena<Node<K, V>>,
    root: Link,
    len: usize,
    /// Restamped on every structural change (insert of a new key, delete, clear) and on
    /// adoption. Zero only for a tree that has never changed.
    version: u64,
    comparator: C,
    policy: DuplicatePolicy,
}

impl<K, V, C> RawRbTree<K, V, C> {
    pub(crate) const fn new(comparator: C, policy: DuplicatePolicy) -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
            len: 0,
            version: 0,
            comparator,
            policy,
        }
    }

    pub(crate) fn with_capacity(capacity: usize, comparator: C, policy: DuplicatePolicy) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            ..Self::new(comparator, policy)
        }
    }

    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    pub(crate) const fn version(&self) -> u64 {
        self.version
    }

    pub(crate) const fn comparator(&self) -> &C {
        &self.comparator
    }

    #[cfg(test)]
    pub(crate) const fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    /// Releases the whole node graph.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.len = 0;
        self.bump_version();
        debug_event!(version = self.version, "tree cleared");
    }

    #[inline]
    pub(crate) fn node(&self, handle: Handle) -> &Node<K, V> {
        self.nodes.get(handle)
    }

    /// Returns the node for a handle that may have been freed.
    #[inline]
    pub(crate) fn try_node(&self, handle: Handle) -> Option<&Node<K, V>> {
        self.nodes.try_get(handle)
    }

    #[inline]
    pub(crate) fn value_mut(&mut self, handle: Handle) -> &mut V {
        &mut self.nodes.get_mut(handle).value
    }

    pub(crate) fn first(&self) -> Link {
        self.root.map(|root| minimum(&self.nodes, root))
    }

    pub(crate) fn last(&self) -> Link {
        self.root.map(|root| maximum(&self.nodes, root))
    }

    pub(crate) fn successor(&self, handle: Handle) -> Link {
        successor(&self.nodes, handle)
    }

    pub(crate) fn iter(&self) -> RawIter<'_, K, V> {
        RawIter {
            nodes: &self.nodes,
            front: self.first(),
            back: self.last(),
            remaining: self.len,
        }
    }

    /// Visits every pair in ascending key order until the visitor breaks.
    ///
    /// Uses an explicit stack rather than recursion, so auxiliary memory is bounded
    /// by the tree height and never grows the call stack.
    pub(crate) fn walk<F>(&self, mut visitor: F) -> ControlFlow<()>
    where
        F: FnMut(&K, &V) -> ControlFlow<()>,
    {
        self.walk_handles(|handle| {
            let node = self.nodes.get(handle);
            visitor(&node.key, &node.value)
        })
    }

    fn walk_handles<F>(&self, mut visitor: F) -> ControlFlow<()>
    where
        F: FnMut(Handle) -> ControlFlow<()>,
    {
        let mut stack = Stack::new();
        let mut current = self.root;

        loop {
            while let Some(handle) = current {
                stack.push(handle);
                current = self.nodes.get(handle).left;
            }
            let Some(handle) = stack.pop() else {
                return ControlFlow::Continue(());
            };
            visitor(handle)?;
            current = self.nodes.get(handle).right;
        }
    }

    /// Moves every pair out in key order, leaving the tree empty.
    pub(crate) fn drain_to_vec(&mut self) -> Vec<(K, V)> {
        let mut order = Vec::with_capacity(self.len);
        let _ = self.walk_handles(|handle| {
            order.push(handle);
            ControlFlow::Continue(())
        });

        let entries: Vec<(K, V)> = order.into_iter().map(|handle| self.nodes.take(handle).into_pair()).collect();
        self.clear();
        entries
    }

    /// Detaches `handle` and restores the red-black invariants.
    ///
    /// A node with two children trades its payload with its in-order successor,
    /// and the successor's slot is the one that is unlinked and freed.
    pub(crate) fn remove_handle(&mut self, target: Handle) -> (K, V) {
        let (left, right) = {
            let node = self.nodes.get(target);
            (node.left, node.right)
        };
        let spliced = match (left, right) {
            (Some(_), Some(right)) => minimum(&self.nodes, right),
            _ => target,
        };

        let (child, parent, color) = {
            let node = self.nodes.get(spliced);
            (node.left.or(node.right), node.parent, node.color)
        };
        if let Some(child) = child {
            self.nodes.get_mut(child).parent = parent;
        }
        self.replace_child(parent, spliced, child);

        let (key, value) = self.nodes.take(spliced).into_pair();
        let removed = if spliced == target {
            (key, value)
        } else {
            let node = self.nodes.get_mut(target);
            (mem::replace(&mut node.key, key), mem::replace(&mut node.value, value))
        };

        if color == Color::Black {
            self.remove_fixup(child, parent);
        }

        self.len -= 1;
        debug_assert_eq!(self.nodes.len(), self.len, "arena and tree disagree on node count");
        self.bump_version();
        trace_event!(len = self.len, version = self.version, "node removed");
        removed
    }

    fn bump_version(&mut self) {
        self.version = next_stamp();
    }

    fn is_red(&self, link: Link) -> bool {
        link.is_some_and(|handle| self.nodes.get(handle).is_red())
    }

    fn set_color(&mut self, link: Link, color: Color) {
        if let Some(handle) = link {
            self.nodes.get_mut(handle).color = color;
        }
    }

    fn child(&self, handle: Handle, side: Side) -> Link {
        self.nodes.get(handle).child(side)
    }

    fn parent(&self, handle: Handle) -> Link {
        self.nodes.get(handle).parent
    }

    /// Points whatever referenced `old` (its parent, or the root) at `new`.
    fn replace_child(&mut self, parent: Link, old: Handle, new: Link) {
        match parent {
            None => self.root = new,
            Some(parent) => {
                let node = self.nodes.get_mut(parent);
                let side = node.side_of(old).expect("`RawRbTree::replace_child()` - `old` is not a child of `parent`!");
                node.set_child(side, new);
            }
        }
    }

    /// Rotates `pivot` down towards `side`; its child on the opposite side takes its place.
    fn rotate(&mut self, pivot: Handle, side: Side) {
        let riser = self
            .child(pivot, side.opposite())
            .expect("`RawRbTree::rotate()` - pivot has no child to rotate up!");
        let inner = self.child(riser, side);

        self.nodes.get_mut(pivot).set_child(side.opposite(), inner);
        if let Some(inner) = inner {
            self.nodes.get_mut(inner).parent = Some(pivot);
        }

        let parent = self.parent(pivot);
        self.nodes.get_mut(riser).parent = parent;
        self.replace_child(parent, pivot, Some(riser));

        self.nodes.get_mut(riser).set_child(side, Some(pivot));
        self.nodes.get_mut(pivot).parent = Some(riser);
    }

    fn insert_fixup(&mut self, mut node: Handle) {
        while let Some(parent) = self.parent(node).filter(|&parent| self.nodes.get(parent).is_red()) {
            // A red node is never the root, so the grandparent exists.
            let grandparent = self.parent(parent).expect("`RawRbTree::insert_fixup()` - red root!");
            let side = self
                .nodes
                .get(grandparent)
                .side_of(parent)
                .expect("`RawRbTree::insert_fixup()` - broken parent link!");
            let uncle = self.child(grandparent, side.opposite());

            if self.is_red(uncle) {
                self.set_color(Some(parent), Color::Black);
                self.set_color(uncle, Color::Black);
                self.set_color(Some(grandparent), Color::Red);
                node = grandparent;
                continue;
            }

            let mut parent = parent;
            if self.child(parent, side.opposite()) == Some(node) {
                // Inner grandchild: straighten the zig-zag first.
                node = parent;
                self.rotate(node, side);
                parent = self.parent(node).expect("`RawRbTree::insert_fixup()` - rotation lost parent!");
            }
            self.set_color(Some(parent), Color::Black);
            self.set_color(Some(grandparent), Color::Red);
            self.rotate(grandparent, side.opposite());
            break;
        }
        self.set_color(self.root, Color::Black);
    }

    /// Restores black-height after a black node was spliced out above `node`.
    ///
    /// `node` may be the nil leaf, so its parent is tracked separately.
    fn remove_fixup(&mut self, mut node: Link, mut parent: Link) {
        while node != self.root && !self.is_red(node) {
            let Some(above) = parent else { break };
            let side = match node {
                Some(handle) => self
                    .nodes
                    .get(above)
                    .side_of(handle)
                    .expect("`RawRbTree::remove_fixup()` - broken parent link!"),
                None if self.child(above, Side::Left).is_none() => Side::Left,
                None => Side::Right,
            };

            // The deficient side lost one black, so the sibling subtree holds at least one.
            let mut sibling = self
                .child(above, side.opposite())
                .expect("`RawRbTree::remove_fixup()` - missing sibling!");

            if self.nodes.get(sibling).is_red() {
                self.set_color(Some(sibling), Color::Black);
                self.set_color(Some(above), Color::Red);
                self.rotate(above, side);
                sibling = self
                    .child(above, side.opposite())
                    .expect("`RawRbTree::remove_fixup()` - missing sibling!");
            }

            let near = self.child(sibling, side);
            let far = self.child(sibling, side.opposite());
            if !self.is_red(near) && !self.is_red(far) {
                self.set_color(Some(sibling), Color::Red);
                node = Some(above);
                parent = self.parent(above);
                continue;
            }

            if !self.is_red(far) {
                self.set_color(near, Color::Black);
                self.set_color(Some(sibling), Color::Red);
                self.rotate(sibling, side.opposite());
                sibling = self
                    .child(above, side.opposite())
                    .expect("`RawRbTree::remove_fixup()` - missing sibling!");
            }

            let above_color = self.nodes.get(above).color;
            self.set_color(Some(sibling), above_color);
            self.set_color(Some(above), Color::Black);
            self.set_color(self.child(sibling, side.opposite()), Color::Black);
            self.rotate(above, side);
            node = self.root;
            parent = None;
        }
        self.set_color(node, Color::Black);
    }
}

impl<K, V, C: Comparator<K>> RawRbTree<K, V, C> {
    /// Descends from the root to the node holding `key`.
    pub(crate) fn find(&self, key: &K) -> Link {
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            current = match self.comparator.compare(key, &node.key) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Some(handle),
            };
        }
        None
    }

    pub(crate) fn get(&self, key: &K) -> Option<&V> {
        self.find(key).map(|handle| &self.nodes.get(handle).value)
    }

    pub(crate) fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        self.find(key).map(|handle| {
            let node = self.nodes.get(handle);
            (&node.key, &node.value)
        })
    }

    pub(crate) fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let handle = self.find(key)?;
        Some(self.value_mut(handle))
    }

    pub(crate) fn contains_key(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// Inserts under the tree's own duplicate policy.
    pub(crate) fn insert(&mut self, key: K, value: V) -> InsertOutcome<K, V> {
        self.insert_with_policy(key, value, self.policy)
    }

    /// Inserts `key`, resolving an existing equal key according to `policy`.
    ///
    /// Only the creation of a new node changes `len` and `version`.
    pub(crate) fn insert_with_policy(&mut self, key: K, value: V, policy: DuplicatePolicy) -> InsertOutcome<K, V> {
        let mut parent = None;
        let mut side = Side::Left;
        let mut current = self.root;

        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            side = match self.comparator.compare(&key, &node.key) {
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
                Ordering::Equal => {
                    return match policy {
                        DuplicatePolicy::Overwrite => InsertOutcome::Overwritten(mem::replace(self.value_mut(handle), value)),
                        DuplicatePolicy::Reject => InsertOutcome::Rejected(key, value),
                    };
                }
            };
            parent = Some(handle);
            current = node.child(side);
        }

        let handle = self.nodes.alloc(Node::new(key, value, parent));
        match parent {
            None => self.root = Some(handle),
            Some(parent) => self.nodes.get_mut(parent).set_child(side, Some(handle)),
        }
        self.insert_fixup(handle);

        self.len += 1;
        debug_assert_eq!(self.nodes.len(), self.len, "arena and tree disagree on node count");
        self.bump_version();
        trace_event!(len = self.len, version = self.version, "node inserted");
        InsertOutcome::Inserted
    }

    pub(crate) fn remove(&mut self, key: &K) -> Option<(K, V)> {
        let handle = self.find(key)?;
        Some(self.remove_handle(handle))
    }

    /// Builds a tree under `comparator` by re-inserting every pair of `source`.
    pub(crate) fn rebuild_from<C2>(source: &RawRbTree<K, V, C2>, comparator: C, policy: DuplicatePolicy) -> Self
    where
        K: Clone,
        V: Clone,
    {
        let mut tree = Self::with_capacity(source.len(), comparator, policy);
        let _ = source.walk(|key, value| {
            // Under a different order two source keys may collide; the later one wins.
            let _ = tree.insert_with_policy(key.clone(), value.clone(), DuplicatePolicy::Overwrite);
            ControlFlow::Continue(())
        });
        debug_event!(len = tree.len, "tree rebuilt under a new comparator");
        tree
    }
}

impl<K: Clone, V: Clone, C: Clone> RawRbTree<K, V, C> {
    /// Copies the node graph slot for slot. No key is compared.
    ///
    /// The copy gets a fresh version, so a cursor taken on `self` is refused by the copy.
    pub(crate) fn adopt(&self) -> Self {
        let tree = Self {
            nodes: self.nodes.clone(),
            root: self.root,
            len: self.len,
            version: next_stamp(),
            comparator: self.comparator.clone(),
            policy: self.policy,
        };
        debug_event!(len = tree.len, version = tree.version, "tree structure adopted");
        tree
    }
}

impl<K: Clone, V: Clone, C: Clone> Clone for RawRbTree<K, V, C> {
    fn clone(&self) -> Self {
        self.adopt()
    }
}

fn minimum<K, V>(nodes: &Arena<Node<K, V>>, mut handle: Handle) -> Handle {
    while let Some(left) = nodes.get(handle).left {
        handle = left;
    }
    handle
}

fn maximum<K, V>(nodes: &Arena<Node<K, V>>, mut handle: Handle) -> Handle {
    while let Some(right) = nodes.get(handle).right {
        handle = right;
    }
    handle
}

fn successor<K, V>(nodes: &Arena<Node<K, V>>, handle: Handle) -> Link {
    if let Some(right) = nodes.get(handle).right {
        return Some(minimum(nodes, right));
    }
    let mut child = handle;
    let mut parent = nodes.get(handle).parent;
    while let Some(above) = parent {
        if nodes.get(above).right != Some(child) {
            break;
        }
        child = above;
        parent = nodes.get(above).parent;
    }
    parent
}

fn predecessor<K, V>(nodes: &Arena<Node<K, V>>, handle: Handle) -> Link {
    if let Some(left) = nodes.get(handle).left {
        return Some(maximum(nodes, left));
    }
    let mut child = handle;
    let mut parent = nodes.get(handle).parent;
    while let Some(above) = parent {
        if nodes.get(above).left != Some(child) {
            break;
        }
        child = above;
        parent = nodes.get(above).parent;
    }
    parent
}

/// Double-ended in-order iterator over the raw tree, following parent links.
pub(crate) struct RawIter<'a, K, V> {
    nodes: &'a Arena<Node<K, V>>,
    front: Link,
    back: Link,
    remaining: usize,
}

impl<'a, K, V> Iterator for RawIter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let handle = self.front?;
        self.front = successor(self.nodes, handle);
        self.remaining -= 1;

        let node = self.nodes.get(handle);
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> DoubleEndedIterator for RawIter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let handle = self.back?;
        self.back = predecessor(self.nodes, handle);
        self.remaining -= 1;

        let node = self.nodes.get(handle);
        Some((&node.key, &node.value))
    }
}

impl<K, V> ExactSizeIterator for RawIter<'_, K, V> {}

impl<K, V> FusedIterator for RawIter<'_, K, V> {}

impl<K, V> Clone for RawIter<'_, K, V> {
    fn clone(&self) -> Self {
        Self { ..*self }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::comparator::NaturalOrder;
    use alloc::collections::BTreeMap;
    use alloc::string::String;
    use alloc::vec;
    use proptest::prelude::*;

    impl<K, V, C: Comparator<K>> RawRbTree<K, V, C> {
        /// Checks ordering, parent links, colouring, black-height, `len` and the
        /// height bound. Panics listing every violation found.
        pub(crate) fn validate_invariants(&self) {
            let mut errors: Vec<String> = Vec::new();

            if let Some(root) = self.root {
                let node = self.nodes.get(root);
                if node.parent.is_some() {
                    errors.push("root has a parent".into());
                }
                if node.is_red() {
                    errors.push("root is red".into());
                }
            }

            let mut count = 0usize;
            self.validate_node(self.root, None, &mut count, &mut errors);

            if count != self.len {
                errors.push(alloc::format!("len mismatch: self.len={}, reachable={}", self.len, count));
            }
            if self.nodes.len() != self.len {
                errors.push(alloc::format!("arena holds {} live slots, len is {}", self.nodes.len(), self.len));
            }

            let mut previous: Option<&K> = None;
            for (key, _) in self.iter() {
                if let Some(previous) = previous
                    && self.comparator.compare(previous, key) != Ordering::Less
                {
                    errors.push("in-order walk is not strictly ascending".into());
                }
                previous = Some(key);
            }

            // height <= 2 * log2(n + 1)  <=>  2^height <= (n + 1)^2
            let height = self.height();
            let squared = (self.len as u128 + 1).pow(2);
            if height >= 128 || (1u128 << height) > squared {
                errors.push(alloc::format!("height {height} exceeds 2*log2(n+1) for n={}", self.len));
            }

            assert!(errors.is_empty(), "Tree invariant violations:\n{}", errors.join("\n"));
        }

        /// Returns the black-height of the subtree, counting the nil leaf.
        fn validate_node(&self, link: Link, parent: Link, count: &mut usize, errors: &mut Vec<String>) -> usize {
            let Some(handle) = link else {
                return 1;
            };
            *count += 1;

            let node = self.nodes.get(handle);
            if node.parent != parent {
                errors.push(alloc::format!("parent link mismatch at {handle:?}"));
            }
            if node.is_red() && (self.is_red(node.left) || self.is_red(node.right)) {
                errors.push(alloc::format!("red node {handle:?} has a red child"));
            }

            let left = self.validate_node(node.left, Some(handle), count, errors);
            let right = self.validate_node(node.right, Some(handle), count, errors);
            if left != right {
                errors.push(alloc::format!("black-height mismatch at {handle:?}: left={left}, right={right}"));
            }
            left + usize::from(!node.is_red())
        }

        pub(crate) fn height(&self) -> usize {
            fn depth<K, V>(nodes: &Arena<Node<K, V>>, link: Link) -> usize {
                link.map_or(0, |handle| {
                    let node = nodes.get(handle);
                    1 + depth(nodes, node.left).max(depth(nodes, node.right))
                })
            }
            depth(&self.nodes, self.root)
        }
    }

    fn map_tree() -> RawRbTree<i32, i32, NaturalOrder> {
        RawRbTree::new(NaturalOrder, DuplicatePolicy::Overwrite)
    }

    fn keys<C>(tree: &RawRbTree<i32, i32, C>) -> Vec<i32> {
        tree.iter().map(|(&key, _)| key).collect()
    }

    #[test]
    fn empty_tree_is_inert() {
        let mut tree = map_tree();
        assert!(tree.find(&1).is_none());
        assert!(tree.remove(&1).is_none());
        assert_eq!(tree.first(), None);
        assert_eq!(tree.walk(|_, _| ControlFlow::Break(())), ControlFlow::Continue(()));
        tree.validate_invariants();
    }

    #[test]
    fn single_node_insert_and_remove() {
        let mut tree = map_tree();
        assert!(matches!(tree.insert(1, 10), InsertOutcome::Inserted));
        tree.validate_invariants();
        assert_eq!(tree.remove(&1), Some((1, 10)));
        tree.validate_invariants();
        assert!(tree.is_empty());
        assert_ne!(tree.version(), 0);
    }

    #[test]
    fn overwrite_keeps_version() {
        let mut tree = map_tree();
        tree.insert(1, 10);
        let version = tree.version();
        assert!(matches!(tree.insert(1, 11), InsertOutcome::Overwritten(10)));
        assert_eq!(tree.version(), version);
        assert_eq!(tree.get(&1), Some(&11));
    }

    #[test]
    fn reject_leaves_tree_untouched() {
        let mut tree: RawRbTree<i32, i32, NaturalOrder> = RawRbTree::new(NaturalOrder, DuplicatePolicy::Reject);
        tree.insert(1, 10);
        let version = tree.version();
        assert!(matches!(tree.insert(1, 11), InsertOutcome::Rejected(1, 11)));
        assert_eq!(tree.version(), version);
        assert_eq!(tree.get(&1), Some(&10));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn two_child_delete_keeps_order() {
        let mut tree = map_tree();
        for key in [5, 3, 8, 1, 4, 7, 9] {
            tree.insert(key, key * 10);
        }
        assert_eq!(tree.remove(&5), Some((5, 50)));
        tree.validate_invariants();
        assert_eq!(keys(&tree), vec![1, 3, 4, 7, 8, 9]);
        assert_eq!(tree.get(&7), Some(&70));
    }

    #[test]
    fn ascending_inserts_stay_balanced() {
        let mut tree = map_tree();
        for key in 0..4096 {
            tree.insert(key, key);
        }
        tree.validate_invariants();
        assert!(tree.height() <= 24);

        for key in (0..4096).step_by(2) {
            tree.remove(&key);
        }
        tree.validate_invariants();
        assert_eq!(tree.len(), 2048);
    }

    #[test]
    fn walk_stops_early() {
        let mut tree = map_tree();
        for key in 0..10 {
            tree.insert(key, key);
        }
        let mut seen = Vec::new();
        let flow = tree.walk(|&key, _| {
            seen.push(key);
            if key == 3 { ControlFlow::Break(()) } else { ControlFlow::Continue(()) }
        });
        assert_eq!(flow, ControlFlow::Break(()));
        assert_eq!(seen, vec![0, 1, 2, 3]);
    }

    #[test]
    fn drain_yields_sorted_pairs() {
        let mut tree = map_tree();
        for key in [4, 2, 6, 1, 3] {
            tree.insert(key, -key);
        }
        assert_eq!(tree.drain_to_vec(), vec![(1, -1), (2, -2), (3, -3), (4, -4), (6, -6)]);
        assert!(tree.is_empty());
        tree.validate_invariants();
    }

    #[test]
    fn rebuild_reorders_under_new_comparator() {
        let mut tree = map_tree();
        for key in 0..20 {
            tree.insert(key, key);
        }
        let reversed = RawRbTree::rebuild_from(
            &tree,
            |a: &i32, b: &i32| b.cmp(a),
            DuplicatePolicy::Overwrite,
        );
        reversed.validate_invariants();
        assert_eq!(keys(&reversed), (0..20).rev().collect::<Vec<_>>());
    }

    #[test]
    fn adopted_tree_is_independent() {
        let mut tree = map_tree();
        for key in 0..50 {
            tree.insert(key, key);
        }
        let mut copy = tree.adopt();
        assert_ne!(copy.version(), tree.version());
        copy.validate_invariants();
        copy.remove(&10);
        assert!(tree.contains_key(&10));
        assert!(!copy.contains_key(&10));
        assert_eq!(copy.len() + 1, tree.len());
    }

    #[test]
    fn independent_trees_never_share_a_version() {
        let mut a = map_tree();
        let mut b = map_tree();
        assert_eq!(a.version(), b.version());

        for key in 0..4 {
            a.insert(key, key);
            b.insert(key, key);
        }
        a.remove(&0);
        b.remove(&0);
        assert_ne!(a.version(), b.version());

        let earlier = a.version();
        a.clear();
        assert!(a.version() > earlier);
    }

    #[cfg(feature = "tracing")]
    #[test]
    fn structural_events_are_emitted_without_a_subscriber() {
        let mut tree = map_tree();
        for key in 0..16 {
            tree.insert(key, key);
        }
        tree.remove(&3);
        let copy = tree.adopt();
        let reversed = RawRbTree::rebuild_from(&copy, |a: &i32, b: &i32| b.cmp(a), DuplicatePolicy::Overwrite);
        tree.clear();
        reversed.validate_invariants();
        assert_eq!(reversed.len(), 15);
    }

    #[derive(Clone, Debug)]
    enum Op {
        Insert(i32),
        Remove(i32),
        Clear,
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            30 => (0i32..1000).prop_map(Op::Insert),
            15 => (0i32..1000).prop_map(Op::Remove),
            1 => Just(Op::Clear),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        #[test]
        fn invariants_hold_after_every_operation(ops in prop::collection::vec(op_strategy(), 0..500)) {
            let mut tree = map_tree();
            let mut model = BTreeMap::new();

            for op in ops {
                let version = tree.version();
                match op {
                    Op::Insert(key) => {
                        let fresh = model.insert(key, key * 2).is_none();
                        tree.insert(key, key * 2);
                        prop_assert_eq!(tree.version() != version, fresh);
                    }
                    Op::Remove(key) => {
                        let expected = model.remove(&key);
                        prop_assert_eq!(tree.remove(&key).map(|(_, value)| value), expected);
                        prop_assert_eq!(tree.version() != version, expected.is_some());
                    }
                    Op::Clear => {
                        tree.clear();
                        model.clear();
                        prop_assert_ne!(tree.version(), version);
                    }
                }
                tree.validate_invariants();
                prop_assert_eq!(tree.len(), model.len());
            }

            let forward: Vec<_> = tree.iter().map(|(&k, &v)| (k, v)).collect();
            let expected: Vec<_> = model.iter().map(|(&k, &v)| (k, v)).collect();
            prop_assert_eq!(&forward, &expected);

            let backward: Vec<_> = tree.iter().rev().map(|(&k, &v)| (k, v)).collect();
            let expected_back: Vec<_> = model.iter().rev().map(|(&k, &v)| (k, v)).collect();
            prop_assert_eq!(backward, expected_back);
        }

        #[test]
        fn insert_then_remove_restores_contents(
            keys in prop::collection::btree_set(0i32..10_000, 0..300),
            probe in 10_000i32..20_000,
        ) {
            let mut tree = map_tree();
            for &key in &keys {
                tree.insert(key, key);
            }
            let before: Vec<_> = tree.iter().map(|(&k, &v)| (k, v)).collect();

            tree.insert(probe, probe);
            prop_assert_eq!(tree.remove(&probe), Some((probe, probe)));

            let after: Vec<_> = tree.iter().map(|(&k, &v)| (k, v)).collect();
            prop_assert_eq!(before, after);
            tree.validate_invariants();
        }
    }
}
