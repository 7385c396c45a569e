use super::handle::{Handle, Link};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Color {
    Red,
    Black,
}

/// A single key-value pair in the tree.
///
/// `left` and `right` are owning in the sense that the node is reachable only
/// through them. `parent` is a back-link used for successor walks and
/// rebalancing; it never decides when a node is freed.
#[derive(Clone)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) color: Color,
    pub(crate) left: Link,
    pub(crate) right: Link,
    pub(crate) parent: Link,
}

/// Which child slot of a parent a node hangs from.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    pub(crate) const fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

impl<K, V> Node<K, V> {
    /// Creates a detached red node, the colour every insertion starts with.
    pub(crate) fn new(key: K, value: V, parent: Link) -> Self {
        Self {
            key,
            value,
            color: Color::Red,
            left: None,
            right: None,
            parent,
        }
    }

    #[inline]
    pub(crate) fn child(&self, side: Side) -> Link {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    #[inline]
    pub(crate) fn set_child(&mut self, side: Side, child: Link) {
        match side {
            Side::Left => self.left = child,
            Side::Right => self.right = child,
        }
    }

    /// Returns the side on which `child` hangs from this node, if it is a child at all.
    pub(crate) fn side_of(&self, child: Handle) -> Option<Side> {
        if self.left == Some(child) {
            Some(Side::Left)
        } else if self.right == Some(child) {
            Some(Side::Right)
        } else {
            None
        }
    }

    pub(crate) const fn is_red(&self) -> bool {
        matches!(self.color, Color::Red)
    }

    pub(crate) fn into_pair(self) -> (K, V) {
        (self.key, self.value)
    }
}
