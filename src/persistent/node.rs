//! Immutable tree nodes.
//!
//! A [`Node`] never changes after construction. Rebuilding a path through
//! the tree allocates new nodes that point at the untouched subtrees of the
//! old version, so any number of map versions can share the same nodes.
//! Entries are shared the same way, which lets rotations move a key-value
//! pair between nodes without cloning it.

use super::ReferenceCounter;
use std::fmt;

/// An immutable key-value pair stored in a [`PersistentTreeMap`](super::PersistentTreeMap).
///
/// # Examples
///
/// ```rust
/// use ordmap::persistent::PersistentTreeMap;
///
/// let map = PersistentTreeMap::new().insert(1, "one").insert(2, "two");
/// let entry = map.min().unwrap();
/// assert_eq!(entry.key(), &1);
/// assert_eq!(entry.value(), &"one");
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Entry<K, V> {
    key: K,
    value: V,
}

impl<K, V> Entry<K, V> {
    /// Creates a new entry.
    #[inline]
    pub const fn new(key: K, value: V) -> Self {
        Self { key, value }
    }

    /// Returns the key of this entry.
    #[inline]
    pub const fn key(&self) -> &K {
        &self.key
    }

    /// Returns the value of this entry.
    #[inline]
    pub const fn value(&self) -> &V {
        &self.value
    }

    /// Returns the key and value as a pair of references.
    #[inline]
    pub const fn as_pair(&self) -> (&K, &V) {
        (&self.key, &self.value)
    }

    /// Consumes the entry, returning the owned key and value.
    #[inline]
    pub fn into_pair(self) -> (K, V) {
        (self.key, self.value)
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Entry<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_tuple("Entry")
            .field(&self.key)
            .field(&self.value)
            .finish()
    }
}

impl<K, V> From<(K, V)> for Entry<K, V> {
    #[inline]
    fn from((key, value): (K, V)) -> Self {
        Self::new(key, value)
    }
}

// Entries hand serde a plain `(key, value)` tuple.
#[cfg(feature = "serde")]
impl<K, V> serde::Serialize for Entry<K, V>
where
    K: serde::Serialize,
    V: serde::Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serde::Serialize::serialize(&(&self.key, &self.value), serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V> serde::Deserialize<'de> for Entry<K, V>
where
    K: serde::Deserialize<'de>,
    V: serde::Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        <(K, V) as serde::Deserialize<'de>>::deserialize(deserializer).map(Self::from)
    }
}

/// A possibly empty reference to a shared subtree.
pub(crate) type Link<K, V> = Option<ReferenceCounter<Node<K, V>>>;

/// Internal AVL node.
///
/// `height` and `size` are computed once from the children in [`Node::new`]
/// and cached, which keeps `len` and the balance checks O(1).
pub(crate) struct Node<K, V> {
    pub(crate) entry: ReferenceCounter<Entry<K, V>>,
    pub(crate) height: usize,
    pub(crate) size: usize,
    pub(crate) left: Link<K, V>,
    pub(crate) right: Link<K, V>,
}

impl<K, V> Node<K, V> {
    /// Builds a node over the given children, deriving height and size.
    pub(crate) fn new(
        entry: ReferenceCounter<Entry<K, V>>,
        left: Link<K, V>,
        right: Link<K, V>,
    ) -> Self {
        Self {
            entry,
            height: combined_height(&left, &right),
            size: 1 + size(&left) + size(&right),
            left,
            right,
        }
    }

    /// Builds a node and wraps it in a link.
    #[inline]
    pub(crate) fn link(
        entry: ReferenceCounter<Entry<K, V>>,
        left: Link<K, V>,
        right: Link<K, V>,
    ) -> Link<K, V> {
        Some(ReferenceCounter::new(Self::new(entry, left, right)))
    }

    /// Builds a childless node.
    #[inline]
    pub(crate) fn leaf(entry: Entry<K, V>) -> Link<K, V> {
        Self::link(ReferenceCounter::new(entry), None, None)
    }

    #[inline]
    pub(crate) fn key(&self) -> &K {
        &self.entry.key
    }

    /// The child on the given side; `Direction::Ascending` means left.
    #[inline]
    pub(crate) const fn child(&self, side: Direction) -> &Link<K, V> {
        match side {
            Direction::Ascending => &self.left,
            Direction::Descending => &self.right,
        }
    }
}

/// Height of a possibly empty subtree; empty is 0.
#[inline]
pub(crate) fn height<K, V>(link: &Link<K, V>) -> usize {
    link.as_ref().map_or(0, |node| node.height)
}

/// Number of entries in a possibly empty subtree; empty is 0.
#[inline]
pub(crate) fn size<K, V>(link: &Link<K, V>) -> usize {
    link.as_ref().map_or(0, |node| node.size)
}

/// Height of a node whose children are `first` and `second`.
#[inline]
pub(crate) fn combined_height<K, V>(first: &Link<K, V>, second: &Link<K, V>) -> usize {
    height(first).max(height(second)) + 1
}

/// Order in which a traversal visits keys.
///
/// An ascending traversal visits a node's left subtree, the node, then its
/// right subtree; a descending one does the mirror image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Smallest key first.
    Ascending,
    /// Largest key first.
    Descending,
}

impl Direction {
    /// The opposite direction.
    #[inline]
    #[must_use]
    pub const fn reverse(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}
