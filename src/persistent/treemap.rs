//! Persistent (immutable) ordered map based on an AVL tree.
//!
//! This module provides [`PersistentTreeMap`], the handle through which the
//! tree in [`super::tree`] is used.
//!
//! # Overview
//!
//! A handle is nothing more than a root pointer and a comparator. Updating
//! operations return a new handle and leave the receiver untouched; the two
//! versions share every subtree that the update did not rebuild.
//!
//! - O(log N) get, insert and remove
//! - O(log N) min/max
//! - O(log N + k) seeks and range queries, where k is the number of results
//! - O(1) len, `is_empty`, height and clone
//!
//! # Examples
//!
//! ```rust
//! use ordmap::persistent::PersistentTreeMap;
//!
//! let first = PersistentTreeMap::new()
//!     .insert(3, "three")
//!     .insert(1, "one")
//!     .insert(2, "two");
//! let second = first.insert(4, "four").remove(&1);
//!
//! let keys: Vec<&i32> = first.keys().collect();
//! assert_eq!(keys, vec![&1, &2, &3]);
//!
//! let keys: Vec<&i32> = second.keys().collect();
//! assert_eq!(keys, vec![&2, &3, &4]);
//! ```

use super::compare::{Comparator, NaturalOrder};
use super::error::InvariantViolation;
use super::iter::{self, PersistentTreeMapIterator};
use super::node::{self, Direction, Entry, Link};
use super::seek::{PersistentTreeMapRangeIterator, PersistentTreeMapSeekIterator};
use super::tree;
use std::borrow::Borrow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Bound, RangeBounds};

/// A persistent (immutable) ordered map based on an AVL tree.
///
/// Keys are ordered by the comparator `C`, which defaults to
/// [`NaturalOrder`] (the keys' [`Ord`] implementation). Use
/// [`with_comparator`](Self::with_comparator) to order them any other way.
///
/// # Time Complexity
///
/// | Operation                   | Complexity   |
/// |-----------------------------|--------------|
/// | `new` / `clone`             | O(1)         |
/// | `get` / `contains_key`      | O(log N)     |
/// | `insert` / `remove`         | O(log N)     |
/// | `min` / `max`               | O(log N)     |
/// | `iter_from` / `range`       | O(log N + k) |
/// | `entries`                   | O(N)         |
/// | `len` / `is_empty`          | O(1)         |
///
/// # Examples
///
/// ```rust
/// use ordmap::persistent::PersistentTreeMap;
///
/// let map = PersistentTreeMap::singleton(42, "answer");
/// assert_eq!(map.get(&42), Some(&"answer"));
///
/// let map = map.insert(7, "seven");
/// assert_eq!(map.min().map(|entry| *entry.key()), Some(7));
/// ```
pub struct PersistentTreeMap<K, V, C = NaturalOrder> {
    root: Link<K, V>,
    comparator: C,
}

impl<K, V> PersistentTreeMap<K, V> {
    /// Creates a new empty map ordered by the keys' [`Ord`] implementation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordmap::persistent::PersistentTreeMap;
    ///
    /// let map: PersistentTreeMap<i32, String> = PersistentTreeMap::new();
    /// assert!(map.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self::with_comparator(NaturalOrder)
    }

    /// Creates a map containing a single key-value pair.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordmap::persistent::PersistentTreeMap;
    ///
    /// let map = PersistentTreeMap::singleton("key", 1);
    /// assert_eq!(map.len(), 1);
    /// ```
    #[inline]
    #[must_use]
    pub fn singleton(key: K, value: V) -> Self
    where
        K: Ord,
    {
        Self {
            root: node::Node::leaf(Entry::new(key, value)),
            comparator: NaturalOrder,
        }
    }
}

impl<K, V, C> PersistentTreeMap<K, V, C> {
    /// Creates a new empty map ordered by `comparator`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordmap::persistent::{FnComparator, PersistentTreeMap};
    ///
    /// let descending = FnComparator::new(|left: &i32, right: &i32| left > right);
    /// let map = PersistentTreeMap::with_comparator(descending)
    ///     .insert(1, 'a')
    ///     .insert(3, 'c')
    ///     .insert(2, 'b');
    /// assert_eq!(map.min().map(|entry| *entry.key()), Some(3));
    /// ```
    #[inline]
    #[must_use]
    pub const fn with_comparator(comparator: C) -> Self {
        Self {
            root: None,
            comparator,
        }
    }

    /// Returns the comparator ordering this map.
    #[inline]
    pub const fn comparator(&self) -> &C {
        &self.comparator
    }

    /// Returns the number of entries in the map.
    ///
    /// The count is cached in the root, so this is O(1).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordmap::persistent::PersistentTreeMap;
    ///
    /// let map = PersistentTreeMap::new().insert(1, "one").insert(2, "two");
    /// assert_eq!(map.len(), 2);
    /// ```
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        node::size(&self.root)
    }

    /// Returns `true` if the map contains no entries.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the height of the tree; 0 for an empty map.
    ///
    /// An AVL tree with N entries is never taller than about 1.44 log2(N + 2).
    #[inline]
    #[must_use]
    pub fn height(&self) -> usize {
        node::height(&self.root)
    }

    /// Returns the entry with the smallest key, or `None` if the map is empty.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordmap::persistent::PersistentTreeMap;
    ///
    /// let map = PersistentTreeMap::new().insert(2, "two").insert(1, "one");
    /// let smallest = map.min().unwrap();
    /// assert_eq!(smallest.as_pair(), (&1, &"one"));
    /// ```
    #[must_use]
    pub fn min(&self) -> Option<&Entry<K, V>> {
        tree::extreme(&self.root, Direction::Ascending)
    }

    /// Returns the entry with the largest key, or `None` if the map is empty.
    #[must_use]
    pub fn max(&self) -> Option<&Entry<K, V>> {
        tree::extreme(&self.root, Direction::Descending)
    }

    /// Returns every entry in ascending key order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordmap::persistent::PersistentTreeMap;
    ///
    /// let map = PersistentTreeMap::new().insert(2, 'b').insert(1, 'a');
    /// let pairs: Vec<(&i32, &char)> = map
    ///     .entries()
    ///     .into_iter()
    ///     .map(|entry| entry.as_pair())
    ///     .collect();
    /// assert_eq!(pairs, vec![(&1, &'a'), (&2, &'b')]);
    /// ```
    #[must_use]
    pub fn entries(&self) -> Vec<&Entry<K, V>> {
        iter::entries(&self.root)
    }

    /// Returns an iterator over the entries in ascending key order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordmap::persistent::PersistentTreeMap;
    ///
    /// let map = PersistentTreeMap::new().insert(3, "c").insert(1, "a").insert(2, "b");
    /// let values: Vec<&&str> = map.iter().map(|(_, value)| value).collect();
    /// assert_eq!(values, vec![&"a", &"b", &"c"]);
    /// ```
    pub fn iter(&self) -> PersistentTreeMapIterator<'_, K, V> {
        PersistentTreeMapIterator::new(&self.root, Direction::Ascending)
    }

    /// Returns an iterator over the entries in descending key order.
    pub fn iter_backward(&self) -> PersistentTreeMapIterator<'_, K, V> {
        PersistentTreeMapIterator::new(&self.root, Direction::Descending)
    }

    /// Returns an iterator over the keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(key, _)| key)
    }

    /// Returns an iterator over the values in ascending key order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, value)| value)
    }

    /// Returns a reference to the value corresponding to the key.
    ///
    /// The key may be any borrowed form of the map's key type, as long as the
    /// comparator orders the borrowed form the same way as the key type.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordmap::persistent::PersistentTreeMap;
    ///
    /// let map = PersistentTreeMap::new().insert("hello".to_string(), 42);
    ///
    /// assert_eq!(map.get("hello"), Some(&42));
    /// assert_eq!(map.get("world"), None);
    /// ```
    #[must_use]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        tree::get(&self.root, key, &self.comparator).map(Entry::value)
    }

    /// Returns the stored entry whose key is equal to `key`.
    ///
    /// Unlike [`get`](Self::get) this exposes the stored key, which may
    /// differ from `key` under a comparator that treats distinct keys as
    /// equal.
    #[must_use]
    pub fn get_entry<Q>(&self, key: &Q) -> Option<&Entry<K, V>>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        tree::get(&self.root, key, &self.comparator)
    }

    /// Returns `true` if the map contains a value for the key.
    #[must_use]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.get_entry(key).is_some()
    }

    /// Returns an iterator over the entries whose keys are not less than
    /// `key`, in ascending order.
    ///
    /// `key` does not need to be present in the map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordmap::persistent::PersistentTreeMap;
    ///
    /// let map: PersistentTreeMap<i32, ()> =
    ///     [1, 3, 5, 7].into_iter().map(|key| (key, ())).collect();
    /// let keys: Vec<&i32> = map.iter_from(&4).map(|(key, _)| key).collect();
    /// assert_eq!(keys, vec![&5, &7]);
    /// ```
    pub fn iter_from<Q>(&self, key: &Q) -> PersistentTreeMapSeekIterator<'_, K, V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        PersistentTreeMapSeekIterator::new(
            &self.root,
            Direction::Ascending,
            Bound::Included(key),
            &self.comparator,
        )
    }

    /// Returns an iterator over the entries whose keys are not greater than
    /// `key`, in descending order.
    pub fn iter_backward_from<Q>(&self, key: &Q) -> PersistentTreeMapSeekIterator<'_, K, V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        PersistentTreeMapSeekIterator::new(
            &self.root,
            Direction::Descending,
            Bound::Included(key),
            &self.comparator,
        )
    }

    /// Returns an iterator over the entries within `range`, in ascending
    /// key order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordmap::persistent::PersistentTreeMap;
    ///
    /// let map: PersistentTreeMap<i32, i32> = (0..10).map(|key| (key, key * key)).collect();
    /// let squares: Vec<&i32> = map.range(3..6).map(|(_, value)| value).collect();
    /// assert_eq!(squares, vec![&9, &16, &25]);
    /// ```
    pub fn range<Q, R>(&self, range: R) -> PersistentTreeMapRangeIterator<'_, K, V, C, Q, R>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
        R: RangeBounds<Q>,
    {
        PersistentTreeMapRangeIterator::new(&self.root, range, &self.comparator)
    }

    /// Returns a new map without the key.
    ///
    /// If the key is absent the returned map shares the receiver's tree.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordmap::persistent::PersistentTreeMap;
    ///
    /// let map = PersistentTreeMap::new().insert(1, "one").insert(2, "two");
    /// let removed = map.remove(&1);
    ///
    /// assert_eq!(map.len(), 2);
    /// assert_eq!(removed.len(), 1);
    /// assert_eq!(removed.get(&1), None);
    /// ```
    #[must_use]
    pub fn remove<Q>(&self, key: &Q) -> Self
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q> + Clone,
    {
        match tree::remove(&self.root, key, &self.comparator) {
            Some(root) => Self {
                root,
                comparator: self.comparator.clone(),
            },
            None => self.clone(),
        }
    }
}

impl<K, V, C: Comparator<K>> PersistentTreeMap<K, V, C> {
    /// Returns a new map with the key mapped to the value.
    ///
    /// An entry with an equal key is replaced, key included.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordmap::persistent::PersistentTreeMap;
    ///
    /// let map = PersistentTreeMap::new().insert(1, "one");
    /// let updated = map.insert(1, "ONE");
    ///
    /// assert_eq!(map.get(&1), Some(&"one"));
    /// assert_eq!(updated.get(&1), Some(&"ONE"));
    /// ```
    #[must_use]
    pub fn insert(&self, key: K, value: V) -> Self
    where
        C: Clone,
    {
        Self {
            root: tree::insert(&self.root, key, value, &self.comparator),
            comparator: self.comparator.clone(),
        }
    }

    /// Verifies the ordering, balance and cached metadata of every node.
    ///
    /// Maps built through this API always pass; the check exists for tests
    /// and for diagnosing comparators that are not strict weak orderings.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantViolation`] found in pre-order.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        tree::check_invariants(&self.root, &self.comparator)
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<K, V, C: Clone> Clone for PersistentTreeMap<K, V, C> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
            comparator: self.comparator.clone(),
        }
    }
}

impl<K, V, C: Default> Default for PersistentTreeMap<K, V, C> {
    #[inline]
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<K, V, C: Comparator<K>> Extend<(K, V)> for PersistentTreeMap<K, V, C> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.root = tree::insert(&self.root, key, value, &self.comparator);
        }
    }
}

impl<K, V, C: Comparator<K> + Default> FromIterator<(K, V)> for PersistentTreeMap<K, V, C> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::default();
        map.extend(iter);
        map
    }
}

impl<'a, K, V, C> IntoIterator for &'a PersistentTreeMap<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = PersistentTreeMapIterator<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Two maps are equal when they hold equal entries in the same order.
///
/// Tree shape does not take part: maps built by different insertion orders
/// compare equal.
impl<K: PartialEq, V: PartialEq, C> PartialEq for PersistentTreeMap<K, V, C> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq, C> Eq for PersistentTreeMap<K, V, C> {}

/// Hashes the length, then every entry in key order, consistently with
/// [`PartialEq`].
///
/// # Examples
///
/// ```rust
/// use ordmap::persistent::PersistentTreeMap;
/// use std::collections::HashMap;
///
/// let mut outer: HashMap<PersistentTreeMap<i32, String>, &str> = HashMap::new();
/// let key = PersistentTreeMap::new()
///     .insert(1, "one".to_string())
///     .insert(2, "two".to_string());
/// outer.insert(key.clone(), "value");
/// assert_eq!(outer.get(&key), Some(&"value"));
/// ```
impl<K: Hash, V: Hash, C> Hash for PersistentTreeMap<K, V, C> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for (key, value) in self {
            key.hash(state);
            value.hash(state);
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for PersistentTreeMap<K, V, C> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

impl<K: fmt::Display, V: fmt::Display, C> fmt::Display for PersistentTreeMap<K, V, C> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{{")?;
        let mut first = true;
        for (key, value) in self {
            if first {
                first = false;
            } else {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{key}: {value}")?;
        }
        write!(formatter, "}}")
    }
}

#[cfg(feature = "arc")]
static_assertions::assert_impl_all!(PersistentTreeMap<i32, String>: Send, Sync);

#[cfg(not(feature = "arc"))]
static_assertions::assert_not_impl_any!(PersistentTreeMap<i32, String>: Send, Sync);

// =============================================================================
// Serde Support
// =============================================================================

// Trait integration only: a map goes through the serializer's own map
// representation and the tree shape is never part of the output.
#[cfg(feature = "serde")]
impl<K, V, C> serde::Serialize for PersistentTreeMap<K, V, C>
where
    K: serde::Serialize,
    V: serde::Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(feature = "serde")]
struct PersistentTreeMapVisitor<K, V, C> {
    marker: std::marker::PhantomData<fn() -> PersistentTreeMap<K, V, C>>,
}

#[cfg(feature = "serde")]
impl<K, V, C> PersistentTreeMapVisitor<K, V, C> {
    const fn new() -> Self {
        Self {
            marker: std::marker::PhantomData,
        }
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V, C> serde::de::Visitor<'de> for PersistentTreeMapVisitor<K, V, C>
where
    K: serde::Deserialize<'de>,
    V: serde::Deserialize<'de>,
    C: Comparator<K> + Default,
{
    type Value = PersistentTreeMap<K, V, C>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::MapAccess<'de>,
    {
        let mut map = PersistentTreeMap::default();
        while let Some((key, value)) = access.next_entry()? {
            map.root = tree::insert(&map.root, key, value, &map.comparator);
        }
        Ok(map)
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V, C> serde::Deserialize<'de> for PersistentTreeMap<K, V, C>
where
    K: serde::Deserialize<'de>,
    V: serde::Deserialize<'de>,
    C: Comparator<K> + Default,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_map(PersistentTreeMapVisitor::new())
    }
}

// =============================================================================
// Tests
// =============================================================================
