//! Persistent (immutable) ordered map.
//!
//! [`PersistentTreeMap`] is an AVL tree whose nodes are never modified once
//! built. Every update returns a new map that shares all untouched subtrees
//! with the map it was derived from, so old versions stay valid and cheap to
//! keep around.
//!
//! - [`PersistentTreeMap`]: the map handle
//! - [`Comparator`], [`NaturalOrder`], [`FnComparator`]: key ordering
//! - [`PersistentTreeMapIterator`]: full traversal in either direction
//! - [`PersistentTreeMapSeekIterator`]: traversal from a boundary key
//! - [`PersistentTreeMapRangeIterator`]: traversal over a key range
//!
//! # Structural Sharing
//!
//! Inserting or removing a key rebuilds only the O(log N) nodes on the path
//! from the root to the affected position. Nodes are reference counted, so a
//! subtree lives exactly as long as some version of the map still reaches it.
//!
//! # Examples
//!
//! ```rust
//! use ordmap::persistent::PersistentTreeMap;
//!
//! let map = PersistentTreeMap::new()
//!     .insert(3, "three")
//!     .insert(1, "one")
//!     .insert(2, "two");
//!
//! // Entries are always in sorted order
//! let keys: Vec<&i32> = map.keys().collect();
//! assert_eq!(keys, vec![&1, &2, &3]);
//!
//! // Structural sharing: the original map is preserved
//! let updated = map.insert(1, "ONE");
//! assert_eq!(map.get(&1), Some(&"one"));
//! assert_eq!(updated.get(&1), Some(&"ONE"));
//!
//! // Seeking
//! let from_two: Vec<&i32> = map.iter_from(&2).map(|(key, _)| key).collect();
//! assert_eq!(from_two, vec![&2, &3]);
//! ```

// =============================================================================
// Reference Counter Type Alias
// =============================================================================

/// Reference-counted smart pointer type.
///
/// When the `arc` feature is enabled (default), this is `std::sync::Arc`,
/// which lets maps be shared across threads.
///
/// When the `arc` feature is disabled, this is `std::rc::Rc`, which is
/// cheaper but not thread-safe.
#[cfg(feature = "arc")]
pub(crate) type ReferenceCounter<T> = std::sync::Arc<T>;

#[cfg(not(feature = "arc"))]
pub(crate) type ReferenceCounter<T> = std::rc::Rc<T>;

mod compare;
mod error;
mod iter;
mod node;
mod seek;
mod tree;
mod treemap;

pub use compare::Comparator;
pub use compare::FnComparator;
pub use compare::NaturalOrder;
pub use error::InvariantViolation;
pub use iter::PersistentTreeMapIterator;
pub use node::Direction;
pub use node::Entry;
pub use seek::PersistentTreeMapRangeIterator;
pub use seek::PersistentTreeMapSeekIterator;
pub use treemap::PersistentTreeMap;

// =============================================================================
// Tests
// =============================================================================
