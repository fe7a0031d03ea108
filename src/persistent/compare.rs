//! Key ordering used by [`PersistentTreeMap`](super::PersistentTreeMap).
//!
//! Every tree operation consults a [`Comparator`] value that the map carries
//! alongside its root. Two keys are considered equal when neither orders
//! before the other, so a comparator only has to provide a strict
//! "less than" relation.
//!
//! - [`NaturalOrder`]: the key type's own [`Ord`] implementation (the default)
//! - [`FnComparator`]: an arbitrary closure
//!
//! # Examples
//!
//! ```rust
//! use ordmap::persistent::{FnComparator, PersistentTreeMap};
//!
//! // Order strings by length, then alphabetically.
//! let by_length = FnComparator::new(|left: &String, right: &String| {
//!     (left.len(), left) < (right.len(), right)
//! });
//! let map = PersistentTreeMap::with_comparator(by_length)
//!     .insert("ccc".to_string(), 3)
//!     .insert("a".to_string(), 1)
//!     .insert("bb".to_string(), 2);
//!
//! let keys: Vec<&String> = map.keys().collect();
//! assert_eq!(keys, vec!["a", "bb", "ccc"]);
//! ```

use std::cmp::Ordering;
use std::fmt;

/// A strict ordering relation over keys of type `T`.
///
/// Implementations must describe a strict weak ordering. A relation that is
/// not one (for example one that is not transitive) is not detected; the
/// map silently produces an unspecified key order in that case.
pub trait Comparator<T: ?Sized> {
    /// Returns `true` if `left` orders strictly before `right`.
    fn less(&self, left: &T, right: &T) -> bool;

    /// Three-way comparison derived from two calls to [`less`](Self::less).
    fn compare(&self, left: &T, right: &T) -> Ordering {
        if self.less(left, right) {
            Ordering::Less
        } else if self.less(right, left) {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }
}

/// Orders keys by their [`Ord`] implementation.
///
/// This is the comparator used by [`PersistentTreeMap::new`](super::PersistentTreeMap::new).
/// Because it is implemented for every `T: Ord`, a map with `String` keys can
/// be queried with `&str`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct NaturalOrder;

impl<T: Ord + ?Sized> Comparator<T> for NaturalOrder {
    #[inline]
    fn less(&self, left: &T, right: &T) -> bool {
        left < right
    }
}

/// Adapts a `Fn(&T, &T) -> bool` "less than" closure into a [`Comparator`].
#[derive(Clone, Copy, Default)]
pub struct FnComparator<F> {
    less: F,
}

impl<F> FnComparator<F> {
    /// Wraps a closure returning `true` when its first argument orders
    /// strictly before its second.
    #[inline]
    pub const fn new(less: F) -> Self {
        Self { less }
    }
}

impl<T: ?Sized, F> Comparator<T> for FnComparator<F>
where
    F: Fn(&T, &T) -> bool,
{
    #[inline]
    fn less(&self, left: &T, right: &T) -> bool {
        (self.less)(left, right)
    }
}

impl<F> fmt::Debug for FnComparator<F> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("FnComparator")
    }
}
