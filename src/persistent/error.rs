//! Error type reported by [`PersistentTreeMap::check_invariants`](super::PersistentTreeMap::check_invariants).
//!
//! Map operations themselves never fail: a missing key is `None` and every
//! operation on an empty map is defined. The only fallible entry point is the
//! diagnostic invariant check, which reports the first structural defect it
//! finds.

use std::fmt::{self, Display, Formatter};

/// A structural invariant of the AVL tree that does not hold.
///
/// The check visits nodes in pre-order and stops at the first defect, so
/// `depth` is the distance from the root of the offending node (root is 0).
///
/// # Examples
///
/// ```rust
/// use ordmap::persistent::{InvariantViolation, PersistentTreeMap};
///
/// let map: PersistentTreeMap<i32, i32> = (0..100).map(|key| (key, key)).collect();
/// assert_eq!(map.check_invariants(), Ok(()));
///
/// let error = InvariantViolation::Unbalanced { depth: 2, left_height: 3, right_height: 1 };
/// assert_eq!(
///     format!("{error}"),
///     "unbalanced node at depth 2: left height 3, right height 1"
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvariantViolation {
    /// The subtree heights of a node differ by more than one.
    Unbalanced {
        /// Depth of the node.
        depth: usize,
        /// Height of the left subtree.
        left_height: usize,
        /// Height of the right subtree.
        right_height: usize,
    },
    /// A cached height is not one more than the taller child.
    HeightMismatch {
        /// Depth of the node.
        depth: usize,
        /// Height derived from the children.
        expected: usize,
        /// Height stored in the node.
        actual: usize,
    },
    /// A cached size is not one more than the children's sizes combined.
    SizeMismatch {
        /// Depth of the node.
        depth: usize,
        /// Size derived from the children.
        expected: usize,
        /// Size stored in the node.
        actual: usize,
    },
    /// A key does not order strictly between the keys of its ancestors.
    OutOfOrder {
        /// Depth of the node.
        depth: usize,
    },
}

impl Display for InvariantViolation {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unbalanced {
                depth,
                left_height,
                right_height,
            } => write!(
                formatter,
                "unbalanced node at depth {depth}: left height {left_height}, right height {right_height}"
            ),
            Self::HeightMismatch {
                depth,
                expected,
                actual,
            } => write!(
                formatter,
                "height mismatch at depth {depth}: expected {expected}, found {actual}"
            ),
            Self::SizeMismatch {
                depth,
                expected,
                actual,
            } => write!(
                formatter,
                "size mismatch at depth {depth}: expected {expected}, found {actual}"
            ),
            Self::OutOfOrder { depth } => {
                write!(formatter, "key out of order at depth {depth}")
            }
        }
    }
}

impl std::error::Error for InvariantViolation {}
