//! Resumable in-order traversal.
//!
//! Iteration never recurses: a [`Walk`] keeps an explicit stack of frames,
//! each recording how far the traversal has progressed through one node.
//! Advancing runs the stack machine until the next node is ready to yield,
//! so a traversal can be paused after any entry and resumed later, and its
//! depth is bounded by the tree height rather than the call stack.
//!
//! The same machine drives the seek iterators in [`super::seek`], which add a
//! comparison phase in front of the plain walk.

use super::node::{Direction, Entry, Link, Node, size};
use smallvec::SmallVec;
use std::iter::FusedIterator;

/// Frames kept inline before the stack spills to the heap.
///
/// An AVL tree needs over 190 000 entries to grow taller than this.
pub(crate) const INLINE_DEPTH: usize = 24;

/// Progress of a traversal through a single node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Step {
    /// Still locating the boundary key; the node has not been compared yet.
    Seek,
    /// About to descend into the child on the traversal's own side.
    Descend,
    /// Every entry before this node has been produced.
    Yield,
    /// About to continue with the child on the far side. The frame is then
    /// replaced by that child, or popped if there is none.
    Cross,
}

pub(crate) struct Frame<'a, K, V> {
    pub(crate) node: &'a Node<K, V>,
    pub(crate) step: Step,
}

impl<'a, K, V> Frame<'a, K, V> {
    #[inline]
    pub(crate) const fn new(node: &'a Node<K, V>, step: Step) -> Self {
        Self { node, step }
    }
}

impl<K, V> Clone for Frame<'_, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for Frame<'_, K, V> {}

/// Explicit-stack state machine shared by every iterator over the tree.
pub(crate) struct Walk<'a, K, V> {
    direction: Direction,
    stack: SmallVec<[Frame<'a, K, V>; INLINE_DEPTH]>,
}

impl<'a, K, V> Walk<'a, K, V> {
    /// Starts a walk at `root` whose first frame is in `step`.
    pub(crate) fn new(root: &'a Link<K, V>, direction: Direction, step: Step) -> Self {
        let mut stack = SmallVec::new();
        if let Some(node) = root.as_deref() {
            stack.push(Frame::new(node, step));
        }
        Self { direction, stack }
    }

    #[inline]
    pub(crate) const fn direction(&self) -> Direction {
        self.direction
    }

    /// Runs the machine until a node is ready to yield.
    ///
    /// `in_range` is consulted only for frames in [`Step::Seek`]. It reports
    /// whether the node lies on the traversal's side of the boundary: if so
    /// the node is yielded after its own-side subtree has been sought, and
    /// its far-side subtree is walked without further comparisons. If not,
    /// the node and its own-side subtree are skipped and the seek continues
    /// on the far side.
    pub(crate) fn next_entry<F>(&mut self, mut in_range: F) -> Option<&'a Entry<K, V>>
    where
        F: FnMut(&K) -> bool,
    {
        let direction = self.direction;
        while let Some(frame) = self.stack.last_mut() {
            let node = frame.node;
            match frame.step {
                Step::Seek => {
                    if in_range(node.key()) {
                        frame.step = Step::Yield;
                        if let Some(child) = node.child(direction).as_deref() {
                            self.stack.push(Frame::new(child, Step::Seek));
                        }
                    } else if let Some(child) = node.child(direction.reverse()).as_deref() {
                        *frame = Frame::new(child, Step::Seek);
                    } else {
                        self.stack.pop();
                    }
                }
                Step::Descend => {
                    frame.step = Step::Yield;
                    if let Some(child) = node.child(direction).as_deref() {
                        self.stack.push(Frame::new(child, Step::Descend));
                    }
                }
                Step::Yield => {
                    frame.step = Step::Cross;
                    return Some(&*node.entry);
                }
                Step::Cross => {
                    if let Some(child) = node.child(direction.reverse()).as_deref() {
                        *frame = Frame::new(child, Step::Descend);
                    } else {
                        self.stack.pop();
                    }
                }
            }
        }
        None
    }
}

impl<K, V> Clone for Walk<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            direction: self.direction,
            stack: self.stack.clone(),
        }
    }
}

/// A cursor over every entry of a [`PersistentTreeMap`](super::PersistentTreeMap)
/// in ascending or descending key order.
///
/// The cursor is positioned on its first entry as soon as it is created.
/// It can be driven either as a standard [`Iterator`] or through the cursor
/// methods [`current`](Self::current), [`advance`](Self::advance) and
/// [`is_done`](Self::is_done). A cursor is independent of every other
/// cursor over the same map, and dropping it mid-traversal needs no cleanup.
///
/// # Examples
///
/// ```rust
/// use ordmap::persistent::PersistentTreeMap;
///
/// let map = PersistentTreeMap::new().insert(2, "b").insert(1, "a").insert(3, "c");
///
/// let mut cursor = map.iter_backward();
/// let mut keys = Vec::new();
/// while !cursor.is_done() {
///     keys.push(*cursor.current().unwrap().0);
///     cursor.advance();
/// }
/// assert_eq!(keys, vec![3, 2, 1]);
/// ```
pub struct PersistentTreeMapIterator<'a, K, V> {
    walk: Walk<'a, K, V>,
    current: Option<&'a Entry<K, V>>,
    remaining: usize,
}

impl<'a, K, V> PersistentTreeMapIterator<'a, K, V> {
    pub(crate) fn new(root: &'a Link<K, V>, direction: Direction) -> Self {
        let mut walk = Walk::new(root, direction, Step::Descend);
        let current = walk.next_entry(|_| true);
        Self {
            walk,
            current,
            remaining: size(root),
        }
    }

    /// Returns `true` once every entry has been passed.
    #[inline]
    pub const fn is_done(&self) -> bool {
        self.current.is_none()
    }

    /// The entry the cursor is positioned on, if any.
    #[inline]
    pub fn current(&self) -> Option<(&'a K, &'a V)> {
        self.current.map(Entry::as_pair)
    }

    /// The entry the cursor is positioned on, as an [`Entry`].
    #[inline]
    pub const fn current_entry(&self) -> Option<&'a Entry<K, V>> {
        self.current
    }

    /// Moves the cursor to the next entry. Does nothing once done.
    pub fn advance(&mut self) {
        if self.current.is_some() {
            self.remaining -= 1;
            self.current = self.walk.next_entry(|_| true);
        }
    }

    /// The order in which this cursor visits keys.
    #[inline]
    pub const fn direction(&self) -> Direction {
        self.walk.direction()
    }
}

impl<'a, K, V> Iterator for PersistentTreeMapIterator<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.current?;
        self.advance();
        Some(entry.as_pair())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for PersistentTreeMapIterator<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V> FusedIterator for PersistentTreeMapIterator<'_, K, V> {}

impl<K, V> Clone for PersistentTreeMapIterator<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            walk: self.walk.clone(),
            current: self.current,
            remaining: self.remaining,
        }
    }
}

/// Collects every entry in ascending order.
///
/// This is a separate two-state walk (left subtree pending or done) rather
/// than a cursor, since it always runs to completion.
pub(crate) fn entries<K, V>(root: &Link<K, V>) -> Vec<&Entry<K, V>> {
    let mut collected = Vec::with_capacity(size(root));
    let mut stack: SmallVec<[(&Node<K, V>, bool); INLINE_DEPTH]> = SmallVec::new();
    if let Some(node) = root.as_deref() {
        stack.push((node, false));
    }

    while let Some(top) = stack.last_mut() {
        let node = top.0;
        if top.1 {
            stack.pop();
            collected.push(&*node.entry);
            if let Some(right) = node.right.as_deref() {
                stack.push((right, false));
            }
        } else {
            top.1 = true;
            if let Some(left) = node.left.as_deref() {
                stack.push((left, false));
            }
        }
    }
    collected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistent::compare::NaturalOrder;
    use crate::persistent::tree::insert;
    use rstest::rstest;

    fn build(keys: impl IntoIterator<Item = i32>) -> Link<i32, i32> {
        keys.into_iter()
            .fold(None, |root, key| insert(&root, key, -key, &NaturalOrder))
    }

    fn keys(iterator: PersistentTreeMapIterator<'_, i32, i32>) -> Vec<i32> {
        iterator.map(|(key, _)| *key).collect()
    }

    #[rstest]
    fn test_ascending_walk() {
        let root = build([5, 3, 8, 1, 4, 7, 9, 2, 6]);
        let walked = keys(PersistentTreeMapIterator::new(&root, Direction::Ascending));
        assert_eq!(walked, (1..=9).collect::<Vec<_>>());
    }

    #[rstest]
    fn test_descending_walk() {
        let root = build([5, 3, 8, 1, 4, 7, 9, 2, 6]);
        let walked = keys(PersistentTreeMapIterator::new(&root, Direction::Descending));
        assert_eq!(walked, (1..=9).rev().collect::<Vec<_>>());
    }

    #[rstest]
    #[case(Direction::Ascending)]
    #[case(Direction::Descending)]
    fn test_empty_walk_is_done_immediately(#[case] direction: Direction) {
        let root: Link<i32, i32> = None;
        let mut iterator = PersistentTreeMapIterator::new(&root, direction);
        assert!(iterator.is_done());
        assert_eq!(iterator.current(), None);
        assert_eq!(iterator.len(), 0);
        iterator.advance();
        assert_eq!(iterator.next(), None);
    }

    #[rstest]
    fn test_cursor_protocol_matches_iterator() {
        let root = build(0..50);
        let mut cursor = PersistentTreeMapIterator::new(&root, Direction::Ascending);
        let mut visited = Vec::new();
        while !cursor.is_done() {
            let (key, value) = cursor.current().unwrap();
            assert_eq!(*value, -*key);
            visited.push(*key);
            cursor.advance();
        }
        assert_eq!(visited, (0..50).collect::<Vec<_>>());
        assert_eq!(cursor.len(), 0);
    }

    #[rstest]
    fn test_exact_size_counts_down() {
        let root = build(0..10);
        let mut iterator = PersistentTreeMapIterator::new(&root, Direction::Ascending);
        assert_eq!(iterator.len(), 10);
        iterator.next();
        iterator.next();
        assert_eq!(iterator.len(), 8);
        assert_eq!(iterator.size_hint(), (8, Some(8)));
    }

    #[rstest]
    fn test_clone_resumes_independently() {
        let root = build(0..6);
        let mut original = PersistentTreeMapIterator::new(&root, Direction::Ascending);
        original.next();
        original.next();
        let copy = original.clone();
        assert_eq!(keys(original), vec![2, 3, 4, 5]);
        assert_eq!(keys(copy), vec![2, 3, 4, 5]);
    }

    #[rstest]
    fn test_stack_never_exceeds_height() {
        let root = build(0..1000);
        let height = crate::persistent::node::height(&root);
        let mut walk = Walk::new(&root, Direction::Ascending, Step::Descend);
        let mut deepest = 0;
        while walk.next_entry(|_| true).is_some() {
            deepest = deepest.max(walk.stack.len());
        }
        assert!(deepest <= height);
        assert!(walk.stack.is_empty());
    }

    #[rstest]
    fn test_entries_in_ascending_order() {
        let root = build([4, 2, 6, 1, 3, 5, 7]);
        let collected: Vec<i32> = entries(&root)
            .into_iter()
            .map(|entry| *entry.key())
            .collect();
        assert_eq!(collected, vec![1, 2, 3, 4, 5, 6, 7]);
        assert!(entries::<i32, i32>(&None).is_empty());
    }
}
