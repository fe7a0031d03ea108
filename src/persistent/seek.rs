//! Iteration starting at a boundary key.
//!
//! A seek runs in two phases. While seeking, every node on the path from the
//! root is compared against the boundary: nodes on the wrong side are
//! skipped together with their own-side subtree, nodes on the right side are
//! stacked to be yielded. The phase ends with the first entry produced, which
//! is the closest key on the traversal's side of the boundary. From there on
//! the walk continues exactly like a full traversal, with no further
//! comparisons.

use super::compare::Comparator;
use super::iter::{Step, Walk};
use super::node::{Direction, Entry, Link};
use std::borrow::Borrow;
use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::ops::{Bound, RangeBounds};

/// Whether `key` lies on the traversal's side of `start`.
fn in_range<Q, C>(key: &Q, direction: Direction, start: Bound<&Q>, comparator: &C) -> bool
where
    Q: ?Sized,
    C: Comparator<Q>,
{
    match (direction, start) {
        (_, Bound::Unbounded) => true,
        (Direction::Ascending, Bound::Included(bound)) => !comparator.less(key, bound),
        (Direction::Ascending, Bound::Excluded(bound)) => comparator.less(bound, key),
        (Direction::Descending, Bound::Included(bound)) => !comparator.less(bound, key),
        (Direction::Descending, Bound::Excluded(bound)) => comparator.less(key, bound),
    }
}

/// A cursor over the entries of a [`PersistentTreeMap`](super::PersistentTreeMap)
/// from a boundary key onward.
///
/// Created by [`iter_from`](super::PersistentTreeMap::iter_from) and
/// [`iter_backward_from`](super::PersistentTreeMap::iter_backward_from). The
/// first entry is the boundary key itself when present, otherwise the nearest
/// key past it in the traversal's direction. Locating it costs O(log n);
/// every later step is amortized O(1).
///
/// # Examples
///
/// ```rust
/// use ordmap::persistent::PersistentTreeMap;
///
/// let map: PersistentTreeMap<i32, i32> = (0..10).map(|key| (key * 10, key)).collect();
///
/// let forward: Vec<i32> = map.iter_from(&35).map(|(key, _)| *key).collect();
/// assert_eq!(forward, vec![40, 50, 60, 70, 80, 90]);
///
/// let backward: Vec<i32> = map.iter_backward_from(&35).map(|(key, _)| *key).collect();
/// assert_eq!(backward, vec![30, 20, 10, 0]);
/// ```
pub struct PersistentTreeMapSeekIterator<'a, K, V> {
    walk: Walk<'a, K, V>,
    current: Option<&'a Entry<K, V>>,
}

impl<'a, K, V> PersistentTreeMapSeekIterator<'a, K, V> {
    /// Runs the seek phase and positions the cursor on its first entry.
    ///
    /// The boundary is only needed until then, so it is not retained.
    pub(crate) fn new<Q, C>(
        root: &'a Link<K, V>,
        direction: Direction,
        start: Bound<&Q>,
        comparator: &C,
    ) -> Self
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        let step = match start {
            Bound::Unbounded => Step::Descend,
            Bound::Included(_) | Bound::Excluded(_) => Step::Seek,
        };
        let mut walk = Walk::new(root, direction, step);
        let current = walk.next_entry(|key| in_range(key.borrow(), direction, start, comparator));
        Self { walk, current }
    }

    /// Returns `true` once no entries remain.
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
            self.current = self.walk.next_entry(|_| true);
        }
    }

    /// The order in which this cursor visits keys.
    #[inline]
    pub const fn direction(&self) -> Direction {
        self.walk.direction()
    }
}

impl<'a, K, V> Iterator for PersistentTreeMapSeekIterator<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.current?;
        self.advance();
        Some(entry.as_pair())
    }
}

impl<K, V> FusedIterator for PersistentTreeMapSeekIterator<'_, K, V> {}

impl<K, V> Clone for PersistentTreeMapSeekIterator<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            walk: self.walk.clone(),
            current: self.current,
        }
    }
}

/// An ascending iterator over the entries whose keys fall within a range.
///
/// Created by [`PersistentTreeMap::range`](super::PersistentTreeMap::range).
/// The start bound is located with a seek; the end bound is checked against
/// each entry and ends the iteration at the first key past it. A range whose
/// start lies after its end is empty.
pub struct PersistentTreeMapRangeIterator<'a, K, V, C, Q: ?Sized, R> {
    inner: PersistentTreeMapSeekIterator<'a, K, V>,
    range: R,
    comparator: &'a C,
    finished: bool,
    marker: PhantomData<fn(&Q)>,
}

impl<'a, K, V, C, Q, R> PersistentTreeMapRangeIterator<'a, K, V, C, Q, R>
where
    K: Borrow<Q>,
    Q: ?Sized,
    C: Comparator<Q>,
    R: RangeBounds<Q>,
{
    pub(crate) fn new(root: &'a Link<K, V>, range: R, comparator: &'a C) -> Self {
        let inner = PersistentTreeMapSeekIterator::new(
            root,
            Direction::Ascending,
            range.start_bound(),
            comparator,
        );
        Self {
            inner,
            range,
            comparator,
            finished: false,
            marker: PhantomData,
        }
    }

    fn below_end(&self, key: &Q) -> bool {
        match self.range.end_bound() {
            Bound::Included(end) => !self.comparator.less(end, key),
            Bound::Excluded(end) => self.comparator.less(key, end),
            Bound::Unbounded => true,
        }
    }
}

impl<'a, K, V, C, Q, R> Iterator for PersistentTreeMapRangeIterator<'a, K, V, C, Q, R>
where
    K: Borrow<Q>,
    Q: ?Sized,
    C: Comparator<Q>,
    R: RangeBounds<Q>,
{
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let (key, value) = self.inner.next()?;
        if self.below_end(key.borrow()) {
            Some((key, value))
        } else {
            self.finished = true;
            None
        }
    }
}

impl<K, V, C, Q, R> FusedIterator for PersistentTreeMapRangeIterator<'_, K, V, C, Q, R>
where
    K: Borrow<Q>,
    Q: ?Sized,
    C: Comparator<Q>,
    R: RangeBounds<Q>,
{
}
