//! AVL tree core: lookup, copy-on-write insertion and removal, rebalancing.
//!
//! Every function here is pure. Insertion and removal rebuild only the nodes
//! on the path from the root to the modified position and reuse every other
//! subtree by reference. All rebuilding goes through [`rotate`], which
//! restores the AVL bound on the way back up the recursion and degrades to a
//! plain node construction when the children are already balanced.

use super::ReferenceCounter;
use super::compare::Comparator;
use super::error::InvariantViolation;
use super::node::{Direction, Entry, Link, Node, combined_height, height, size};
use std::borrow::Borrow;
use std::cmp::Ordering;

/// Finds the entry whose key is equal to `key`, iteratively.
pub(crate) fn get<'a, K, V, Q, C>(
    root: &'a Link<K, V>,
    key: &Q,
    comparator: &C,
) -> Option<&'a Entry<K, V>>
where
    K: Borrow<Q>,
    Q: ?Sized,
    C: Comparator<Q>,
{
    let mut finger = root.as_ref();
    while let Some(node) = finger {
        finger = match comparator.compare(key, node.key().borrow()) {
            Ordering::Less => node.left.as_ref(),
            Ordering::Greater => node.right.as_ref(),
            Ordering::Equal => return Some(&*node.entry),
        };
    }
    None
}

/// Returns a tree that maps `key` to `value`.
///
/// An equal key already present has its entry replaced (key and value); the
/// children of that node are kept as they are.
pub(crate) fn insert<K, V, C>(link: &Link<K, V>, key: K, value: V, comparator: &C) -> Link<K, V>
where
    C: Comparator<K>,
{
    let Some(node) = link else {
        return Node::leaf(Entry::new(key, value));
    };

    match comparator.compare(&key, node.key()) {
        Ordering::Less => {
            let left = insert(&node.left, key, value, comparator);
            rotate(
                ReferenceCounter::clone(&node.entry),
                left,
                node.right.clone(),
            )
        }
        Ordering::Greater => {
            let right = insert(&node.right, key, value, comparator);
            rotate(
                ReferenceCounter::clone(&node.entry),
                node.left.clone(),
                right,
            )
        }
        Ordering::Equal => rotate(
            ReferenceCounter::new(Entry::new(key, value)),
            node.left.clone(),
            node.right.clone(),
        ),
    }
}

/// Returns a tree without `key`, or `None` if `key` is absent so that the
/// caller can keep the tree it already has.
///
/// A node with two children is replaced by its predecessor, the maximum of
/// its left subtree.
pub(crate) fn remove<K, V, Q, C>(link: &Link<K, V>, key: &Q, comparator: &C) -> Option<Link<K, V>>
where
    K: Borrow<Q>,
    Q: ?Sized,
    C: Comparator<Q>,
{
    let node = link.as_ref()?;

    match comparator.compare(key, node.key().borrow()) {
        Ordering::Less => {
            let left = remove(&node.left, key, comparator)?;
            Some(rotate(
                ReferenceCounter::clone(&node.entry),
                left,
                node.right.clone(),
            ))
        }
        Ordering::Greater => {
            let right = remove(&node.right, key, comparator)?;
            Some(rotate(
                ReferenceCounter::clone(&node.entry),
                node.left.clone(),
                right,
            ))
        }
        Ordering::Equal => Some(match (&node.left, &node.right) {
            (None, right) => right.clone(),
            (left, None) => left.clone(),
            (Some(left), Some(_)) => {
                let (left, predecessor) = remove_max(left);
                rotate(predecessor, left, node.right.clone())
            }
        }),
    }
}

/// Detaches the rightmost entry of a non-empty subtree.
fn remove_max<K, V>(
    node: &ReferenceCounter<Node<K, V>>,
) -> (Link<K, V>, ReferenceCounter<Entry<K, V>>) {
    match &node.right {
        None => (node.left.clone(), ReferenceCounter::clone(&node.entry)),
        Some(right) => {
            let (right, max) = remove_max(right);
            (
                rotate(
                    ReferenceCounter::clone(&node.entry),
                    node.left.clone(),
                    right,
                ),
                max,
            )
        }
    }
}

/// Builds a node for `entry` over `left` and `right`, rotating if their
/// heights differ by more than one.
///
/// Callers guarantee the difference is at most two, which holds after a
/// single insertion or removal below either child.
pub(crate) fn rotate<K, V>(
    entry: ReferenceCounter<Entry<K, V>>,
    left: Link<K, V>,
    right: Link<K, V>,
) -> Link<K, V> {
    let left_height = height(&left);
    let right_height = height(&right);

    if right_height > left_height + 1
        && let Some(heavy) = right.as_ref()
    {
        let (inner, outer) = (&heavy.left, &heavy.right);
        if combined_height(&left, inner) > height(outer) + 1
            && let Some(pivot) = inner.as_ref()
        {
            return Node::link(
                ReferenceCounter::clone(&pivot.entry),
                Node::link(entry, left, pivot.left.clone()),
                Node::link(
                    ReferenceCounter::clone(&heavy.entry),
                    pivot.right.clone(),
                    outer.clone(),
                ),
            );
        }
        return Node::link(
            ReferenceCounter::clone(&heavy.entry),
            Node::link(entry, left, inner.clone()),
            outer.clone(),
        );
    }

    if left_height > right_height + 1
        && let Some(heavy) = left.as_ref()
    {
        let (outer, inner) = (&heavy.left, &heavy.right);
        if combined_height(&right, inner) > height(outer) + 1
            && let Some(pivot) = inner.as_ref()
        {
            return Node::link(
                ReferenceCounter::clone(&pivot.entry),
                Node::link(
                    ReferenceCounter::clone(&heavy.entry),
                    outer.clone(),
                    pivot.left.clone(),
                ),
                Node::link(entry, pivot.right.clone(), right),
            );
        }
        return Node::link(
            ReferenceCounter::clone(&heavy.entry),
            outer.clone(),
            Node::link(entry, inner.clone(), right),
        );
    }

    Node::link(entry, left, right)
}

/// Entry at the far end of the tree on the given side.
pub(crate) fn extreme<K, V>(root: &Link<K, V>, side: Direction) -> Option<&Entry<K, V>> {
    let mut finger = root.as_ref()?;
    while let Some(next) = finger.child(side) {
        finger = next;
    }
    Some(&*finger.entry)
}

/// Verifies order, balance and the cached height and size of every node.
pub(crate) fn check_invariants<K, V, C>(
    root: &Link<K, V>,
    comparator: &C,
) -> Result<(), InvariantViolation>
where
    C: Comparator<K>,
{
    check_subtree(root, None, None, 0, comparator)
}

fn check_subtree<K, V, C>(
    link: &Link<K, V>,
    lower: Option<&K>,
    upper: Option<&K>,
    depth: usize,
    comparator: &C,
) -> Result<(), InvariantViolation>
where
    C: Comparator<K>,
{
    let Some(node) = link else {
        return Ok(());
    };
    let key = node.key();

    let above_lower = lower.is_none_or(|bound| comparator.less(bound, key));
    let below_upper = upper.is_none_or(|bound| comparator.less(key, bound));
    if !(above_lower && below_upper) {
        return Err(InvariantViolation::OutOfOrder { depth });
    }

    let left_height = height(&node.left);
    let right_height = height(&node.right);
    if left_height.abs_diff(right_height) > 1 {
        return Err(InvariantViolation::Unbalanced {
            depth,
            left_height,
            right_height,
        });
    }

    let expected = combined_height(&node.left, &node.right);
    if node.height != expected {
        return Err(InvariantViolation::HeightMismatch {
            depth,
            expected,
            actual: node.height,
        });
    }

    let expected = 1 + size(&node.left) + size(&node.right);
    if node.size != expected {
        return Err(InvariantViolation::SizeMismatch {
            depth,
            expected,
            actual: node.size,
        });
    }

    check_subtree(&node.left, lower, Some(key), depth + 1, comparator)?;
    check_subtree(&node.right, Some(key), upper, depth + 1, comparator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistent::compare::{FnComparator, NaturalOrder};
    use rstest::rstest;

    fn build(keys: &[i32]) -> Link<i32, i32> {
        keys.iter().fold(None, |root, &key| {
            insert(&root, key, key * 10, &NaturalOrder)
        })
    }

    fn root_key(root: &Link<i32, i32>) -> Option<i32> {
        root.as_ref().map(|node| *node.key())
    }

    fn child_key(root: &Link<i32, i32>, side: Direction) -> Option<i32> {
        root.as_ref()
            .and_then(|node| node.child(side).as_ref())
            .map(|node| *node.key())
    }

    fn keys_in_order(root: &Link<i32, i32>) -> Vec<i32> {
        fn collect(link: &Link<i32, i32>, keys: &mut Vec<i32>) {
            if let Some(node) = link {
                collect(&node.left, keys);
                keys.push(*node.key());
                collect(&node.right, keys);
            }
        }
        let mut keys = Vec::new();
        collect(root, &mut keys);
        keys
    }

    #[rstest]
    #[case(&[1, 2, 3])]
    #[case(&[3, 2, 1])]
    #[case(&[1, 3, 2])]
    #[case(&[3, 1, 2])]
    fn test_three_insertions_rotate_to_middle_root(#[case] keys: &[i32]) {
        let root = build(keys);
        assert_eq!(root_key(&root), Some(2));
        assert_eq!(child_key(&root, Direction::Ascending), Some(1));
        assert_eq!(child_key(&root, Direction::Descending), Some(3));
        assert_eq!(height(&root), 2);
        assert_eq!(check_invariants(&root, &NaturalOrder), Ok(()));
    }

    #[rstest]
    fn test_get_finds_present_and_misses_absent() {
        let root = build(&[5, 2, 8, 1, 9]);
        assert_eq!(get(&root, &8, &NaturalOrder).map(Entry::value), Some(&80));
        assert_eq!(get(&root, &4, &NaturalOrder), None);
        assert_eq!(get::<i32, i32, i32, _>(&None, &4, &NaturalOrder), None);
    }

    #[rstest]
    fn test_insert_equal_key_replaces_value_and_keeps_children() {
        let root = build(&[2, 1, 3]);
        let updated = insert(&root, 2, 99, &NaturalOrder);

        let (Some(before), Some(after)) = (root.as_ref(), updated.as_ref()) else {
            panic!("both trees are non-empty");
        };
        assert_eq!(after.entry.value(), &99);
        assert_eq!(before.entry.value(), &20);
        assert!(ReferenceCounter::ptr_eq(
            before.left.as_ref().unwrap(),
            after.left.as_ref().unwrap()
        ));
        assert!(ReferenceCounter::ptr_eq(
            before.right.as_ref().unwrap(),
            after.right.as_ref().unwrap()
        ));
    }

    #[rstest]
    fn test_insert_shares_untouched_subtree() {
        let root = build(&[4, 2, 6, 1, 3, 5, 7]);
        let updated = insert(&root, 8, 80, &NaturalOrder);

        let before_left = root.as_ref().and_then(|node| node.left.clone()).unwrap();
        let after_left = updated.as_ref().and_then(|node| node.left.clone()).unwrap();
        assert!(ReferenceCounter::ptr_eq(&before_left, &after_left));
        assert_eq!(keys_in_order(&root), vec![1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(keys_in_order(&updated), vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[rstest]
    fn test_remove_two_children_promotes_predecessor() {
        let root = build(&[4, 2, 6, 1, 3, 5, 7]);
        let removed = remove(&root, &4, &NaturalOrder).unwrap();

        assert_eq!(root_key(&removed), Some(3));
        assert_eq!(keys_in_order(&removed), vec![1, 2, 3, 5, 6, 7]);
        assert_eq!(check_invariants(&removed, &NaturalOrder), Ok(()));
    }

    #[rstest]
    fn test_remove_leaf_and_single_child() {
        let root = build(&[2, 1, 3, 4]);
        let without_leaf = remove(&root, &1, &NaturalOrder).unwrap();
        assert_eq!(keys_in_order(&without_leaf), vec![2, 3, 4]);
        assert_eq!(check_invariants(&without_leaf, &NaturalOrder), Ok(()));

        let without_inner = remove(&root, &3, &NaturalOrder).unwrap();
        assert_eq!(keys_in_order(&without_inner), vec![1, 2, 4]);
        assert_eq!(check_invariants(&without_inner, &NaturalOrder), Ok(()));
    }

    #[rstest]
    fn test_remove_absent_key_reports_no_change() {
        let root = build(&[2, 1, 3]);
        assert!(remove(&root, &7, &NaturalOrder).is_none());
        assert!(remove::<i32, i32, i32, _>(&None, &7, &NaturalOrder).is_none());
    }

    #[rstest]
    fn test_remove_single_rotation() {
        // Removing 1 leaves the right side two levels taller, outer-heavy.
        let root = build(&[3, 2, 5, 1, 4, 6, 7]);
        let removed = remove(&root, &1, &NaturalOrder).unwrap();
        assert_eq!(root_key(&removed), Some(5));
        assert_eq!(child_key(&removed, Direction::Ascending), Some(3));
        assert_eq!(keys_in_order(&removed), vec![2, 3, 4, 5, 6, 7]);
        assert_eq!(check_invariants(&removed, &NaturalOrder), Ok(()));
    }

    #[rstest]
    fn test_remove_double_rotation() {
        // Removing 1 leaves the right side two levels taller, inner-heavy.
        let root = build(&[3, 2, 6, 1, 5, 7, 4]);
        let removed = remove(&root, &1, &NaturalOrder).unwrap();
        assert_eq!(root_key(&removed), Some(5));
        assert_eq!(child_key(&removed, Direction::Ascending), Some(3));
        assert_eq!(child_key(&removed, Direction::Descending), Some(6));
        assert_eq!(keys_in_order(&removed), vec![2, 3, 4, 5, 6, 7]);
        assert_eq!(check_invariants(&removed, &NaturalOrder), Ok(()));
    }

    #[rstest]
    fn test_rotate_without_imbalance_just_builds() {
        let left = build(&[1]);
        let right = build(&[3, 4]);
        let root = rotate(ReferenceCounter::new(Entry::new(2, 20)), left, right);
        assert_eq!(root_key(&root), Some(2));
        assert_eq!(height(&root), 3);
        assert_eq!(size(&root), 4);
    }

    #[rstest]
    fn test_extremes() {
        let root = build(&[5, 3, 8, 1, 4, 9]);
        assert_eq!(
            extreme(&root, Direction::Ascending).map(Entry::key),
            Some(&1)
        );
        assert_eq!(
            extreme(&root, Direction::Descending).map(Entry::key),
            Some(&9)
        );
        assert!(extreme::<i32, i32>(&None, Direction::Ascending).is_none());
    }

    #[rstest]
    fn test_ascending_insertions_stay_within_avl_bound() {
        let root = (0..1000).fold(None, |root, key| insert(&root, key, key, &NaturalOrder));
        assert_eq!(size(&root), 1000);
        // 1.44 * log2(1002) rounds up to 15.
        assert!(height(&root) <= 15);
        assert_eq!(check_invariants(&root, &NaturalOrder), Ok(()));
    }

    #[rstest]
    fn test_custom_comparator_orders_descending() {
        let reversed = FnComparator::new(|left: &i32, right: &i32| left > right);
        let root = [1, 2, 3, 4]
            .iter()
            .fold(None, |root, &key| insert(&root, key, key, &reversed));
        assert_eq!(
            extreme(&root, Direction::Ascending).map(Entry::key),
            Some(&4)
        );
        assert_eq!(check_invariants(&root, &reversed), Ok(()));
        assert_eq!(
            check_invariants(&root, &NaturalOrder),
            Err(InvariantViolation::OutOfOrder { depth: 1 })
        );
    }

    /// `cmp` calls every pair equal while `<` orders by the wrapped value.
    #[derive(Debug, PartialEq, Eq)]
    struct Skewed(i32);

    #[allow(clippy::non_canonical_partial_ord_impl)]
    impl PartialOrd for Skewed {
        fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
            self.0.partial_cmp(&other.0)
        }
    }

    impl Ord for Skewed {
        fn cmp(&self, _: &Self) -> Ordering {
            Ordering::Equal
        }
    }

    #[rstest]
    fn test_natural_order_equality_comes_from_less_only() {
        let root = [2, 1, 3].into_iter().fold(None, |root, key| {
            insert(&root, Skewed(key), key, &NaturalOrder)
        });
        assert_eq!(size(&root), 3);
        assert_eq!(
            get(&root, &Skewed(1), &NaturalOrder).map(Entry::value),
            Some(&1)
        );

        let removed = remove(&root, &Skewed(1), &NaturalOrder).unwrap();
        assert_eq!(size(&removed), 2);
        assert!(get(&removed, &Skewed(1), &NaturalOrder).is_none());
        assert_eq!(
            get(&removed, &Skewed(2), &NaturalOrder).map(Entry::value),
            Some(&2)
        );
    }

    #[rstest]
    fn test_check_invariants_detects_unbalanced_chain() {
        let chain = Node::link(
            ReferenceCounter::new(Entry::new(1, 1)),
            None,
            Node::link(ReferenceCounter::new(Entry::new(2, 2)), None, build(&[3])),
        );
        assert_eq!(
            check_invariants(&chain, &NaturalOrder),
            Err(InvariantViolation::Unbalanced {
                depth: 0,
                left_height: 0,
                right_height: 2,
            })
        );
    }
}
