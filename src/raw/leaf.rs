use core::cmp::Ordering::{Equal, Greater, Less};
use core::fmt;

use smallvec::SmallVec;

use super::arena::Handle;
use super::node::{Direction, PositionalRemoval};
use super::order::{INLINE_SLOTS, Order};
use crate::compare::Compare;

/// Outcome of a directional search inside one leaf.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum LeafSlot {
    /// The boundary element lives in this leaf at the given offset.
    At(usize),
    /// The boundary is the first element of the next leaf, if there is one.
    StepNext,
    /// The boundary is the last element of the previous leaf, if there is one.
    StepPrev,
}

// B+Tree: leaves own every value and form a doubly linked chain in sorted order.
#[derive(Clone)]
pub(crate) struct LeafNode<T> {
    prev: Option<Handle>,
    next: Option<Handle>,
    // One spare slot holds the overflowing item until the split completes.
    values: SmallVec<[T; INLINE_SLOTS]>,
}

impl<T> LeafNode<T> {
    pub(crate) fn new() -> Self {
        Self {
            prev: None,
            next: None,
            values: SmallVec::new(),
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub(crate) fn values(&self) -> &[T] {
        &self.values
    }

    #[inline]
    pub(crate) fn value(&self, offset: usize) -> &T {
        &self.values[offset]
    }

    /// The separator key this leaf exposes to its parent.
    ///
    /// # Panics
    ///
    /// Panics if the leaf is empty, which only the sole leaf of a tree may be.
    #[inline]
    pub(crate) fn header(&self) -> &T {
        self.values.first().expect("`LeafNode::header()` - leaf is empty!")
    }

    #[inline]
    pub(crate) fn prev(&self) -> Option<Handle> {
        self.prev
    }

    #[inline]
    pub(crate) fn next(&self) -> Option<Handle> {
        self.next
    }

    pub(crate) fn set_prev(&mut self, prev: Option<Handle>) {
        self.prev = prev;
    }

    pub(crate) fn set_next(&mut self, next: Option<Handle>) {
        self.next = next;
    }

    /// Moves every value out, leaving the leaf empty but still linked.
    pub(crate) fn take_values(&mut self) -> SmallVec<[T; INLINE_SLOTS]> {
        core::mem::take(&mut self.values)
    }

    #[cfg(test)]
    pub(crate) fn push(&mut self, item: T) {
        self.values.push(item);
    }

    /// Removes the value at a position inside the window `[offset, offset + len)`
    /// of the global sequence, or reports the offset of the next leaf.
    pub(crate) fn remove_at(&mut self, index: usize, offset: usize) -> PositionalRemoval<T> {
        match index.checked_sub(offset) {
            Some(local) if local < self.values.len() => PositionalRemoval::Removed(self.values.remove(local)),
            _ => PositionalRemoval::Passed {
                offset: offset + self.values.len(),
            },
        }
    }

    /// Evens out the counts of `self` and its right neighbor `right`.
    ///
    /// With `total = self.len() + right.len()`, `self` ends up holding
    /// `total / 2` values and `right` the rest. Values keep their global order.
    pub(crate) fn redistribute(&mut self, right: &mut Self) {
        let total = self.values.len() + right.values.len();
        let half = total / 2;

        if self.values.len() < half {
            let moved = half - self.values.len();
            self.values.extend(right.values.drain(..moved));
        } else if self.values.len() > half {
            let moved: SmallVec<[T; INLINE_SLOTS]> = self.values.drain(half..).collect();
            right.values.insert_many(0, moved);
        }
    }

    /// Absorbs the right neighbor. The caller must re-point the far neighbor's
    /// `prev` link at `self` and release `right`'s slot.
    pub(crate) fn merge(&mut self, mut right: Self) {
        self.values.append(&mut right.values);
        self.next = right.next;
    }
}

impl<T> LeafNode<T> {
    /// First offset whose value is greater than `item`.
    #[inline]
    pub(crate) fn upper_bound<C: Compare<T>>(&self, item: &T, cmp: &C) -> usize {
        self.values.partition_point(|v| cmp.compare(v, item) != Greater)
    }

    /// First offset whose value is not less than `item`.
    #[inline]
    pub(crate) fn lower_bound<C: Compare<T>>(&self, item: &T, cmp: &C) -> usize {
        self.values.partition_point(|v| cmp.compare(v, item) == Less)
    }

    /// Inserts `item` after any values equal to it.
    ///
    /// When the leaf was already full, it keeps the lower `m_size + 1` values and
    /// the upper `m_size + 1` are returned as an unlinked right sibling.
    pub(crate) fn insert<C: Compare<T>>(&mut self, item: T, order: Order, cmp: &C) -> Option<Self> {
        let at = self.upper_bound(&item, cmp);
        self.values.insert(at, item);

        if self.values.len() <= order.bracket_size() {
            return None;
        }

        let mut right = Self::new();
        right.values.extend(self.values.drain(order.m_size() + 1..));
        Some(right)
    }

    /// Removes the first value equal to `item`.
    pub(crate) fn remove<C: Compare<T>>(&mut self, item: &T, cmp: &C) -> Option<T> {
        let at = self.first_equal(item, cmp)?;
        Some(self.values.remove(at))
    }

    /// Offset of the first value equal to `item`.
    pub(crate) fn first_equal<C: Compare<T>>(&self, item: &T, cmp: &C) -> Option<usize> {
        let at = self.lower_bound(item, cmp);
        (at < self.values.len() && cmp.compare(&self.values[at], item) == Equal).then_some(at)
    }

    /// Offset of the last value equal to `item`.
    pub(crate) fn last_equal<C: Compare<T>>(&self, item: &T, cmp: &C) -> Option<usize> {
        let at = self.upper_bound(item, cmp).checked_sub(1)?;
        (cmp.compare(&self.values[at], item) == Equal).then_some(at)
    }

    /// Locates the boundary for `direction` relative to `item`.
    pub(crate) fn search<C: Compare<T>>(&self, item: &T, direction: Direction, cmp: &C) -> LeafSlot {
        match direction {
            Direction::Greater | Direction::GreaterOrEqual => {
                let at = if direction == Direction::Greater {
                    self.upper_bound(item, cmp)
                } else {
                    self.lower_bound(item, cmp)
                };
                if at < self.values.len() {
                    LeafSlot::At(at)
                } else {
                    LeafSlot::StepNext
                }
            }
            Direction::Less | Direction::LessOrEqual => {
                let end = if direction == Direction::LessOrEqual {
                    self.upper_bound(item, cmp)
                } else {
                    self.lower_bound(item, cmp)
                };
                match end.checked_sub(1) {
                    Some(at) => LeafSlot::At(at),
                    None => LeafSlot::StepPrev,
                }
            }
        }
    }
}

impl<T: fmt::Display> LeafNode<T> {
    /// Writes one line listing this leaf's values.
    pub(crate) fn dump(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        write!(f, "{:indent$}", "", indent = depth)?;
        for value in &self.values {
            write!(f, "{value},")?;
        }
        writeln!(f)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::compare::Natural;
    use alloc::vec::Vec;

    fn leaf(values: &[(i32, char)]) -> LeafNode<(i32, char)> {
        let mut leaf = LeafNode::new();
        for &v in values {
            leaf.push(v);
        }
        leaf
    }

    // Compares on the number only so the tag reveals insertion order.
    fn by_key(a: &(i32, char), b: &(i32, char)) -> core::cmp::Ordering {
        a.0.cmp(&b.0)
    }

    #[test]
    fn equal_items_keep_insertion_order() {
        let order = Order::new(8).unwrap();
        let mut node = LeafNode::new();
        for item in [(2, 'a'), (1, 'b'), (2, 'c'), (2, 'd'), (1, 'e')] {
            assert!(node.insert(item, order, &by_key).is_none());
        }
        assert_eq!(node.values(), [(1, 'b'), (1, 'e'), (2, 'a'), (2, 'c'), (2, 'd')]);
        assert_eq!(node.first_equal(&(2, '?'), &by_key), Some(2));
        assert_eq!(node.last_equal(&(2, '?'), &by_key), Some(4));
        assert_eq!(node.first_equal(&(3, '?'), &by_key), None);
    }

    #[test]
    fn full_leaf_splits_into_halves() {
        let order = Order::new(4).unwrap();
        for new_item in [0, 25, 99] {
            let mut node: LeafNode<i32> = LeafNode::new();
            for v in [10, 20, 30, 40, 50] {
                assert!(node.insert(v, order, &Natural).is_none());
            }

            let right = node.insert(new_item, order, &Natural).expect("leaf should split");
            assert_eq!(node.len(), order.m_size() + 1);
            assert_eq!(right.len(), order.m_size() + 1);

            let mut all: Vec<i32> = node.values().to_vec();
            all.extend_from_slice(right.values());
            let mut expected = alloc::vec![10, 20, 30, 40, 50, new_item];
            expected.sort_unstable();
            assert_eq!(all, expected);
        }
    }

    #[test]
    fn remove_takes_first_equal() {
        let mut node = leaf(&[(1, 'a'), (2, 'b'), (2, 'c'), (3, 'd')]);
        assert_eq!(node.remove(&(2, '?'), &by_key), Some((2, 'b')));
        assert_eq!(node.remove(&(5, '?'), &by_key), None);
        assert_eq!(node.values(), [(1, 'a'), (2, 'c'), (3, 'd')]);
    }

    #[test]
    fn remove_at_threads_offset() {
        let mut node = leaf(&[(1, 'a'), (2, 'b'), (3, 'c')]);
        match node.remove_at(2, 10) {
            PositionalRemoval::Passed { offset } => assert_eq!(offset, 13),
            PositionalRemoval::Removed(_) => panic!("index 2 precedes this leaf"),
        }
        match node.remove_at(14, 10) {
            PositionalRemoval::Passed { offset } => assert_eq!(offset, 13),
            PositionalRemoval::Removed(_) => panic!("index 14 follows this leaf"),
        }
        match node.remove_at(11, 10) {
            PositionalRemoval::Removed(v) => assert_eq!(v, (2, 'b')),
            PositionalRemoval::Passed { .. } => panic!("index 11 is inside this leaf"),
        }
    }

    #[test]
    fn redistribute_moves_in_both_directions() {
        let mut left = leaf(&[(1, 'a')]);
        let mut right = leaf(&[(2, 'a'), (3, 'a'), (4, 'a'), (5, 'a'), (6, 'a')]);
        left.redistribute(&mut right);
        assert_eq!(left.len(), 3);
        assert_eq!(right.len(), 3);
        assert_eq!(left.values()[2], (3, 'a'));
        assert_eq!(right.values()[0], (4, 'a'));

        let mut left = leaf(&[(1, 'a'), (2, 'a'), (3, 'a'), (4, 'a'), (5, 'a')]);
        let mut right = leaf(&[(6, 'a'), (7, 'a')]);
        left.redistribute(&mut right);
        assert_eq!(left.len(), 3);
        assert_eq!(right.values(), [(4, 'a'), (5, 'a'), (6, 'a'), (7, 'a')]);
    }

    #[test]
    fn merge_appends_and_takes_next_link() {
        let mut arena = super::super::arena::Arena::new();
        let far = arena.alloc(());

        let mut left = leaf(&[(1, 'a'), (2, 'a')]);
        let mut right = leaf(&[(3, 'a')]);
        right.set_next(Some(far));
        left.merge(right);

        assert_eq!(left.values(), [(1, 'a'), (2, 'a'), (3, 'a')]);
        assert_eq!(left.next(), Some(far));
    }

    #[test]
    fn directional_search_steps_off_the_edges() {
        let node = leaf(&[(3, 'a'), (4, 'a'), (6, 'a'), (6, 'b'), (7, 'a')]);
        let find = |v: i32, d: Direction| node.search(&(v, '?'), d, &by_key);

        assert_eq!(find(6, Direction::Greater), LeafSlot::At(4));
        assert_eq!(find(6, Direction::GreaterOrEqual), LeafSlot::At(2));
        assert_eq!(find(6, Direction::Less), LeafSlot::At(1));
        assert_eq!(find(6, Direction::LessOrEqual), LeafSlot::At(3));

        assert_eq!(find(7, Direction::Greater), LeafSlot::StepNext);
        assert_eq!(find(8, Direction::GreaterOrEqual), LeafSlot::StepNext);
        assert_eq!(find(3, Direction::Less), LeafSlot::StepPrev);
        assert_eq!(find(2, Direction::LessOrEqual), LeafSlot::StepPrev);
    }
}
