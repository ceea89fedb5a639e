use alloc::vec::Vec;
use core::cmp::Ordering::{Equal, Greater, Less};
use core::fmt;

use tracing::{debug, trace};

use super::arena::{Arena, Handle};
use super::branch::BranchNode;
use super::leaf::{LeafNode, LeafSlot};
use super::node::{Direction, Node, PositionalRemoval, SplitOutcome};
use super::order::Order;
use crate::compare::Compare;

/// Where a directional search landed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Boundary {
    /// Every element fails the target on the low side.
    BeforeFirst,
    At { leaf: Handle, offset: usize },
    /// Every element fails the target on the high side.
    AfterLast,
}

/// The tree controller.
///
/// `root` is `None` until the first leaf split; until then `start` is the
/// whole tree. `start` and `end` always name the leftmost and rightmost
/// leaves, and an empty tree still owns one empty leaf.
#[derive(Clone)]
pub(crate) struct RawBPlusTree<T, C> {
    nodes: Arena<Node<T>>,
    root: Option<Handle>,
    start: Handle,
    end: Handle,
    len: usize,
    order: Order,
    cmp: C,
}

impl<T, C> RawBPlusTree<T, C> {
    pub(crate) fn new(order: Order, cmp: C) -> Self {
        let mut nodes = Arena::new();
        let start = nodes.alloc(Node::Leaf(LeafNode::new()));
        Self {
            nodes,
            root: None,
            start,
            end: start,
            len: 0,
            order,
            cmp,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) fn order(&self) -> Order {
        self.order
    }

    #[inline]
    pub(crate) fn comparator(&self) -> &C {
        &self.cmp
    }

    #[inline]
    pub(crate) fn start(&self) -> Handle {
        self.start
    }

    #[inline]
    pub(crate) fn end(&self) -> Handle {
        self.end
    }

    #[inline]
    pub(crate) fn leaf(&self, handle: Handle) -> &LeafNode<T> {
        self.nodes.get(handle).as_leaf()
    }

    #[inline]
    fn leaf_mut(&mut self, handle: Handle) -> &mut LeafNode<T> {
        self.nodes.get_mut(handle).as_leaf_mut()
    }

    fn header_leaf_of(&self, handle: Handle) -> Handle {
        match self.nodes.get(handle) {
            Node::Leaf(_) => handle,
            Node::Branch(branch) => branch.header_leaf(),
        }
    }

    /// The header item of any node: the first value of its leftmost leaf.
    fn header(&self, handle: Handle) -> &T {
        self.leaf(self.header_leaf_of(handle)).header()
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.start = self.nodes.alloc(Node::Leaf(LeafNode::new()));
        self.end = self.start;
        self.root = None;
        let dropped = core::mem::take(&mut self.len);
        debug!(dropped, "b+tree cleared");
    }

    pub(crate) fn first(&self) -> Option<&T> {
        self.leaf(self.start).values().first()
    }

    pub(crate) fn last(&self) -> Option<&T> {
        self.leaf(self.end).values().last()
    }

    /// Finds the leaf and offset holding the element at `index` by walking the
    /// leaf chain from `start`.
    pub(crate) fn locate(&self, index: usize) -> Option<(Handle, usize)> {
        if index >= self.len {
            return None;
        }

        let mut current = self.start;
        let mut remaining = index;
        loop {
            let leaf = self.leaf(current);
            if remaining < leaf.len() {
                return Some((current, remaining));
            }
            remaining -= leaf.len();
            current = leaf.next()?;
        }
    }

    pub(crate) fn get(&self, index: usize) -> Option<&T> {
        let (leaf, offset) = self.locate(index)?;
        Some(self.leaf(leaf).value(offset))
    }

    /// Global index of `offset` inside `leaf`: the counts of every leaf to the
    /// left plus the offset.
    pub(crate) fn global_index(&self, leaf: Handle, offset: usize) -> usize {
        let mut index = offset;
        let mut current = self.leaf(leaf).prev();
        while let Some(handle) = current {
            let prev = self.leaf(handle);
            index += prev.len();
            current = prev.prev();
        }
        index
    }

    /// Moves every value out in order and resets the tree.
    pub(crate) fn drain_values(&mut self) -> Vec<T> {
        let mut values = Vec::with_capacity(self.len);
        let mut current = Some(self.start);
        while let Some(handle) = current {
            let leaf = self.leaf_mut(handle);
            values.extend(leaf.take_values());
            current = leaf.next();
        }
        self.clear();
        values
    }
}

impl<T, C: Compare<T>> RawBPlusTree<T, C> {
    pub(crate) fn insert(&mut self, item: T) {
        let top = self.root.unwrap_or(self.start);
        if let SplitOutcome::Split(sibling) = self.insert_into(top, item) {
            let header_leaf = self.header_leaf_of(top);
            let root = self.nodes.alloc(Node::Branch(BranchNode::with_children(top, sibling, header_leaf)));
            self.root = Some(root);
            trace!(?root, "b+tree grew a level");
        }
        self.len += 1;
    }

    fn insert_into(&mut self, handle: Handle, item: T) -> SplitOutcome {
        if self.nodes.get(handle).is_leaf() {
            return self.insert_into_leaf(handle, item);
        }

        let branch = self.nodes.get(handle).as_branch();
        let slot = branch.route(|child| self.cmp.compare(self.header(child), &item) != Greater);
        let child = branch.child(slot);

        let SplitOutcome::Split(sibling) = self.insert_into(child, item) else {
            return SplitOutcome::Absorbed;
        };

        let order = self.order;
        let Some(moved) = self.nodes.get_mut(handle).as_branch_mut().insert_child(slot + 1, sibling, order) else {
            return SplitOutcome::Absorbed;
        };

        let header_leaf = self.header_leaf_of(moved[0]);
        let right = self.nodes.alloc(Node::Branch(BranchNode::from_children(moved, header_leaf)));
        trace!(branch = ?handle, sibling = ?right, "branch split");
        SplitOutcome::Split(right)
    }

    fn insert_into_leaf(&mut self, handle: Handle, item: T) -> SplitOutcome {
        let order = self.order;
        let leaf = self.nodes.get_mut(handle).as_leaf_mut();
        let Some(mut right) = leaf.insert(item, order, &self.cmp) else {
            return SplitOutcome::Absorbed;
        };

        let old_next = leaf.next();
        right.set_prev(Some(handle));
        right.set_next(old_next);
        let sibling = self.nodes.alloc(Node::Leaf(right));
        self.leaf_mut(handle).set_next(Some(sibling));
        match old_next {
            Some(next) => self.leaf_mut(next).set_prev(Some(sibling)),
            None => self.end = sibling,
        }

        trace!(leaf = ?handle, ?sibling, "leaf split");
        SplitOutcome::Split(sibling)
    }

    /// Removes and returns the first element equal to `item`.
    pub(crate) fn take(&mut self, item: &T) -> Option<T> {
        let removed = match self.root {
            None => {
                let start = self.start;
                self.nodes.get_mut(start).as_leaf_mut().remove(item, &self.cmp)
            }
            Some(root) => {
                let removed = self.remove_from(root, item);
                if removed.is_some() {
                    self.collapse_root(root);
                }
                removed
            }
        }?;

        self.len -= 1;
        Some(removed)
    }

    fn remove_from(&mut self, handle: Handle, item: &T) -> Option<T> {
        if self.nodes.get(handle).is_leaf() {
            return self.nodes.get_mut(handle).as_leaf_mut().remove(item, &self.cmp);
        }

        let branch = self.nodes.get(handle).as_branch();
        let slot = branch.route(|child| self.cmp.compare(self.header(child), item) == Less);
        let child = branch.child(slot);
        let next = branch.children().get(slot + 1).copied();

        if let Some(removed) = self.remove_from(child, item) {
            self.rebalance_child(handle, slot);
            return Some(removed);
        }

        // A run of equal items can begin exactly at the next child's header.
        let next = next.filter(|&next| self.cmp.compare(self.header(next), item) == Equal)?;
        let removed = self.remove_from(next, item)?;
        self.rebalance_child(handle, slot + 1);
        Some(removed)
    }

    /// Removes the element at `index`, visiting nodes in sequence order.
    pub(crate) fn remove_at(&mut self, index: usize) -> Option<T> {
        if index >= self.len {
            return None;
        }

        let top = self.root.unwrap_or(self.start);
        let PositionalRemoval::Removed(removed) = self.remove_at_from(top, index, 0) else {
            return None;
        };
        if let Some(root) = self.root {
            self.collapse_root(root);
        }

        self.len -= 1;
        Some(removed)
    }

    fn remove_at_from(&mut self, handle: Handle, index: usize, mut offset: usize) -> PositionalRemoval<T> {
        if self.nodes.get(handle).is_leaf() {
            return self.leaf_mut(handle).remove_at(index, offset);
        }

        let children = self.nodes.get(handle).as_branch().len();
        for slot in 0..children {
            let child = self.nodes.get(handle).as_branch().child(slot);
            match self.remove_at_from(child, index, offset) {
                PositionalRemoval::Removed(removed) => {
                    self.rebalance_child(handle, slot);
                    return PositionalRemoval::Removed(removed);
                }
                PositionalRemoval::Passed { offset: passed } => offset = passed,
            }
        }
        PositionalRemoval::Passed { offset }
    }

    /// Restores the fill of `parent`'s child at `idx` after a removal.
    ///
    /// Tried in order: borrow from the left sibling, borrow from the right
    /// sibling, merge into the left sibling, absorb the right sibling.
    fn rebalance_child(&mut self, parent: Handle, idx: usize) {
        let order = self.order;
        let branch = self.nodes.get(parent).as_branch();
        let target = branch.child(idx);
        if !order.underflows(self.nodes.get(target).count()) {
            return;
        }

        let left = idx.checked_sub(1).map(|at| branch.child(at));
        let right = branch.children().get(idx + 1).copied();

        if let Some(left) = left
            && order.can_lend(self.nodes.get(left).count())
        {
            self.redistribute(left, target);
        } else if let Some(right) = right
            && order.can_lend(self.nodes.get(right).count())
        {
            self.redistribute(target, right);
        } else if let Some(left) = left {
            self.merge(left, target);
            self.nodes.get_mut(parent).as_branch_mut().remove_child(idx);
        } else if let Some(right) = right {
            self.merge(target, right);
            self.nodes.get_mut(parent).as_branch_mut().remove_child(idx + 1);
        }
    }

    fn redistribute(&mut self, left: Handle, right: Handle) {
        let new_first = match self.nodes.pair_mut(left, right) {
            (Node::Leaf(l), Node::Leaf(r)) => {
                l.redistribute(r);
                None
            }
            (Node::Branch(l), Node::Branch(r)) => {
                l.redistribute(r);
                Some(r.child(0))
            }
            _ => unreachable!("siblings always sit at the same depth"),
        };

        if let Some(first) = new_first {
            let header_leaf = self.header_leaf_of(first);
            self.nodes.get_mut(right).as_branch_mut().set_header_leaf(header_leaf);
        }
        trace!(?left, ?right, "redistributed siblings");
    }

    /// Folds `right` into `left` and frees `right`. The caller drops the
    /// parent's slot for `right`.
    fn merge(&mut self, left: Handle, right: Handle) {
        match self.nodes.take(right) {
            Node::Leaf(absorbed) => {
                let far = absorbed.next();
                self.leaf_mut(left).merge(absorbed);
                match far {
                    Some(far) => self.leaf_mut(far).set_prev(Some(left)),
                    None => self.end = left,
                }
            }
            Node::Branch(absorbed) => self.nodes.get_mut(left).as_branch_mut().merge(absorbed),
        }
        trace!(?left, ?right, "merged siblings");
    }

    /// Drops a root left with a single child.
    fn collapse_root(&mut self, root: Handle) {
        let branch = self.nodes.get(root).as_branch();
        if branch.len() > 1 {
            return;
        }

        let sole = branch.child(0);
        self.nodes.take(root);
        if self.nodes.get(sole).is_leaf() {
            self.root = None;
            self.start = sole;
            self.end = sole;
        } else {
            self.root = Some(sole);
        }
        trace!(?sole, "b+tree lost a level");
    }

    fn descend(&self, item: &T, direction: Direction) -> Handle {
        let mut current = self.root.unwrap_or(self.start);
        while let Node::Branch(branch) = self.nodes.get(current) {
            let slot = if direction.routes_through_equal() {
                branch.route(|child| self.cmp.compare(self.header(child), item) != Greater)
            } else {
                branch.route(|child| self.cmp.compare(self.header(child), item) == Less)
            };
            current = branch.child(slot);
        }
        current
    }

    pub(crate) fn search(&self, item: &T, direction: Direction) -> Boundary {
        let handle = self.descend(item, direction);
        let leaf = self.leaf(handle);
        match leaf.search(item, direction, &self.cmp) {
            LeafSlot::At(offset) => Boundary::At { leaf: handle, offset },
            LeafSlot::StepNext => match leaf.next() {
                Some(next) => Boundary::At { leaf: next, offset: 0 },
                None => Boundary::AfterLast,
            },
            LeafSlot::StepPrev => match leaf.prev() {
                Some(prev) => Boundary::At {
                    leaf: prev,
                    offset: self.leaf(prev).len() - 1,
                },
                None => Boundary::BeforeFirst,
            },
        }
    }

    /// Leaf and offset of the first element equal to `item`.
    pub(crate) fn find_first(&self, item: &T) -> Option<(Handle, usize)> {
        let handle = self.descend(item, Direction::GreaterOrEqual);
        let leaf = self.leaf(handle);
        if let Some(offset) = leaf.first_equal(item, &self.cmp) {
            return Some((handle, offset));
        }

        let next = leaf.next()?;
        (self.cmp.compare(self.leaf(next).header(), item) == Equal).then_some((next, 0))
    }

    /// Leaf and offset of the last element equal to `item`.
    pub(crate) fn find_last(&self, item: &T) -> Option<(Handle, usize)> {
        let handle = self.descend(item, Direction::LessOrEqual);
        let leaf = self.leaf(handle);
        if let Some(offset) = leaf.last_equal(item, &self.cmp) {
            return Some((handle, offset));
        }

        let prev = leaf.prev()?;
        let prev_leaf = self.leaf(prev);
        let offset = prev_leaf.len() - 1;
        (self.cmp.compare(prev_leaf.value(offset), item) == Equal).then_some((prev, offset))
    }

    pub(crate) fn index_of(&self, item: &T) -> Option<usize> {
        let (leaf, offset) = self.find_first(item)?;
        Some(self.global_index(leaf, offset))
    }

    pub(crate) fn last_index_of(&self, item: &T) -> Option<usize> {
        let (leaf, offset) = self.find_last(item)?;
        Some(self.global_index(leaf, offset))
    }
}

impl<T: fmt::Display, C> RawBPlusTree<T, C> {
    /// Writes the nested shape of the tree, one line per node.
    pub(crate) fn dump(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.dump_node(f, self.root.unwrap_or(self.start), 0)
    }

    fn dump_node(&self, f: &mut fmt::Formatter<'_>, handle: Handle, depth: usize) -> fmt::Result {
        match self.nodes.get(handle) {
            Node::Leaf(leaf) => leaf.dump(f, depth),
            Node::Branch(branch) => {
                writeln!(f, "{:indent$}・{}({})", "", self.header(handle), branch.len(), indent = depth)?;
                for &child in branch.children() {
                    self.dump_node(f, child, depth + 1)?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::compare::Natural;
    use alloc::string::{String, ToString};
    use alloc::vec;
    use proptest::prelude::*;

    fn tree(hint: usize) -> RawBPlusTree<u32, Natural> {
        RawBPlusTree::new(Order::new(hint).unwrap(), Natural)
    }

    impl<T, C: Compare<T>> RawBPlusTree<T, C> {
        fn values(&self) -> Vec<&T> {
            let mut out = Vec::new();
            let mut current = Some(self.start);
            while let Some(handle) = current {
                let leaf = self.leaf(handle);
                out.extend(leaf.values());
                current = leaf.next();
            }
            out
        }

        fn height(&self) -> usize {
            let mut height = 1;
            let mut current = self.root.unwrap_or(self.start);
            while let Node::Branch(branch) = self.nodes.get(current) {
                height += 1;
                current = branch.child(0);
            }
            height
        }

        pub(crate) fn validate_invariants(&self) {
            let mut errors: Vec<String> = Vec::new();

            let Some(root) = self.root else {
                let leaf = self.leaf(self.start);
                assert_eq!(self.start, self.end, "single leaf tree must have start == end");
                assert!(leaf.prev().is_none() && leaf.next().is_none(), "sole leaf must be unlinked");
                assert_eq!(leaf.len(), self.len, "len mismatch on single leaf tree");
                assert!(leaf.len() <= self.order.bracket_size(), "sole leaf overflows");
                assert_eq!(self.nodes.len(), 1, "single leaf tree must own exactly one node");
                return;
            };

            // 1. Structure, fill bounds and header caches
            let mut leaves: Vec<Handle> = Vec::new();
            let mut leaf_depth: Option<usize> = None;
            let mut reachable = 0;
            self.validate_node(root, 0, true, &mut leaf_depth, &mut leaves, &mut reachable, &mut errors);
            if self.nodes.len() != reachable {
                errors.push(alloc::format!("arena holds {} nodes, {} reachable", self.nodes.len(), reachable));
            }

            // 2. Leaf chain matches the in-order leaves
            if leaves.first() != Some(&self.start) {
                errors.push(alloc::format!("start {:?} is not the leftmost leaf", self.start));
            }
            if leaves.last() != Some(&self.end) {
                errors.push(alloc::format!("end {:?} is not the rightmost leaf", self.end));
            }
            for (i, &handle) in leaves.iter().enumerate() {
                let leaf = self.leaf(handle);
                let expected_prev = i.checked_sub(1).map(|p| leaves[p]);
                let expected_next = leaves.get(i + 1).copied();
                if leaf.prev() != expected_prev || leaf.next() != expected_next {
                    errors.push(alloc::format!("leaf {handle:?} has broken links"));
                }
            }

            // 3. Global order and len
            let values = self.values();
            if values.len() != self.len {
                errors.push(alloc::format!("len mismatch: self.len={}, actual={}", self.len, values.len()));
            }
            for pair in values.windows(2) {
                if self.cmp.compare(pair[0], pair[1]) == Greater {
                    errors.push(String::from("values out of order"));
                    break;
                }
            }

            assert!(errors.is_empty(), "Tree invariant violations:\n{}", errors.join("\n"));
        }

        #[allow(clippy::too_many_arguments)]
        fn validate_node(
            &self,
            handle: Handle,
            depth: usize,
            is_root: bool,
            leaf_depth: &mut Option<usize>,
            leaves: &mut Vec<Handle>,
            reachable: &mut usize,
            errors: &mut Vec<String>,
        ) -> Handle {
            *reachable += 1;
            let order = self.order;
            match self.nodes.get(handle) {
                Node::Leaf(leaf) => {
                    match *leaf_depth {
                        None => *leaf_depth = Some(depth),
                        Some(expected) if expected != depth => {
                            errors.push(alloc::format!("leaf {handle:?} at depth {depth}, expected {expected}"));
                        }
                        Some(_) => {}
                    }
                    if leaf.len() <= order.m_size() || leaf.len() > order.bracket_size() {
                        errors.push(alloc::format!("leaf {handle:?} holds {} values", leaf.len()));
                    }
                    leaves.push(handle);
                    handle
                }
                Node::Branch(branch) => {
                    let min = if is_root { 2 } else { order.m_size() + 1 };
                    if branch.len() < min || branch.len() > order.bracket_size() {
                        errors.push(alloc::format!("branch {handle:?} holds {} children", branch.len()));
                    }
                    let mut leftmost = None;
                    for &child in branch.children() {
                        let child_leftmost =
                            self.validate_node(child, depth + 1, false, leaf_depth, leaves, reachable, errors);
                        leftmost.get_or_insert(child_leftmost);
                    }
                    let leftmost = leftmost.unwrap_or(handle);
                    if branch.header_leaf() != leftmost {
                        errors.push(alloc::format!("branch {handle:?} caches a stale header leaf"));
                    }
                    leftmost
                }
            }
        }
    }

    #[test]
    fn empty_tree_has_one_leaf() {
        let tree = tree(4);
        tree.validate_invariants();
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.first(), None);
        assert_eq!(tree.last(), None);
        assert_eq!(tree.search(&1, Direction::Greater), Boundary::AfterLast);
        assert_eq!(tree.search(&1, Direction::Less), Boundary::BeforeFirst);
        assert_eq!(tree.index_of(&1), None);
    }

    #[test]
    fn grows_and_collapses_levels() {
        let mut tree = tree(2);
        for v in 0..64 {
            tree.insert(v);
            tree.validate_invariants();
        }
        assert!(tree.height() > 3);

        for v in 0..64 {
            assert_eq!(tree.take(&v), Some(v));
            tree.validate_invariants();
        }
        assert_eq!(tree.height(), 1);
        assert!(tree.root.is_none());
        assert_eq!(tree.len(), 0);
    }

    #[test]
    fn leaf_split_keeps_both_halves_at_m_plus_one() {
        // order 4: m_size 2, bracket 5
        let mut tree = tree(4);
        for v in [10, 20, 30, 40, 50, 25] {
            tree.insert(v);
        }
        tree.validate_invariants();
        let root = tree.root.expect("root after first split");
        let branch = tree.nodes.get(root).as_branch();
        assert_eq!(branch.len(), 2);
        assert_eq!(tree.leaf(branch.child(0)).values(), [10, 20, 25]);
        assert_eq!(tree.leaf(branch.child(1)).values(), [30, 40, 50]);
        assert_eq!(*tree.header(root), 10);
    }

    #[test]
    fn removal_prefers_left_sibling_redistribution() {
        let mut tree = tree(4);
        for v in [10, 20, 30, 40, 50, 60] {
            tree.insert(v);
        }
        // Leaves [10,20,30] [40,50,60]; grow the left one so it can lend.
        tree.insert(15);
        tree.insert(16);
        tree.take(&50);
        tree.take(&60);
        tree.validate_invariants();

        let root = tree.root.expect("still two leaves");
        let branch = tree.nodes.get(root).as_branch();
        assert_eq!(tree.leaf(branch.child(0)).values(), [10, 15, 16]);
        assert_eq!(tree.leaf(branch.child(1)).values(), [20, 30, 40]);
    }

    #[test]
    fn duplicates_straddling_children_are_removed_first() {
        let mut tree = tree(2);
        for _ in 0..20 {
            tree.insert(7);
        }
        tree.insert(3);
        tree.insert(9);
        tree.validate_invariants();

        assert_eq!(tree.index_of(&7), Some(1));
        assert_eq!(tree.last_index_of(&7), Some(20));
        for remaining in (0..20).rev() {
            assert_eq!(tree.take(&7), Some(7));
            tree.validate_invariants();
            assert_eq!(tree.len(), remaining + 2);
        }
        assert_eq!(tree.take(&7), None);
        assert_eq!(tree.values(), vec![&3, &9]);
    }

    #[test]
    fn positional_removal_walks_in_order() {
        let mut tree = tree(3);
        for v in 0..30 {
            tree.insert(v);
        }
        assert_eq!(tree.remove_at(30), None);
        assert_eq!(tree.remove_at(29), Some(29));
        assert_eq!(tree.remove_at(0), Some(0));
        assert_eq!(tree.remove_at(10), Some(11));
        tree.validate_invariants();
        assert_eq!(tree.get(10), Some(&12));
        assert_eq!(tree.locate(27), None);
    }

    #[test]
    fn clear_resets_count_and_shape() {
        let mut tree = tree(2);
        for v in 0..40 {
            tree.insert(v);
        }
        tree.clear();
        tree.validate_invariants();
        assert_eq!(tree.len(), 0);

        tree.insert(5);
        assert_eq!(tree.first(), Some(&5));
        assert_eq!(tree.last(), Some(&5));
    }

    #[test]
    fn clone_preserves_links() {
        let mut tree = tree(2);
        for v in (0..50).rev() {
            tree.insert(v);
        }
        let copy = tree.clone();
        copy.validate_invariants();
        assert_eq!(copy.values(), tree.values());

        tree.take(&10);
        assert_eq!(copy.len(), 50);
        assert_eq!(copy.index_of(&10), Some(10));
    }

    #[test]
    fn drain_values_empties_tree() {
        let mut tree = tree(3);
        for v in [5, 1, 4, 1, 3] {
            tree.insert(v);
        }
        assert_eq!(tree.drain_values(), vec![1, 1, 3, 4, 5]);
        tree.validate_invariants();
        assert_eq!(tree.len(), 0);
    }

    struct Dump<'a>(&'a RawBPlusTree<u32, Natural>);

    impl fmt::Display for Dump<'_> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            self.0.dump(f)
        }
    }

    #[test]
    fn dump_shows_headers_and_counts() {
        let mut tree = tree(4);
        for v in 1..=6 {
            tree.insert(v);
        }
        assert_eq!(Dump(&tree).to_string(), "・1(2)\n 1,2,3,\n 4,5,6,\n");
    }

    #[derive(Clone, Debug)]
    enum Op {
        Insert(u8),
        Take(u8),
        RemoveAt(usize),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            3 => any::<u8>().prop_map(|v| Op::Insert(v % 48)),
            2 => any::<u8>().prop_map(|v| Op::Take(v % 48)),
            1 => any::<usize>().prop_map(Op::RemoveAt),
        ]
    }

    fn check_searches(tree: &RawBPlusTree<u32, Natural>, model: &[u32]) -> Result<(), TestCaseError> {
        let resolve = |boundary: Boundary| match boundary {
            Boundary::BeforeFirst => -1,
            Boundary::At { leaf, offset } => tree.global_index(leaf, offset) as i64,
            Boundary::AfterLast => model.len() as i64,
        };

        for target in 0..50u32 {
            let gt = model.partition_point(|&v| v <= target) as i64;
            let ge = model.partition_point(|&v| v < target) as i64;
            prop_assert_eq!(resolve(tree.search(&target, Direction::Greater)), gt, "greater than {}", target);
            prop_assert_eq!(resolve(tree.search(&target, Direction::GreaterOrEqual)), ge, "at least {}", target);
            prop_assert_eq!(resolve(tree.search(&target, Direction::Less)), ge - 1, "less than {}", target);
            prop_assert_eq!(resolve(tree.search(&target, Direction::LessOrEqual)), gt - 1, "at most {}", target);
        }
        Ok(())
    }

    proptest! {
        #[test]
        fn matches_sorted_vec_model(hint in 2usize..9, ops in prop::collection::vec(op_strategy(), 0..400)) {
            let mut tree = tree(hint);
            let mut model: Vec<u32> = Vec::new();

            for op in ops {
                match op {
                    Op::Insert(v) => {
                        let v = u32::from(v);
                        let at = model.partition_point(|&m| m <= v);
                        model.insert(at, v);
                        tree.insert(v);
                    }
                    Op::Take(v) => {
                        let v = u32::from(v);
                        let expected = model.iter().position(|&m| m == v).map(|at| model.remove(at));
                        prop_assert_eq!(tree.take(&v), expected);
                        check_searches(&tree, &model)?;
                    }
                    Op::RemoveAt(i) => {
                        if model.is_empty() {
                            prop_assert_eq!(tree.remove_at(i), None);
                        } else {
                            let i = i % model.len();
                            prop_assert_eq!(tree.remove_at(i), Some(model.remove(i)));
                        }
                        check_searches(&tree, &model)?;
                    }
                }
                tree.validate_invariants();
            }

            prop_assert_eq!(tree.values(), model.iter().collect::<Vec<_>>());
            for target in 0..48u32 {
                prop_assert_eq!(tree.index_of(&target), model.iter().position(|&m| m == target));
                prop_assert_eq!(tree.last_index_of(&target), model.iter().rposition(|&m| m == target));
            }
        }

        #[test]
        fn searches_match_linear_scan(hint in 2usize..7, mut values in prop::collection::vec(0u32..30, 0..120)) {
            let mut tree = tree(hint);
            for &v in &values {
                tree.insert(v);
            }
            values.sort_unstable();

            let resolve = |boundary: Boundary| match boundary {
                Boundary::BeforeFirst => -1,
                Boundary::At { leaf, offset } => tree.global_index(leaf, offset) as i64,
                Boundary::AfterLast => values.len() as i64,
            };

            for target in 0..32u32 {
                let gt = values.partition_point(|&v| v <= target) as i64;
                let ge = values.partition_point(|&v| v < target) as i64;
                prop_assert_eq!(resolve(tree.search(&target, Direction::Greater)), gt);
                prop_assert_eq!(resolve(tree.search(&target, Direction::GreaterOrEqual)), ge);
                prop_assert_eq!(resolve(tree.search(&target, Direction::Less)), ge - 1);
                prop_assert_eq!(resolve(tree.search(&target, Direction::LessOrEqual)), gt - 1);
            }
        }
    }
}
