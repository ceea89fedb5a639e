use smallvec::SmallVec;

use super::arena::Handle;
use super::order::{INLINE_SLOTS, Order};

pub(crate) type Children = SmallVec<[Handle; INLINE_SLOTS]>;

// B+Tree: branches route only. The header of child `i` is the first value of
// its leftmost descendant leaf, so no separator keys are stored here.
#[derive(Clone)]
pub(crate) struct BranchNode {
    children: Children,
    // Leftmost descendant leaf; its first value is this branch's header item.
    header_leaf: Handle,
}

impl BranchNode {
    /// Creates the two-child branch that becomes a new root.
    pub(crate) fn with_children(left: Handle, right: Handle, header_leaf: Handle) -> Self {
        let mut children = Children::new();
        children.push(left);
        children.push(right);
        Self {
            children,
            header_leaf,
        }
    }

    pub(crate) fn from_children(children: Children, header_leaf: Handle) -> Self {
        debug_assert!(!children.is_empty(), "a branch needs at least one child");
        Self {
            children,
            header_leaf,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.children.len()
    }

    #[inline]
    pub(crate) fn child(&self, index: usize) -> Handle {
        self.children[index]
    }

    #[inline]
    pub(crate) fn children(&self) -> &[Handle] {
        &self.children
    }

    #[inline]
    pub(crate) fn header_leaf(&self) -> Handle {
        self.header_leaf
    }

    pub(crate) fn set_header_leaf(&mut self, leaf: Handle) {
        self.header_leaf = leaf;
    }

    /// Picks the child to descend into: the rightmost child whose header
    /// satisfies `before_item`, or the first child if none does.
    ///
    /// `before_item` must hold for a prefix of the children, which is the case
    /// for any "header compares below (or equal to) the item" test because the
    /// headers are sorted.
    #[inline]
    pub(crate) fn route<F>(&self, mut before_item: F) -> usize
    where
        F: FnMut(Handle) -> bool,
    {
        self.children[1..].partition_point(|&child| before_item(child))
    }

    /// Adopts `child` at position `at`. A branch that overflows keeps its lower
    /// `m_size + 1` children and returns the rest for a new right sibling.
    pub(crate) fn insert_child(&mut self, at: usize, child: Handle, order: Order) -> Option<Children> {
        self.children.insert(at, child);

        if self.children.len() <= order.bracket_size() {
            return None;
        }

        Some(self.children.drain(order.m_size() + 1..).collect())
    }

    pub(crate) fn remove_child(&mut self, at: usize) -> Handle {
        self.children.remove(at)
    }

    /// Same half split as leaves use, on child handles. The caller refreshes
    /// `right`'s header leaf since its first child changes.
    pub(crate) fn redistribute(&mut self, right: &mut Self) {
        let total = self.children.len() + right.children.len();
        let half = total / 2;

        if self.children.len() < half {
            let moved = half - self.children.len();
            self.children.extend(right.children.drain(..moved));
        } else if self.children.len() > half {
            let moved: Children = self.children.drain(half..).collect();
            right.children.insert_many(0, moved);
        }
    }

    pub(crate) fn merge(&mut self, mut right: Self) {
        self.children.append(&mut right.children);
    }
}
