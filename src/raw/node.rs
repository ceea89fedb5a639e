use super::arena::Handle;
use super::branch::BranchNode;
use super::leaf::LeafNode;

// Leaves hold values; branches only route. The two kinds share no state.
#[derive(Clone)]
#[allow(clippy::large_enum_variant)]
pub(crate) enum Node<T> {
    Branch(BranchNode),
    Leaf(LeafNode<T>),
}

/// Which side of a target item a directional search is looking for.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Direction {
    Greater,
    GreaterOrEqual,
    Less,
    LessOrEqual,
}

impl Direction {
    /// Whether branch routing treats a child whose header equals the target item
    /// as lying at or before the boundary.
    ///
    /// `>` and `<=` care about the last run of equal items, so they descend into
    /// the rightmost child whose header is `<=` the item. `>=` and `<` care about
    /// the first such item and descend into the rightmost child whose header is
    /// strictly `<` it.
    #[inline]
    pub(crate) const fn routes_through_equal(self) -> bool {
        matches!(self, Direction::Greater | Direction::LessOrEqual)
    }
}

/// Reported upward by an insertion.
pub(crate) enum SplitOutcome {
    /// The node absorbed the new item.
    Absorbed,
    /// The node split; the parent must adopt this new right sibling.
    Split(Handle),
}

/// Reported upward by a positional removal, which visits nodes in sequence order.
pub(crate) enum PositionalRemoval<T> {
    Removed(T),
    /// The index lies further right; `offset` counts every value passed so far.
    Passed { offset: usize },
}

impl<T> Node<T> {
    #[inline]
    pub(crate) fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }

    /// Values held by a leaf, or children held by a branch.
    #[inline]
    pub(crate) fn count(&self) -> usize {
        match self {
            Node::Branch(branch) => branch.len(),
            Node::Leaf(leaf) => leaf.len(),
        }
    }

    /// Returns the leaf node, panicking if this is a branch.
    pub(crate) fn as_leaf(&self) -> &LeafNode<T> {
        match self {
            Node::Leaf(leaf) => leaf,
            Node::Branch(_) => panic!("expected leaf node"),
        }
    }

    /// Returns the leaf node mutably, panicking if this is a branch.
    pub(crate) fn as_leaf_mut(&mut self) -> &mut LeafNode<T> {
        match self {
            Node::Leaf(leaf) => leaf,
            Node::Branch(_) => panic!("expected leaf node"),
        }
    }

    /// Returns the branch node, panicking if this is a leaf.
    pub(crate) fn as_branch(&self) -> &BranchNode {
        match self {
            Node::Branch(branch) => branch,
            Node::Leaf(_) => panic!("expected branch node"),
        }
    }

    /// Returns the branch node mutably, panicking if this is a leaf.
    pub(crate) fn as_branch_mut(&mut self) -> &mut BranchNode {
        match self {
            Node::Branch(branch) => branch,
            Node::Leaf(_) => panic!("expected branch node"),
        }
    }
}
