use core::fmt;
use core::iter::FusedIterator;

use crate::compare::Natural;
use crate::raw::{Boundary, RawBPlusTree};

/// Where a [`Cursor`] stands in the sorted sequence.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Position {
    /// Before the first item.
    BeforeFirst,
    /// On the item at this global index.
    At(usize),
    /// After the last item.
    AfterLast,
}

/// A bidirectional cursor over the leaf chain of a [`BPlusTree`](crate::BPlusTree).
///
/// Cursors are returned by the `search_*` methods, which leave them on the
/// boundary item, and by [`cursor`](crate::BPlusTree::cursor), which leaves
/// it before the first item.
///
/// A fresh cursor has not produced an item yet: its first successful move
/// yields the item it was created on, if any. From [`Position::BeforeFirst`]
/// a forward move goes to the first item, and from [`Position::AfterLast`] a
/// backward move goes to the last item.
///
/// The cursor borrows the tree, so the tree cannot change while it is alive.
///
/// # Examples
///
/// ```
/// use bplus_multiset::{BPlusTree, Position};
///
/// let tree = BPlusTree::from([10, 20, 30, 40]);
/// let mut cursor = tree.search_greater(&20);
///
/// assert_eq!(cursor.current(), None);
/// assert!(cursor.move_next());
/// assert_eq!(cursor.current(), Some(&30));
///
/// assert!(cursor.move_prev());
/// assert!(cursor.move_prev());
/// assert_eq!(cursor.current(), Some(&10));
/// assert!(!cursor.move_prev());
/// assert_eq!(cursor.position(), Position::BeforeFirst);
/// ```
#[must_use = "cursors are lazy and do nothing unless moved"]
pub struct Cursor<'a, T, C = Natural> {
    tree: &'a RawBPlusTree<T, C>,
    at: Boundary,
    pending: bool,
}

impl<'a, T, C> Cursor<'a, T, C> {
    pub(crate) fn before_first(tree: &'a RawBPlusTree<T, C>) -> Self {
        Self::at_boundary(tree, Boundary::BeforeFirst)
    }

    pub(crate) fn at_boundary(tree: &'a RawBPlusTree<T, C>, at: Boundary) -> Self {
        Cursor { tree, at, pending: true }
    }

    /// The cursor's place in the sequence.
    ///
    /// # Complexity
    ///
    /// Walks every leaf to the left of the cursor.
    #[must_use]
    pub fn position(&self) -> Position {
        match self.at {
            Boundary::BeforeFirst => Position::BeforeFirst,
            Boundary::At { leaf, offset } => Position::At(self.tree.global_index(leaf, offset)),
            Boundary::AfterLast => Position::AfterLast,
        }
    }

    /// The global index of the cursor, if it is on an item.
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        match self.position() {
            Position::At(index) => Some(index),
            Position::BeforeFirst | Position::AfterLast => None,
        }
    }

    /// The item produced by the last successful move.
    #[must_use]
    pub fn current(&self) -> Option<&'a T> {
        match self.at {
            Boundary::At { leaf, offset } if !self.pending => Some(self.tree.leaf(leaf).value(offset)),
            _ => None,
        }
    }

    /// Advances to the next item. Returns `false` once past the last item.
    pub fn move_next(&mut self) -> bool {
        if core::mem::take(&mut self.pending) && matches!(self.at, Boundary::At { .. }) {
            return true;
        }

        self.at = match self.at {
            Boundary::BeforeFirst if self.tree.len() > 0 => Boundary::At {
                leaf: self.tree.start(),
                offset: 0,
            },
            Boundary::BeforeFirst | Boundary::AfterLast => Boundary::AfterLast,
            Boundary::At { leaf, offset } => {
                let current = self.tree.leaf(leaf);
                if offset + 1 < current.len() {
                    Boundary::At { leaf, offset: offset + 1 }
                } else if let Some(next) = current.next() {
                    Boundary::At { leaf: next, offset: 0 }
                } else {
                    Boundary::AfterLast
                }
            }
        };
        matches!(self.at, Boundary::At { .. })
    }

    /// Steps back to the previous item. Returns `false` once before the
    /// first item.
    pub fn move_prev(&mut self) -> bool {
        if core::mem::take(&mut self.pending) && matches!(self.at, Boundary::At { .. }) {
            return true;
        }

        self.at = match self.at {
            Boundary::AfterLast if self.tree.len() > 0 => {
                let end = self.tree.end();
                Boundary::At {
                    leaf: end,
                    offset: self.tree.leaf(end).len() - 1,
                }
            }
            Boundary::BeforeFirst | Boundary::AfterLast => Boundary::BeforeFirst,
            Boundary::At { leaf, offset } => {
                if offset > 0 {
                    Boundary::At { leaf, offset: offset - 1 }
                } else if let Some(prev) = self.tree.leaf(leaf).prev() {
                    Boundary::At {
                        leaf: prev,
                        offset: self.tree.leaf(prev).len() - 1,
                    }
                } else {
                    Boundary::BeforeFirst
                }
            }
        };
        matches!(self.at, Boundary::At { .. })
    }
}

impl<'a, T, C> Iterator for Cursor<'a, T, C> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.move_next() { self.current() } else { None }
    }
}

impl<T, C> FusedIterator for Cursor<'_, T, C> {}

impl<T, C> Clone for Cursor<'_, T, C> {
    fn clone(&self) -> Self {
        Cursor { ..*self }
    }
}

impl<T: fmt::Debug, C> fmt::Debug for Cursor<'_, T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("position", &self.position())
            .field("current", &self.current())
            .finish()
    }
}
