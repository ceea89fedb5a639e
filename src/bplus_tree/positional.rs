use alloc::vec::Vec;

use super::BPlusTree;
use crate::compare::Compare;
use crate::error::{Error, Result};

impl<T, C> BPlusTree<T, C> {
    /// Returns the item at position `index` in sorted order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `index >= self.len()`.
    ///
    /// # Complexity
    ///
    /// O(number of leaves): the leaf chain is walked from the front.
    ///
    /// # Examples
    ///
    /// ```
    /// use bplus_multiset::{BPlusTree, Error};
    ///
    /// let tree = BPlusTree::from([30, 10, 20]);
    /// assert_eq!(tree.get(1), Ok(&20));
    /// assert_eq!(tree.get(3), Err(Error::IndexOutOfRange { index: 3, len: 3 }));
    /// ```
    pub fn get(&self, index: usize) -> Result<&T> {
        self.raw.get(index).ok_or(Error::IndexOutOfRange { index, len: self.len() })
    }

    /// Removes and returns the item at position `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `index >= self.len()`; the tree is
    /// left untouched.
    ///
    /// # Complexity
    ///
    /// O(number of leaves): nodes are visited in sequence order until the one
    /// holding `index` is reached.
    ///
    /// # Examples
    ///
    /// ```
    /// use bplus_multiset::BPlusTree;
    ///
    /// let mut tree = BPlusTree::from([5, 1, 3]);
    /// assert_eq!(tree.remove_at(1), Ok(3));
    /// assert_eq!(tree.to_vec(), [1, 5]);
    /// assert!(tree.remove_at(2).is_err());
    /// ```
    pub fn remove_at(&mut self, index: usize) -> Result<T>
    where
        C: Compare<T>,
    {
        let len = self.len();
        self.raw.remove_at(index).ok_or(Error::IndexOutOfRange { index, len })
    }

    /// Positional assignment is not supported: an item's position is decided
    /// by the comparator alone.
    ///
    /// # Errors
    ///
    /// Always returns [`Error::Unsupported`].
    pub fn set(&mut self, _index: usize, _item: T) -> Result<()> {
        Err(Error::Unsupported("set"))
    }

    /// Positional insertion is not supported: use [`insert`](BPlusTree::insert).
    ///
    /// # Errors
    ///
    /// Always returns [`Error::Unsupported`].
    pub fn insert_at(&mut self, _index: usize, _item: T) -> Result<()> {
        Err(Error::Unsupported("insert_at"))
    }

    fn check_range(&self, index: usize, count: usize) -> Result<()> {
        let len = self.len();
        if index > len || count > len - index {
            return Err(Error::RangeOutOfBounds { index, count, len });
        }
        Ok(())
    }
}

impl<T: Clone, C> BPlusTree<T, C> {
    /// Copies every item into a new `Vec`, in sorted order.
    ///
    /// # Examples
    ///
    /// ```
    /// use bplus_multiset::BPlusTree;
    ///
    /// let tree = BPlusTree::from([2, 3, 1]);
    /// assert_eq!(tree.to_vec(), [1, 2, 3]);
    /// ```
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }

    /// Copies `count` items starting at position `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RangeOutOfBounds`] if the range does not lie within the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use bplus_multiset::BPlusTree;
    ///
    /// let tree: BPlusTree<_> = (0..10).collect();
    /// assert_eq!(tree.range(3, 4), Ok(vec![3, 4, 5, 6]));
    /// assert!(tree.range(8, 3).is_err());
    /// ```
    pub fn range(&self, index: usize, count: usize) -> Result<Vec<T>> {
        self.check_range(index, count)?;
        Ok(self.iter().skip(index).take(count).cloned().collect())
    }

    /// Copies every item into `dest`, starting at `dest[offset]`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DestinationTooSmall`] if `dest` has fewer than
    /// `offset + self.len()` slots; `dest` is left untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use bplus_multiset::BPlusTree;
    ///
    /// let tree = BPlusTree::from([7, 8]);
    /// let mut dest = [0; 4];
    /// tree.copy_to(&mut dest, 1)?;
    /// assert_eq!(dest, [0, 7, 8, 0]);
    /// # Ok::<(), bplus_multiset::Error>(())
    /// ```
    pub fn copy_to(&self, dest: &mut [T], offset: usize) -> Result<()> {
        self.copy_range_to(0, dest, offset, self.len())
    }

    /// Copies `count` items starting at position `index` into `dest`, starting
    /// at `dest[dest_offset]`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RangeOutOfBounds`] if the source range does not lie
    /// within the tree, or [`Error::DestinationTooSmall`] if `dest` cannot hold
    /// `count` items from `dest_offset` on. Nothing is copied on error.
    pub fn copy_range_to(&self, index: usize, dest: &mut [T], dest_offset: usize, count: usize) -> Result<()> {
        self.check_range(index, count)?;
        let needed = dest_offset.saturating_add(count);
        if needed > dest.len() {
            return Err(Error::DestinationTooSmall {
                needed,
                available: dest.len(),
            });
        }

        for (slot, item) in dest[dest_offset..].iter_mut().zip(self.iter().skip(index).take(count)) {
            slot.clone_from(item);
        }
        Ok(())
    }
}
