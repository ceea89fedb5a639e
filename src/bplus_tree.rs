use core::fmt;
use core::iter::FusedIterator;
use core::ops::Index;

use crate::compare::{Compare, Natural};
use crate::error::Result;
use crate::raw::{Direction, Handle, Order, RawBPlusTree};

mod cursor;
mod positional;

pub use cursor::{Cursor, Position};

/// An ordered multiset based on a [B+Tree].
///
/// Items are kept sorted by a comparator fixed at construction; by default the
/// item type's own [`Ord`]. Items that compare equal are all kept, side by side
/// in the order they were inserted, so the tree behaves like a sorted list that
/// can also be addressed by position.
///
/// Every value lives in a leaf and the leaves form one doubly linked chain in
/// sorted order. Branches only route searches; they cache no subtree sizes, so
/// positional operations such as [`get`](BPlusTree::get) and
/// [`remove_at`](BPlusTree::remove_at) walk the leaf chain and take time
/// proportional to the number of leaves rather than the height of the tree.
///
/// The capacity of each node is set by an *order* hint `p`: every node holds at
/// most `2 * (p / 2) + 1` values or children, and a node other than the root is
/// rebalanced as soon as it falls to `p / 2` or fewer.
///
/// It is a logic error for an item to be modified in such a way that its
/// ordering relative to any other item, as determined by the comparator,
/// changes while it is in the tree. The behavior resulting from such a logic
/// error is not specified but will not be undefined behavior.
///
/// [B+Tree]: https://en.wikipedia.org/wiki/B%2B_tree
///
/// # Examples
///
/// ```
/// use bplus_multiset::BPlusTree;
///
/// let mut grades = BPlusTree::new();
/// grades.extend([88, 72, 95, 72, 61]);
///
/// // Duplicates are kept.
/// assert_eq!(grades.len(), 5);
/// assert_eq!(grades.to_vec(), [61, 72, 72, 88, 95]);
///
/// // Position-aware lookups.
/// assert_eq!(grades.index_of(&72), Some(1));
/// assert_eq!(grades.last_index_of(&72), Some(2));
/// assert_eq!(grades[4], 95);
///
/// // Range searches return a cursor over the leaf chain.
/// let passing: Vec<_> = grades.search_greater_or_equal(&70).copied().collect();
/// assert_eq!(passing, [72, 72, 88, 95]);
///
/// grades.remove(&72);
/// assert_eq!(grades.to_vec(), [61, 72, 88, 95]);
/// ```
///
/// Any comparator can be supplied, including a closure:
///
/// ```
/// use bplus_multiset::BPlusTree;
///
/// let mut by_len = BPlusTree::with_comparator(|a: &String, b: &String| a.len().cmp(&b.len()));
/// for word in ["pear", "fig", "apple", "kiwi"] {
///     by_len.insert(word.to_string());
/// }
///
/// // "pear" and "kiwi" tie; insertion order is kept.
/// assert_eq!(by_len.to_vec(), ["fig", "pear", "kiwi", "apple"]);
/// ```
pub struct BPlusTree<T, C = Natural> {
    raw: RawBPlusTree<T, C>,
}

/// A double-ended iterator over the items of a `BPlusTree`, in order.
///
/// This `struct` is created by the [`iter`] method on [`BPlusTree`].
///
/// # Examples
///
/// ```
/// use bplus_multiset::BPlusTree;
///
/// let tree = BPlusTree::from([3, 1, 2]);
/// let mut iter = tree.iter();
/// assert_eq!(iter.next(), Some(&1));
/// assert_eq!(iter.next_back(), Some(&3));
/// assert_eq!(iter.next(), Some(&2));
/// assert_eq!(iter.next(), None);
/// ```
///
/// [`iter`]: BPlusTree::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, T, C = Natural> {
    tree: &'a RawBPlusTree<T, C>,
    front_leaf: Option<Handle>,
    front_index: usize,
    back_leaf: Option<Handle>,
    back_index: usize,
    remaining: usize,
}

/// An owning iterator over the items of a `BPlusTree`, in order.
///
/// This `struct` is created by the [`into_iter`] method on [`BPlusTree`]
/// (provided by the [`IntoIterator`] trait).
///
/// [`into_iter`]: BPlusTree#method.into_iter
pub struct IntoIter<T> {
    inner: alloc::vec::IntoIter<T>,
}

impl<T> BPlusTree<T> {
    /// Makes a new, empty `BPlusTree` ordered by `T`'s [`Ord`] implementation,
    /// using the default order of [`DEFAULT_ORDER`](crate::DEFAULT_ORDER).
    ///
    /// # Complexity
    ///
    /// O(1)
    ///
    /// # Examples
    ///
    /// ```
    /// use bplus_multiset::BPlusTree;
    ///
    /// let mut tree = BPlusTree::new();
    /// tree.insert(1);
    /// ```
    #[must_use]
    pub fn new() -> BPlusTree<T> {
        BPlusTree::with_comparator(Natural)
    }

    /// Makes a new, empty `BPlusTree` with the given order hint.
    ///
    /// Each node holds at most `2 * (order / 2) + 1` values or children.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOrder`](crate::Error::InvalidOrder) when
    /// `order < 2`.
    ///
    /// # Examples
    ///
    /// ```
    /// use bplus_multiset::{BPlusTree, Error};
    ///
    /// let tree = BPlusTree::<u32>::with_order(4)?;
    /// assert_eq!(tree.order(), 4);
    ///
    /// assert_eq!(BPlusTree::<u32>::with_order(1).err(), Some(Error::InvalidOrder { hint: 1 }));
    /// # Ok::<(), Error>(())
    /// ```
    pub fn with_order(order: usize) -> Result<BPlusTree<T>> {
        BPlusTree::with_order_and_comparator(order, Natural)
    }
}

impl<T, C> BPlusTree<T, C> {
    /// Makes a new, empty `BPlusTree` ordered by `cmp`.
    ///
    /// # Examples
    ///
    /// ```
    /// use bplus_multiset::{BPlusTree, Natural, Reverse};
    ///
    /// let mut tree = BPlusTree::with_comparator(Reverse(Natural));
    /// tree.extend([1, 3, 2]);
    /// assert_eq!(tree.first(), Some(&3));
    /// ```
    #[must_use]
    pub fn with_comparator(cmp: C) -> BPlusTree<T, C> {
        BPlusTree {
            raw: RawBPlusTree::new(Order::default(), cmp),
        }
    }

    /// Makes a new, empty `BPlusTree` with the given order hint and comparator.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOrder`](crate::Error::InvalidOrder) when
    /// `order < 2`.
    pub fn with_order_and_comparator(order: usize, cmp: C) -> Result<BPlusTree<T, C>> {
        Ok(BPlusTree {
            raw: RawBPlusTree::new(Order::new(order)?, cmp),
        })
    }

    /// The order hint this tree was built with.
    #[must_use]
    pub fn order(&self) -> usize {
        self.raw.order().hint()
    }

    /// Fill threshold derived from the order: a node other than the root that
    /// holds this many entries or fewer is rebalanced.
    ///
    /// ```
    /// use bplus_multiset::BPlusTree;
    ///
    /// let tree = BPlusTree::<u8>::with_order(5)?;
    /// assert_eq!((tree.m_size(), tree.bracket_size()), (2, 5));
    /// # Ok::<(), bplus_multiset::Error>(())
    /// ```
    #[must_use]
    pub fn m_size(&self) -> usize {
        self.raw.order().m_size()
    }

    /// Maximum number of values in a leaf, or children in a branch.
    #[must_use]
    pub fn bracket_size(&self) -> usize {
        self.raw.order().bracket_size()
    }

    /// The comparator this tree was built with.
    #[must_use]
    pub fn comparator(&self) -> &C {
        self.raw.comparator()
    }

    /// Returns the number of items in the tree, counting duplicates.
    ///
    /// # Complexity
    ///
    /// O(1)
    ///
    /// # Examples
    ///
    /// ```
    /// use bplus_multiset::BPlusTree;
    ///
    /// let mut tree = BPlusTree::new();
    /// assert_eq!(tree.len(), 0);
    /// tree.insert(7);
    /// tree.insert(7);
    /// assert_eq!(tree.len(), 2);
    /// ```
    #[must_use]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the tree contains no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every item, keeping the order and comparator.
    ///
    /// # Complexity
    ///
    /// O(n)
    ///
    /// # Examples
    ///
    /// ```
    /// use bplus_multiset::BPlusTree;
    ///
    /// let mut tree = BPlusTree::from([1, 2, 3]);
    /// tree.clear();
    /// assert!(tree.is_empty());
    /// ```
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Returns the smallest item, the first of its run if it is duplicated.
    ///
    /// # Complexity
    ///
    /// O(1)
    ///
    /// # Examples
    ///
    /// ```
    /// use bplus_multiset::BPlusTree;
    ///
    /// let tree = BPlusTree::from([5, 3, 9]);
    /// assert_eq!(tree.first(), Some(&3));
    /// assert_eq!(tree.last(), Some(&9));
    /// ```
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.raw.first()
    }

    /// Returns the largest item, the last of its run if it is duplicated.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.raw.last()
    }

    /// Gets an iterator over the items of the tree, in sorted order.
    ///
    /// # Examples
    ///
    /// ```
    /// use bplus_multiset::BPlusTree;
    ///
    /// let tree = BPlusTree::from([2, 1, 2]);
    /// let items: Vec<_> = tree.iter().rev().collect();
    /// assert_eq!(items, [&2, &2, &1]);
    /// ```
    pub fn iter(&self) -> Iter<'_, T, C> {
        let (front_leaf, back_leaf) = if self.is_empty() {
            (None, None)
        } else {
            (Some(self.raw.start()), Some(self.raw.end()))
        };
        let back_index = self.raw.leaf(self.raw.end()).len().saturating_sub(1);

        Iter {
            tree: &self.raw,
            front_leaf,
            front_index: 0,
            back_leaf,
            back_index,
            remaining: self.len(),
        }
    }

    /// Returns a cursor parked before the first item.
    ///
    /// # Examples
    ///
    /// ```
    /// use bplus_multiset::{BPlusTree, Position};
    ///
    /// let tree = BPlusTree::from([10, 20]);
    /// let mut cursor = tree.cursor();
    /// assert_eq!(cursor.position(), Position::BeforeFirst);
    /// assert!(cursor.move_next());
    /// assert_eq!(cursor.current(), Some(&10));
    /// assert_eq!(cursor.position(), Position::At(0));
    /// ```
    pub fn cursor(&self) -> Cursor<'_, T, C> {
        Cursor::before_first(&self.raw)
    }

    /// Calls `f` on every item, in sorted order.
    pub fn for_each<F>(&self, f: F)
    where
        F: FnMut(&T),
    {
        self.iter().for_each(f);
    }
}

impl<T, C: Compare<T>> BPlusTree<T, C> {
    /// Adds an item to the tree. An item equal to existing ones is placed
    /// after all of them.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use bplus_multiset::BPlusTree;
    ///
    /// let mut tree = BPlusTree::with_comparator(|a: &(u8, char), b: &(u8, char)| a.0.cmp(&b.0));
    /// tree.insert((1, 'a'));
    /// tree.insert((0, 'b'));
    /// tree.insert((1, 'c'));
    /// assert_eq!(tree.to_vec(), [(0, 'b'), (1, 'a'), (1, 'c')]);
    /// ```
    pub fn insert(&mut self, item: T) {
        self.raw.insert(item);
    }

    /// Adds every item of `items`, one at a time.
    pub fn insert_all<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = T>,
    {
        for item in items {
            self.raw.insert(item);
        }
    }

    /// Removes the first item equal to `item`. Returns whether one was found.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use bplus_multiset::BPlusTree;
    ///
    /// let mut tree = BPlusTree::from([4, 4, 5]);
    /// assert!(tree.remove(&4));
    /// assert!(tree.remove(&4));
    /// assert!(!tree.remove(&4));
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn remove(&mut self, item: &T) -> bool {
        self.take(item).is_some()
    }

    /// Removes and returns the first item equal to `item`.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use bplus_multiset::BPlusTree;
    ///
    /// let mut tree = BPlusTree::with_comparator(|a: &(u8, &str), b: &(u8, &str)| a.0.cmp(&b.0));
    /// tree.extend([(1, "first"), (1, "second")]);
    /// assert_eq!(tree.take(&(1, "")), Some((1, "first")));
    /// assert_eq!(tree.take(&(2, "")), None);
    /// ```
    pub fn take(&mut self, item: &T) -> Option<T> {
        self.raw.take(item)
    }

    /// Returns `true` if the tree holds an item equal to `item`.
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn contains(&self, item: &T) -> bool {
        self.raw.find_first(item).is_some()
    }

    /// Returns the first stored item equal to `item`.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use bplus_multiset::BPlusTree;
    ///
    /// let mut tree = BPlusTree::with_comparator(|a: &(u8, char), b: &(u8, char)| a.0.cmp(&b.0));
    /// tree.extend([(3, 'x'), (3, 'y')]);
    /// assert_eq!(tree.get_equal(&(3, '?')), Some(&(3, 'x')));
    /// assert_eq!(tree.get_equal(&(4, '?')), None);
    /// ```
    #[must_use]
    pub fn get_equal(&self, item: &T) -> Option<&T> {
        let (leaf, offset) = self.raw.find_first(item)?;
        Some(self.raw.leaf(leaf).value(offset))
    }

    /// Returns the position of the first item equal to `item`.
    ///
    /// # Complexity
    ///
    /// O(log n) to find the item, plus a walk over every leaf to its left.
    ///
    /// # Examples
    ///
    /// ```
    /// use bplus_multiset::BPlusTree;
    ///
    /// let tree = BPlusTree::from([1, 2, 2, 2, 3]);
    /// assert_eq!(tree.index_of(&2), Some(1));
    /// assert_eq!(tree.index_of(&9), None);
    /// ```
    #[must_use]
    pub fn index_of(&self, item: &T) -> Option<usize> {
        self.raw.index_of(item)
    }

    /// Returns the position of the last item equal to `item`.
    ///
    /// # Complexity
    ///
    /// O(log n) to find the item, plus a walk over every leaf to its left.
    ///
    /// # Examples
    ///
    /// ```
    /// use bplus_multiset::BPlusTree;
    ///
    /// let tree = BPlusTree::from([1, 2, 2, 2, 3]);
    /// assert_eq!(tree.last_index_of(&2), Some(3));
    /// ```
    #[must_use]
    pub fn last_index_of(&self, item: &T) -> Option<usize> {
        self.raw.last_index_of(item)
    }

    /// Returns a cursor on the first item greater than `item`.
    ///
    /// When no item is greater the cursor is parked after the last item. The
    /// cursor's first move forward yields the item it is on, so it can be
    /// used directly as an iterator over everything greater than `item`.
    ///
    /// # Examples
    ///
    /// ```
    /// use bplus_multiset::{BPlusTree, Position};
    ///
    /// let tree = BPlusTree::from([1, 3, 3, 5]);
    ///
    /// let cursor = tree.search_greater(&3);
    /// assert_eq!(cursor.position(), Position::At(3));
    /// assert_eq!(cursor.copied().collect::<Vec<_>>(), [5]);
    ///
    /// assert_eq!(tree.search_greater(&5).position(), Position::AfterLast);
    /// ```
    pub fn search_greater(&self, item: &T) -> Cursor<'_, T, C> {
        self.search(item, Direction::Greater)
    }

    /// Returns a cursor on the first item greater than or equal to `item`.
    ///
    /// # Examples
    ///
    /// ```
    /// use bplus_multiset::{BPlusTree, Position};
    ///
    /// let tree = BPlusTree::from([1, 3, 3, 5]);
    /// assert_eq!(tree.search_greater_or_equal(&3).position(), Position::At(1));
    /// assert_eq!(tree.search_greater_or_equal(&4).position(), Position::At(3));
    /// ```
    pub fn search_greater_or_equal(&self, item: &T) -> Cursor<'_, T, C> {
        self.search(item, Direction::GreaterOrEqual)
    }

    /// Returns a cursor on the last item less than `item`, or parked before the
    /// first item if there is none.
    ///
    /// # Examples
    ///
    /// ```
    /// use bplus_multiset::{BPlusTree, Position};
    ///
    /// let tree = BPlusTree::from([1, 3, 3, 5]);
    ///
    /// let mut cursor = tree.search_less(&5);
    /// assert_eq!(cursor.position(), Position::At(2));
    /// assert!(cursor.move_prev());
    /// assert_eq!(cursor.current(), Some(&3));
    /// assert!(cursor.move_prev());
    /// assert_eq!(cursor.position(), Position::At(1));
    ///
    /// assert_eq!(tree.search_less(&1).position(), Position::BeforeFirst);
    /// ```
    pub fn search_less(&self, item: &T) -> Cursor<'_, T, C> {
        self.search(item, Direction::Less)
    }

    /// Returns a cursor on the last item less than or equal to `item`.
    ///
    /// # Examples
    ///
    /// ```
    /// use bplus_multiset::{BPlusTree, Position};
    ///
    /// let tree = BPlusTree::from([1, 3, 3, 5]);
    /// assert_eq!(tree.search_less_or_equal(&3).position(), Position::At(2));
    /// assert_eq!(tree.search_less_or_equal(&0).position(), Position::BeforeFirst);
    /// ```
    pub fn search_less_or_equal(&self, item: &T) -> Cursor<'_, T, C> {
        self.search(item, Direction::LessOrEqual)
    }

    fn search(&self, item: &T, direction: Direction) -> Cursor<'_, T, C> {
        Cursor::at_boundary(&self.raw, self.raw.search(item, direction))
    }
}

impl<T: Clone, C: Clone> Clone for BPlusTree<T, C> {
    fn clone(&self) -> Self {
        BPlusTree { raw: self.raw.clone() }
    }
}

impl<T: PartialEq, C> PartialEq for BPlusTree<T, C> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq, C> Eq for BPlusTree<T, C> {}

impl<T: fmt::Debug, C> fmt::Debug for BPlusTree<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Dumps the shape of the tree: one line per branch with its header item and
/// child count, one line per leaf listing its values, indented by depth.
///
/// ```
/// use bplus_multiset::BPlusTree;
///
/// let mut tree = BPlusTree::with_order(4)?;
/// tree.extend(1..=6);
/// assert_eq!(tree.to_string(), "・1(2)\n 1,2,3,\n 4,5,6,\n");
/// # Ok::<(), bplus_multiset::Error>(())
/// ```
impl<T: fmt::Display, C> fmt::Display for BPlusTree<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.raw.dump(f)
    }
}

impl<T, C: Default> Default for BPlusTree<T, C> {
    fn default() -> Self {
        BPlusTree::with_comparator(C::default())
    }
}

impl<T, C> Index<usize> for BPlusTree<T, C> {
    type Output = T;

    /// Returns the item at position `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    fn index(&self, index: usize) -> &T {
        match self.get(index) {
            Ok(item) => item,
            Err(err) => panic!("{err}"),
        }
    }
}

impl<T, C: Compare<T> + Default> FromIterator<T> for BPlusTree<T, C> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = BPlusTree::default();
        tree.insert_all(iter);
        tree
    }
}

impl<T: Ord, const N: usize> From<[T; N]> for BPlusTree<T> {
    /// Converts a `[T; N]` into a `BPlusTree<T>`.
    ///
    /// ```
    /// use bplus_multiset::BPlusTree;
    ///
    /// let tree1 = BPlusTree::from([4, 1, 4]);
    /// let tree2: BPlusTree<_> = [4, 4, 1].into();
    /// assert_eq!(tree1, tree2);
    /// ```
    fn from(arr: [T; N]) -> Self {
        let mut tree = BPlusTree::new();
        tree.insert_all(arr);
        tree
    }
}

impl<T, C: Compare<T>> Extend<T> for BPlusTree<T, C> {
    #[inline]
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.insert_all(iter);
    }
}

impl<'a, T: 'a + Copy, C: Compare<T>> Extend<&'a T> for BPlusTree<T, C> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.insert_all(iter.into_iter().copied());
    }
}

impl<'a, T, C> IntoIterator for &'a BPlusTree<T, C> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T, C>;

    fn into_iter(self) -> Iter<'a, T, C> {
        self.iter()
    }
}

impl<T, C> IntoIterator for BPlusTree<T, C> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    /// Gets an owning iterator over the items of the tree, in sorted order.
    ///
    /// ```
    /// use bplus_multiset::BPlusTree;
    ///
    /// let tree = BPlusTree::from([3, 1, 2]);
    /// let v: Vec<_> = tree.into_iter().collect();
    /// assert_eq!(v, [1, 2, 3]);
    /// ```
    fn into_iter(mut self) -> IntoIter<T> {
        IntoIter {
            inner: self.raw.drain_values().into_iter(),
        }
    }
}

impl<'a, T: 'a, C> Iterator for Iter<'a, T, C> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }

        let leaf = self.tree.leaf(self.front_leaf?);
        let item = leaf.value(self.front_index);

        self.remaining -= 1;
        self.front_index += 1;

        // Move to next leaf if needed
        if self.front_index >= leaf.len() {
            self.front_leaf = leaf.next();
            self.front_index = 0;
        }

        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }

    fn last(mut self) -> Option<&'a T> {
        self.next_back()
    }
}

impl<'a, T: 'a, C> DoubleEndedIterator for Iter<'a, T, C> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }

        let leaf = self.tree.leaf(self.back_leaf?);
        let item = leaf.value(self.back_index);

        self.remaining -= 1;

        // Move to previous element/leaf
        if self.back_index == 0 {
            self.back_leaf = leaf.prev();
            if let Some(prev) = self.back_leaf {
                self.back_index = self.tree.leaf(prev).len().saturating_sub(1);
            }
        } else {
            self.back_index -= 1;
        }

        Some(item)
    }
}

impl<T, C> ExactSizeIterator for Iter<'_, T, C> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<T, C> FusedIterator for Iter<'_, T, C> {}

impl<T, C> Clone for Iter<'_, T, C> {
    fn clone(&self) -> Self {
        Iter { ..*self }
    }
}

impl<T: fmt::Debug, C> fmt::Debug for Iter<'_, T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        self.inner.next_back()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<T> FusedIterator for IntoIter<T> {}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.as_slice()).finish()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec;
    use alloc::vec::Vec;
    use static_assertions::{assert_impl_all, assert_not_impl_any};

    assert_impl_all!(BPlusTree<u32>: Send, Sync, Clone, Default);
    assert_impl_all!(Iter<'static, u32>: Send, Sync, Clone, ExactSizeIterator, DoubleEndedIterator);
    assert_not_impl_any!(BPlusTree<core::cell::Cell<u32>>: Sync);

    #[test]
    fn iter_meets_in_the_middle() {
        let mut tree = BPlusTree::with_order(2).unwrap();
        tree.extend(0..20u32);

        let mut iter = tree.iter();
        let mut front = Vec::new();
        let mut back = Vec::new();
        while let Some(v) = iter.next() {
            front.push(*v);
            if let Some(v) = iter.next_back() {
                back.push(*v);
            }
        }
        back.reverse();
        front.extend(back);
        assert_eq!(front, (0..20).collect::<Vec<_>>());
        assert_eq!(iter.len(), 0);
        assert_eq!(iter.next_back(), None);
    }

    #[test]
    fn empty_tree_iterates_nothing() {
        let tree: BPlusTree<u32> = BPlusTree::new();
        assert_eq!(tree.iter().next(), None);
        assert_eq!(tree.iter().next_back(), None);
        assert_eq!(tree.to_string(), "\n");
        assert_eq!(alloc::format!("{tree:?}"), "[]");
    }

    #[test]
    fn into_iter_drains_in_order() {
        let mut tree = BPlusTree::with_order(3).unwrap();
        tree.extend([9, 2, 7, 2, 5]);
        let mut iter = tree.into_iter();
        assert_eq!(iter.len(), 5);
        assert_eq!(iter.next_back(), Some(9));
        assert_eq!(iter.collect::<Vec<_>>(), vec![2, 2, 5, 7]);
    }

    #[test]
    fn equality_ignores_shape() {
        let mut a = BPlusTree::with_order(2).unwrap();
        let mut b = BPlusTree::with_order(16).unwrap();
        a.extend((0..50).rev());
        b.extend(0..50);
        assert_eq!(a, b);
        b.remove(&0);
        assert_ne!(a, b);
    }

    #[test]
    #[should_panic(expected = "index 3 is out of range for a tree of length 3")]
    fn index_past_end_panics() {
        let tree = BPlusTree::from([1, 2, 3]);
        let _ = tree[3];
    }
}
