use core::cmp::Ordering;

/// A total order over `T`, fixed when a [`BPlusTree`](crate::BPlusTree) is built.
///
/// Items that compare [`Equal`](Ordering::Equal) are kept side by side in
/// insertion order. It is a logic error for an implementation not to be a total
/// order; the tree does not detect it and its contents will then no longer be
/// sorted, but no undefined behavior results.
///
/// Any `Fn(&T, &T) -> Ordering` closure is a comparator:
///
/// ```
/// use bplus_multiset::BPlusTree;
///
/// let mut words = BPlusTree::with_comparator(|a: &&str, b: &&str| a.len().cmp(&b.len()));
/// words.extend(["ccc", "a", "bb", "d"]);
/// assert_eq!(words.to_vec(), ["a", "d", "bb", "ccc"]);
/// ```
pub trait Compare<T: ?Sized> {
    /// Compares `a` with `b`.
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

/// The comparator given by `T`'s [`Ord`] implementation.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Natural;

impl<T: Ord + ?Sized> Compare<T> for Natural {
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

/// Flips the order of the wrapped comparator.
///
/// ```
/// use bplus_multiset::{BPlusTree, Natural, Reverse};
///
/// let mut tree = BPlusTree::with_comparator(Reverse(Natural));
/// tree.extend([2, 9, 4]);
/// assert_eq!(tree.to_vec(), [9, 4, 2]);
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Reverse<C>(pub C);

impl<T: ?Sized, C: Compare<T>> Compare<T> for Reverse<C> {
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self.0.compare(b, a)
    }
}

impl<T: ?Sized, F> Compare<T> for F
where
    F: Fn(&T, &T) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self(a, b)
    }
}
