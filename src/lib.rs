//! An in-memory ordered multiset for Rust, built on a B+Tree.
//!
//! [`BPlusTree`] keeps its items sorted by a comparator chosen at construction
//! and, unlike `BTreeSet`, keeps every duplicate, in insertion order. On top of
//! the usual insert/remove/lookup it offers:
//!
//! - Positional access - [`get`](BPlusTree::get), [`remove_at`](BPlusTree::remove_at),
//!   [`range`](BPlusTree::range), [`index_of`](BPlusTree::index_of) and
//!   [`last_index_of`](BPlusTree::last_index_of)
//! - Directional searches - [`search_greater`](BPlusTree::search_greater) and
//!   its siblings return a bidirectional [`Cursor`] on the boundary item
//! - Custom orders - any [`Compare`] implementation, including closures
//!
//! # Example
//!
//! ```
//! use bplus_multiset::{BPlusTree, Position};
//!
//! let mut scores = BPlusTree::new();
//! scores.extend([70, 85, 85, 92, 61]);
//!
//! assert_eq!(scores.to_vec(), [61, 70, 85, 85, 92]);
//! assert_eq!(scores.index_of(&85), Some(2));
//! assert_eq!(scores.last_index_of(&85), Some(3));
//!
//! // Everything above 80, walking the leaf chain.
//! let high: Vec<_> = scores.search_greater(&80).copied().collect();
//! assert_eq!(high, [85, 85, 92]);
//!
//! // Cursors know where they are.
//! assert_eq!(scores.search_less_or_equal(&85).position(), Position::At(3));
//!
//! assert_eq!(scores.remove_at(0), Ok(61));
//! ```
//!
//! # Implementation
//!
//! All items live in leaves, which are linked into one sorted chain. Branches
//! hold child handles only; the separator for a child is the first item of its
//! leftmost leaf, looked up on demand. Nodes live in an arena and refer to each
//! other by handle, so the leaf chain needs no reference counting.
//!
//! Branches do not cache subtree sizes, so positional operations cost time
//! proportional to the number of leaves they walk. Searches by value are
//! O(log n).

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod compare;
mod error;
mod raw;

pub mod bplus_tree;

pub use bplus_tree::{BPlusTree, Cursor, IntoIter, Iter, Position};
pub use compare::{Compare, Natural, Reverse};
pub use error::{Error, Result};
pub use raw::DEFAULT_ORDER;
