mod arena;
mod branch;
mod leaf;
mod node;
mod order;
mod raw_tree;

pub(crate) use arena::Handle;
pub(crate) use node::Direction;
pub(crate) use order::Order;
pub use order::DEFAULT_ORDER;
pub(crate) use raw_tree::{Boundary, RawBPlusTree};
