//! Self-balancing binary search tree where the heights of the two child subtrees of any node
//! differ by at most one.
//!
//! Nodes live in an arena and keep a link to their parent, so insertions and removals repair
//! balance factors by walking upward from the point of change instead of unwinding a recursion.

mod bst;
mod map;
mod node;
mod set;
mod tree;

pub use self::map::{AvlMap, AvlMapIntoIter, AvlMapIter};
pub use self::set::{AvlSet, AvlSetIntoIter, AvlSetIter};
