//! An ordered map and set backed by an AVL tree whose nodes are stored in an arena and linked to
//! their parents, plus a small utility for checking leaf depths of plain binary trees.
//!
//! # Examples
//!
//! ```
//! use avl_collections::avl_tree::AvlMap;
//!
//! let mut map = AvlMap::new();
//! for key in 1..=3 {
//!     map.insert(key, key * 10);
//! }
//!
//! assert_eq!(map.height(), 2);
//! assert_eq!(map.remove(&2), Some((2, 20)));
//! assert!(map.validate().is_ok());
//! ```

mod entry;
pub mod arena;
pub mod avl_tree;
pub mod equal_paths;
pub mod error;

pub use crate::error::{Error, Result};
