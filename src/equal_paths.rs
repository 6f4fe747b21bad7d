//! Checks whether every leaf of a binary tree sits at the same depth.
//!
//! # Examples
//!
//! ```
//! use avl_collections::equal_paths::{equal_paths, Node};
//!
//! let tree = Node::branch(2, Node::leaf(1), Node::leaf(3));
//! assert!(equal_paths(&tree));
//!
//! let tree = Node::branch(2, Node::leaf(1), Node::branch(4, None, Node::leaf(5)));
//! assert!(!equal_paths(&tree));
//! ```

use std::cmp;

pub type Tree<T> = Option<Box<Node<T>>>;

/// A plain binary tree node with no ordering or balance requirements.
pub struct Node<T> {
    pub key: T,
    pub left: Tree<T>,
    pub right: Tree<T>,
}

impl<T> Node<T> {
    pub fn new(key: T) -> Self {
        Node {
            key,
            left: None,
            right: None,
        }
    }

    /// Returns a tree holding a single node.
    pub fn leaf(key: T) -> Tree<T> {
        Some(Box::new(Node::new(key)))
    }

    /// Returns a tree rooted at a new node with the given subtrees.
    pub fn branch(key: T, left: Tree<T>, right: Tree<T>) -> Tree<T> {
        Some(Box::new(Node { key, left, right }))
    }
}

// Returns the height of the tree, or `None` if two leaves in it sit at different depths.
fn leaf_height<T>(tree: &Tree<T>) -> Option<usize> {
    match tree {
        None => Some(0),
        Some(ref node) => {
            let left = leaf_height(&node.left)?;
            let right = leaf_height(&node.right)?;
            // a missing child has no leaves below it, so it cannot disagree
            if left != 0 && right != 0 && left != right {
                return None;
            }
            Some(cmp::max(left, right) + 1)
        },
    }
}

/// Returns `true` if every root-to-leaf path of the tree has the same length. An empty tree has
/// no leaves and trivially satisfies this.
pub fn equal_paths<T>(tree: &Tree<T>) -> bool {
    leaf_height(tree).is_some()
}
