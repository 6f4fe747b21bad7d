use crate::arena::{Arena, Handle};
use crate::avl_tree::node::Node;
use crate::entry::Entry;
use crate::error::{Error, Result};
use std::borrow::Borrow;
use std::cmp::{self, Ordering};

/// A binary search tree whose nodes live in an arena and link to their parents.
///
/// This type only knows how to navigate and re-link nodes. Keeping the tree balanced is the job of
/// the operations in `avl_tree::tree`.
pub struct Tree<T, U> {
    pub arena: Arena<Node<T, U>>,
    pub root: Option<Handle>,
}

fn swap_link(link: Option<Handle>, from: Handle, to: Handle) -> Option<Handle> {
    if link == Some(from) {
        Some(to)
    } else {
        link
    }
}

impl<T, U> Tree<T, U> {
    pub fn new() -> Self {
        Tree {
            arena: Arena::new(),
            root: None,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Tree {
            arena: Arena::with_capacity(capacity),
            root: None,
        }
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = None;
    }

    pub fn node(&self, handle: Handle) -> &Node<T, U> {
        &self.arena[handle]
    }

    pub fn node_mut(&mut self, handle: Handle) -> &mut Node<T, U> {
        &mut self.arena[handle]
    }

    pub fn parent(&self, handle: Handle) -> Option<Handle> {
        self.arena[handle].parent
    }

    pub fn left(&self, handle: Handle) -> Option<Handle> {
        self.arena[handle].left
    }

    pub fn right(&self, handle: Handle) -> Option<Handle> {
        self.arena[handle].right
    }

    pub fn set_parent(&mut self, handle: Handle, parent: Option<Handle>) {
        self.arena[handle].parent = parent;
    }

    pub fn set_left(&mut self, handle: Handle, left: Option<Handle>) {
        self.arena[handle].left = left;
    }

    pub fn set_right(&mut self, handle: Handle, right: Option<Handle>) {
        self.arena[handle].right = right;
    }

    pub fn balance(&self, handle: Handle) -> i8 {
        self.arena[handle].balance()
    }

    pub fn set_balance(&mut self, handle: Handle, balance: i8) {
        self.arena[handle].set_balance(balance);
    }

    pub fn update_balance(&mut self, handle: Handle, diff: i8) {
        self.arena[handle].update_balance(diff);
    }

    pub fn is_left_child(&self, handle: Handle) -> bool {
        match self.parent(handle) {
            Some(parent) => self.left(parent) == Some(handle),
            None => false,
        }
    }

    /// Puts `new` in the slot of `parent` that currently holds `old`, or makes it the root if
    /// `parent` is `None`. The parent link of `new` is updated to match; the links of `old` are
    /// left untouched.
    pub fn replace_child(&mut self, parent: Option<Handle>, old: Handle, new: Option<Handle>) {
        match parent {
            None => self.root = new,
            Some(parent) => {
                if self.left(parent) == Some(old) {
                    self.set_left(parent, new);
                } else {
                    self.set_right(parent, new);
                }
            },
        }
        if let Some(new) = new {
            self.set_parent(new, parent);
        }
    }

    pub fn find<V>(&self, key: &V) -> Result<Handle>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        let mut curr = self.root;
        while let Some(handle) = curr {
            let node = &self.arena[handle];
            curr = match key.cmp(node.entry.key.borrow()) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Ok(handle),
            };
        }
        Err(Error::KeyNotFound)
    }

    pub fn get<V>(&self, key: &V) -> Option<&Entry<T, U>>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        let handle = self.find(key).ok()?;
        Some(&self.arena[handle].entry)
    }

    pub fn get_mut<V>(&mut self, key: &V) -> Option<&mut Entry<T, U>>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        let handle = self.find(key).ok()?;
        Some(&mut self.arena[handle].entry)
    }

    pub fn subtree_min(&self, mut handle: Handle) -> Handle {
        while let Some(left) = self.left(handle) {
            handle = left;
        }
        handle
    }

    pub fn subtree_max(&self, mut handle: Handle) -> Handle {
        while let Some(right) = self.right(handle) {
            handle = right;
        }
        handle
    }

    pub fn min(&self) -> Option<Handle> {
        self.root.map(|root| self.subtree_min(root))
    }

    pub fn max(&self) -> Option<Handle> {
        self.root.map(|root| self.subtree_max(root))
    }

    /// Returns the node holding the next smaller key.
    pub fn predecessor(&self, handle: Handle) -> Option<Handle> {
        if let Some(left) = self.left(handle) {
            return Some(self.subtree_max(left));
        }
        let mut curr = handle;
        let mut parent = self.parent(curr);
        while let Some(p) = parent {
            if self.right(p) == Some(curr) {
                break;
            }
            curr = p;
            parent = self.parent(p);
        }
        parent
    }

    /// Returns the node holding the next larger key.
    pub fn successor(&self, handle: Handle) -> Option<Handle> {
        if let Some(right) = self.right(handle) {
            return Some(self.subtree_min(right));
        }
        let mut curr = handle;
        let mut parent = self.parent(curr);
        while let Some(p) = parent {
            if self.left(p) == Some(curr) {
                break;
            }
            curr = p;
            parent = self.parent(p);
        }
        parent
    }

    /// Exchanges the positions of two nodes. Each node takes over the other's parent and children
    /// and the surrounding nodes are re-pointed to match. Entries and balance factors stay with
    /// their nodes.
    pub fn node_swap(&mut self, n1: Handle, n2: Handle) {
        if n1 == n2 {
            return;
        }

        let (p1, l1, r1) = {
            let node = &self.arena[n1];
            (node.parent, node.left, node.right)
        };
        let (p2, l2, r2) = {
            let node = &self.arena[n2];
            (node.parent, node.left, node.right)
        };
        // sides must be read before any parent is re-pointed, since siblings share a parent
        let n1_is_left = self.is_left_child(n1);
        let n2_is_left = self.is_left_child(n2);

        {
            let node = &mut self.arena[n1];
            node.parent = swap_link(p2, n1, n2);
            node.left = swap_link(l2, n1, n2);
            node.right = swap_link(r2, n1, n2);
        }
        {
            let node = &mut self.arena[n2];
            node.parent = swap_link(p1, n2, n1);
            node.left = swap_link(l1, n2, n1);
            node.right = swap_link(r1, n2, n1);
        }

        match p1 {
            None => self.root = Some(n2),
            Some(p) if p != n2 => {
                if n1_is_left {
                    self.set_left(p, Some(n2));
                } else {
                    self.set_right(p, Some(n2));
                }
            },
            Some(_) => {},
        }
        match p2 {
            None => self.root = Some(n1),
            Some(p) if p != n1 => {
                if n2_is_left {
                    self.set_left(p, Some(n1));
                } else {
                    self.set_right(p, Some(n1));
                }
            },
            Some(_) => {},
        }

        for &handle in &[n1, n2] {
            let (left, right) = {
                let node = &self.arena[handle];
                (node.left, node.right)
            };
            if let Some(left) = left {
                self.set_parent(left, Some(handle));
            }
            if let Some(right) = right {
                self.set_parent(right, Some(handle));
            }
        }
    }

    pub fn subtree_height(&self, tree: Option<Handle>) -> usize {
        match tree {
            None => 0,
            Some(handle) => {
                let node = &self.arena[handle];
                cmp::max(self.subtree_height(node.left), self.subtree_height(node.right)) + 1
            },
        }
    }

    pub fn height(&self) -> usize {
        self.subtree_height(self.root)
    }

    /// Checks every structural invariant of the tree: parent links agree with child links, keys
    /// are in strict search order, stored balance factors match the subtree heights, no node is
    /// out of balance, and the arena holds no unreachable nodes.
    pub fn validate(&self) -> Result<()>
    where
        T: Ord,
    {
        let mut count = 0;
        self.validate_subtree(self.root, None, None, None, &mut count)?;
        if count != self.len() {
            return Err(Error::LengthMismatch);
        }
        Ok(())
    }

    fn validate_subtree<'a>(
        &'a self,
        tree: Option<Handle>,
        parent: Option<Handle>,
        lower: Option<&'a T>,
        upper: Option<&'a T>,
        count: &mut usize,
    ) -> Result<usize>
    where
        T: Ord,
    {
        let handle = match tree {
            None => return Ok(0),
            Some(handle) => handle,
        };
        let node = self.arena.get(handle).ok_or(Error::BrokenLink)?;
        if node.parent != parent {
            return Err(Error::BrokenLink);
        }

        // a cycle would otherwise recurse forever
        *count += 1;
        if *count > self.len() {
            return Err(Error::LengthMismatch);
        }

        let key = &node.entry.key;
        let below_lower = lower.map_or(false, |lower| key <= lower);
        let above_upper = upper.map_or(false, |upper| key >= upper);
        if below_lower || above_upper {
            return Err(Error::OrderViolation);
        }

        let left_height = self.validate_subtree(node.left, Some(handle), lower, Some(key), count)?;
        let right_height =
            self.validate_subtree(node.right, Some(handle), Some(key), upper, count)?;
        let balance = right_height as i64 - left_height as i64;
        if balance.abs() > 1 {
            return Err(Error::Unbalanced);
        }
        if balance != i64::from(node.balance()) {
            return Err(Error::BalanceMismatch);
        }
        Ok(cmp::max(left_height, right_height) + 1)
    }
}
