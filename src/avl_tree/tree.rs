use crate::arena::Handle;
use crate::avl_tree::bst::Tree;
use crate::avl_tree::node::Node;
use crate::entry::Entry;
use log::trace;
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::mem;

// Balances of the (inner, outer) nodes after a double rotation promotes `pivot`. `heavy` is the
// side of the outer node that overflowed: -1 for left, 1 for right.
fn zig_zag_balances(pivot: i8, heavy: i8) -> (i8, i8) {
    if pivot == -heavy {
        (heavy, 0)
    } else if pivot == heavy {
        (0, -heavy)
    } else {
        (0, 0)
    }
}

impl<T, U> Tree<T, U> {
    pub fn rotate_left(&mut self, pivot: Handle) {
        let child = self
            .right(pivot)
            .expect("Expected right child node to be `Some`.");
        trace!("rotating left");
        let parent = self.parent(pivot);
        self.replace_child(parent, pivot, Some(child));

        let grandchild = self.left(child);
        self.set_right(pivot, grandchild);
        if let Some(grandchild) = grandchild {
            self.set_parent(grandchild, Some(pivot));
        }

        self.set_left(child, Some(pivot));
        self.set_parent(pivot, Some(child));
    }

    pub fn rotate_right(&mut self, pivot: Handle) {
        let child = self
            .left(pivot)
            .expect("Expected left child node to be `Some`.");
        trace!("rotating right");
        let parent = self.parent(pivot);
        self.replace_child(parent, pivot, Some(child));

        let grandchild = self.right(child);
        self.set_left(pivot, grandchild);
        if let Some(grandchild) = grandchild {
            self.set_parent(grandchild, Some(pivot));
        }

        self.set_right(child, Some(pivot));
        self.set_parent(pivot, Some(child));
    }

    // Promotes the child of `pivot` on the `heavy` side.
    fn rotate_toward(&mut self, pivot: Handle, heavy: i8) {
        if heavy < 0 {
            self.rotate_right(pivot);
        } else {
            self.rotate_left(pivot);
        }
    }

    fn child_on(&self, handle: Handle, side: i8) -> Option<Handle> {
        if side < 0 {
            self.left(handle)
        } else {
            self.right(handle)
        }
    }

    /// Exchanges the positions of two nodes along with their balance factors, so that each
    /// balance factor stays with the position it describes.
    pub fn swap_positions(&mut self, n1: Handle, n2: Handle) {
        self.node_swap(n1, n2);
        let balance = self.balance(n1);
        self.set_balance(n1, self.balance(n2));
        self.set_balance(n2, balance);
    }

    /// Inserts a key-value pair. If the key already exists, its value is replaced in place and
    /// the old value is returned; the shape of the tree does not change.
    pub fn insert(&mut self, key: T, value: U) -> Option<U>
    where
        T: Ord,
    {
        let mut curr = match self.root {
            Some(root) => root,
            None => {
                self.root = Some(self.arena.allocate(Node::new(key, value)));
                return None;
            },
        };

        let is_left = loop {
            let node = self.node(curr);
            let next = match key.cmp(&node.entry.key) {
                Ordering::Less => node.left.ok_or(true),
                Ordering::Greater => node.right.ok_or(false),
                Ordering::Equal => {
                    return Some(mem::replace(&mut self.node_mut(curr).entry.value, value));
                },
            };
            match next {
                Ok(child) => curr = child,
                Err(is_left) => break is_left,
            }
        };

        let parent = curr;
        let mut new_node = Node::new(key, value);
        new_node.parent = Some(parent);
        let child = self.arena.allocate(new_node);
        if is_left {
            self.set_left(parent, Some(child));
        } else {
            self.set_right(parent, Some(child));
        }

        if self.balance(parent) == 0 {
            self.set_balance(parent, if is_left { -1 } else { 1 });
            self.insert_fix_balance(parent, child);
        } else {
            // the new leaf filled the shorter side, so the height of `parent` is unchanged
            self.set_balance(parent, 0);
        }
        None
    }

    /// Walks up from `parent`, whose subtree just grew by one through `child`, until the growth
    /// is absorbed or repaired by a rotation.
    fn insert_fix_balance(&mut self, mut parent: Handle, mut child: Handle) {
        while let Some(grandparent) = self.parent(parent) {
            let heavy = if self.left(grandparent) == Some(parent) { -1 } else { 1 };
            self.update_balance(grandparent, heavy);

            let balance = self.balance(grandparent);
            if balance == 0 {
                trace!("insert fix-up absorbed height change");
                return;
            }
            if balance == heavy {
                child = parent;
                parent = grandparent;
                continue;
            }

            if self.child_on(parent, heavy) == Some(child) {
                self.rotate_toward(grandparent, heavy);
                self.set_balance(parent, 0);
                self.set_balance(grandparent, 0);
            } else {
                self.rotate_toward(parent, -heavy);
                self.rotate_toward(grandparent, heavy);
                let (inner, outer) = zig_zag_balances(self.balance(child), heavy);
                self.set_balance(parent, inner);
                self.set_balance(grandparent, outer);
                self.set_balance(child, 0);
            }
            return;
        }
    }

    /// Removes the entry with a particular key and returns it. Returns `None` and leaves the
    /// tree untouched if no such key exists.
    pub fn remove<V>(&mut self, key: &V) -> Option<Entry<T, U>>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        let node = self.find(key).ok()?;

        if self.left(node).is_some() && self.right(node).is_some() {
            let predecessor = self
                .predecessor(node)
                .expect("Expected a node with a left child to have a predecessor.");
            self.swap_positions(node, predecessor);
        }

        let child = self.left(node).or_else(|| self.right(node));
        let parent = self.parent(node);
        let difference = match parent {
            Some(parent) if self.left(parent) == Some(node) => 1,
            Some(_) => -1,
            None => 0,
        };
        self.replace_child(parent, node, child);

        let Node { entry, .. } = self.arena.free(node);
        self.remove_fix_balance(parent, difference);
        Some(entry)
    }

    /// Walks up from `node`, whose balance must shift by `difference` because one of its subtrees
    /// just shrank by one, until the shrinkage is absorbed or the root is passed.
    fn remove_fix_balance(&mut self, mut node: Option<Handle>, mut difference: i8) {
        while let Some(curr) = node {
            let parent = self.parent(curr);
            let next_difference = match parent {
                Some(parent) if self.left(parent) == Some(curr) => 1,
                Some(_) => -1,
                None => 0,
            };

            let balance = self.balance(curr) + difference;
            match balance {
                -2 | 2 => {
                    let heavy = balance / 2;
                    let taller_child = self
                        .child_on(curr, heavy)
                        .expect("Expected taller child node to be `Some`.");
                    let taller_balance = self.balance(taller_child);

                    if taller_balance == heavy {
                        self.rotate_toward(curr, heavy);
                        self.set_balance(curr, 0);
                        self.set_balance(taller_child, 0);
                    } else if taller_balance == 0 {
                        self.rotate_toward(curr, heavy);
                        self.set_balance(curr, heavy);
                        self.set_balance(taller_child, -heavy);
                        trace!("remove fix-up stopped after single rotation");
                        return;
                    } else {
                        let grandchild = self
                            .child_on(taller_child, -heavy)
                            .expect("Expected grandchild node to be `Some`.");
                        self.rotate_toward(taller_child, -heavy);
                        self.rotate_toward(curr, heavy);
                        let (inner, outer) = zig_zag_balances(self.balance(grandchild), heavy);
                        self.set_balance(taller_child, inner);
                        self.set_balance(curr, outer);
                        self.set_balance(grandchild, 0);
                    }
                },
                -1 | 1 => {
                    self.set_balance(curr, balance);
                    return;
                },
                _ => self.set_balance(curr, 0),
            }

            node = parent;
            difference = next_difference;
        }
    }
}
