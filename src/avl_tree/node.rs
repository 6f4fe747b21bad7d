use crate::arena::Handle;
use crate::entry::Entry;

/// A struct representing an internal node of an avl tree.
///
/// `balance` is `height(right) - height(left)`. It lies in `-1..=1` whenever the tree is at rest
/// and only reaches `-2` or `2` in the middle of a fix-up.
pub struct Node<T, U> {
    pub entry: Entry<T, U>,
    pub balance: i8,
    pub parent: Option<Handle>,
    pub left: Option<Handle>,
    pub right: Option<Handle>,
}

impl<T, U> Node<T, U> {
    pub fn new(key: T, value: U) -> Self {
        Node {
            entry: Entry { key, value },
            balance: 0,
            parent: None,
            left: None,
            right: None,
        }
    }

    pub fn balance(&self) -> i8 {
        self.balance
    }

    pub fn set_balance(&mut self, balance: i8) {
        self.balance = balance;
    }

    pub fn update_balance(&mut self, diff: i8) {
        self.balance += diff;
    }
}

#[cfg(test)]
mod tests {
    use super::Node;

    #[test]
    fn test_new_node_is_balanced_leaf() {
        let node = Node::new(1, "a");
        assert_eq!(node.balance(), 0);
        assert!(node.parent.is_none());
        assert!(node.left.is_none() && node.right.is_none());
    }

    #[test]
    fn test_update_balance() {
        let mut node = Node::new(1, ());
        node.update_balance(-1);
        node.update_balance(-1);
        assert_eq!(node.balance(), -2);
        node.set_balance(1);
        assert_eq!(node.balance(), 1);
    }
}
