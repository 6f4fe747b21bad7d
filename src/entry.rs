/// A key-value pair stored in a tree node.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Entry<T, U> {
    pub key: T,
    pub value: U,
}
