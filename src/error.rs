//! Errors reported by tree lookups and invariant checks.

use std::error;
use std::fmt;
use std::result;

/// An enum representing the ways a lookup or a structural check can fail.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Error {
    /// No node holds the requested key.
    KeyNotFound,
    /// A child's parent link does not point back at the node that owns it, or the root has a
    /// parent.
    BrokenLink,
    /// A key is not strictly between the keys bounding its subtree.
    OrderViolation,
    /// A stored balance factor differs from `height(right) - height(left)`.
    BalanceMismatch,
    /// The heights of a node's two subtrees differ by more than one.
    Unbalanced,
    /// The number of reachable nodes differs from the recorded length.
    LengthMismatch,
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let message = match self {
            Error::KeyNotFound => "key not found",
            Error::BrokenLink => "parent link does not match child link",
            Error::OrderViolation => "keys are not in strict search order",
            Error::BalanceMismatch => "stored balance factor does not match subtree heights",
            Error::Unbalanced => "subtree heights differ by more than one",
            Error::LengthMismatch => "reachable node count does not match length",
        };
        write!(f, "{}", message)
    }
}

pub type Result<T> = result::Result<T, Error>;
