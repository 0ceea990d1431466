//!

use crate::node_idx::NodeIdx;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    displaydoc::Display,
    thiserror::Error,
)]
pub enum Error {
    /// Appending node {subroot:?} under node {parent:?} would create a cycle.
    Cycle { subroot: NodeIdx, parent: NodeIdx },
    /// Child index {index} is out of range for a node with {len} children.
    IndexOutOfRange { index: usize, len: usize },
    /// The operation requires a root node, but the tree is empty.
    EmptyTree,
    /// The cursor was dereferenced at the end of its traversal.
    EndOfTraversal,
}
