//! This module defines a rooted, ordered, arena-allocated tree
//! datastructure with pre-order traversal and value-equality search.
#![forbid(unsafe_code)]

pub(crate) mod arena;
pub mod cursor;
pub mod error;
pub mod node;
pub mod node_count;
pub mod node_idx;
pub mod tree;

#[rustfmt::skip]
pub use crate::{
    cursor::Cursor,
    error::{Error, Result},
    node::Node,
    node_count::NodeCount,
    node_idx::NodeIdx,
    tree::Tree,
};
