//! This module implements the pre-order cursor protocol over a tree.

use crate::{
    error::{Error, Result},
    node_idx::NodeIdx,
    tree::Tree,
};

/// A forward-only, single-pass pre-order traversal over one tree
/// snapshot.  The cursor holds a LIFO work list of pending nodes,
/// seeded with the root; the end position is the cursor whose work
/// list is empty.  A cursor is restartable only from scratch, by
/// obtaining a fresh one through `Tree::cursor`.
///
/// The cursor borrows the tree for its whole lifetime, so the tree
/// cannot be mutated mid-traversal.
pub struct Cursor<'tree, T> {
    tree: &'tree Tree<T>,
    stack: Vec<NodeIdx>,
}

// Manual impl: cloning a cursor never requires `T: Clone`, only the
// shared tree borrow and the work list are duplicated.
impl<T> Clone for Cursor<'_, T> {
    fn clone(&self) -> Self {
        Self { tree: self.tree, stack: self.stack.clone() }
    }
}

impl<'tree, T> Cursor<'tree, T> {
    pub(crate) fn begin(tree: &'tree Tree<T>) -> Self {
        let stack = match tree.root() {
            Some(root_idx) => vec![root_idx],
            None => Vec::new(),
        };
        Self { tree, stack }
    }

    pub(crate) fn end(tree: &'tree Tree<T>) -> Self {
        Self { tree, stack: Vec::new() }
    }

    /// Whether `self` is positioned at the end of its traversal.
    /// Callers must check this before dereferencing with `Self::current`.
    #[inline]
    pub fn is_end(&self) -> bool {
        self.stack.is_empty()
    }

    /// Get the `NodeIdx` of the node `self` is positioned at.
    /// Return `Error::EndOfTraversal` at the end position.
    #[inline]
    pub fn current_idx(&self) -> Result<NodeIdx> {
        self.stack.last().copied().ok_or(Error::EndOfTraversal)
    }

    /// Dereference `self` i.e. get the value of the node at the top of
    /// the work list.
    /// Return `Error::EndOfTraversal` at the end position.
    pub fn current(&self) -> Result<&'tree T> {
        let node_idx = self.current_idx()?;
        Ok(self.tree[node_idx].value())
    }

    /// Pop the current node and push its children onto the work list
    /// in reverse child-order, so that the leftmost child is popped
    /// next.  This reproduces left-to-right, parent-before-children
    /// visitation.  A no-op at the end position.
    pub fn advance(&mut self) {
        if let Some(node_idx) = self.stack.pop() {
            self.stack.extend(self.tree[node_idx].children().rev());
        }
    }
}

/// 2 cursors are equal iff their pending work lists are element-wise
/// equal.  In particular, a cursor equals `Tree::cursor_end` iff its
/// work list is empty; this is the loop-termination test.
impl<T> PartialEq for Cursor<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        self.stack == other.stack
    }
}

impl<T> Eq for Cursor<'_, T> {}

impl<T> std::fmt::Debug for Cursor<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cursor").field("stack", &self.stack).finish()
    }
}

/// The lazy-sequence form of the cursor: `next` dereferences, then
/// advances.  The sequence is finite; it yields every node of the
/// tree exactly once, in pre-order.
impl<'tree, T> Iterator for Cursor<'tree, T> {
    type Item = &'tree T;

    fn next(&mut self) -> Option<Self::Item> {
        let value = self.current().ok()?;
        self.advance();
        Some(value)
    }
}

impl<T> std::iter::FusedIterator for Cursor<'_, T> {}
