//! This module deals with arena allocation.

use crate::{
    node::Node,
    node_count::NodeCount,
    node_idx::NodeIdx,
};
use std::collections::VecDeque;

#[derive(Clone, Debug)]
pub(crate) struct Arena<T> {
    nodes: Vec<Node<T>>,
    garbage: VecDeque<NodeIdx>,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::with_capacity(64)
    }
}

impl<T> Arena<T> {
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(cap),
            garbage: VecDeque::with_capacity(cap),
        }
    }

    /// Get the logical size, which is defined as `physical size - garbage size`
    /// i.e. the number of allocated, non-garbage nodes in `self`.
    #[inline]
    pub fn logical_size(&self) -> NodeCount {
        self.physical_size() - self.garbage_size()
    }

    /// Get the physical size, which is defined as the number of nodes
    /// allocated in the arena, whether they are garbage or not.
    #[inline]
    pub fn physical_size(&self) -> NodeCount {
        NodeCount::from(self.nodes.len())
    }

    /// Get the garbage size i.e. the number of garbage nodes in `self`.
    #[inline]
    pub fn garbage_size(&self) -> NodeCount {
        NodeCount::from(self.garbage.len())
    }

    /// If there is a garbage `Node<T>` in `self`, recycle it.
    /// Otherwise, allocate a new one.
    /// In either case, assign `value` to the node, and return its `NodeIdx`.
    /// The new node is detached: it has no parent and no children.
    pub fn add_node(&mut self, value: T) -> NodeIdx {
        if let Some(node_idx) = self.garbage.pop_front() {
            self[node_idx].reset(value);
            node_idx
        } else {
            let node_idx = NodeIdx(self.nodes.len());
            self.nodes.push(Node::new(node_idx, value));
            node_idx
        }
    }

    /// Recycle `self[node_idx]`.  Since a node owns its children, all
    /// descendant nodes and all edges between them are removed as well.
    pub fn rm_node(&mut self, node_idx: NodeIdx) {
        if let Some(parent_idx) = self[node_idx].parent {
            self.rm_edge(parent_idx, node_idx);
        }
        for idx in self.dfs(node_idx).rev(/* leaves -> ... -> node_idx */) {
            // NOTE: Don't reset the `idx` field of `self[idx]`, since
            //       `Node<_>` identity persists between allocations.
            self[idx].children.clear();
            self[idx].parent = None;
            self.garbage.push_back(idx);
        }
    }

    /// Add an edge between `self[parent_idx]` and `self[child_idx]`.
    /// The former registers the latter as its last child, while the
    /// latter registers the former as its parent back-reference.
    pub fn add_edge(&mut self, parent_idx: NodeIdx, child_idx: NodeIdx) {
        self[parent_idx].add_child(child_idx);
        self[child_idx].parent = Some(parent_idx);
    }

    /// Remove the edge between `self[parent_idx]` and `self[child_idx]`,
    /// leaving `self[child_idx]` detached i.e. a root.
    pub fn rm_edge(&mut self, parent_idx: NodeIdx, child_idx: NodeIdx) {
        self[parent_idx].remove_child(child_idx);
        self[child_idx].parent = None;
    }

    pub fn self_or_ancestors_of(
        &self,
        node_idx: NodeIdx,
    ) -> impl DoubleEndedIterator<Item = NodeIdx> {
        let mut chain = vec![node_idx];
        while let Some(&idx) = chain.last() {
            match self[idx].parent {
                Some(parent_idx) => chain.push(parent_idx),
                None => break,
            }
        }
        chain.into_iter()
    }

    pub fn ancestors_of(
        &self,
        node_idx: NodeIdx,
    ) -> impl DoubleEndedIterator<Item = NodeIdx> {
        self.self_or_ancestors_of(node_idx).filter(move |&aidx| aidx != node_idx)
    }

    #[inline(always)]
    pub fn children_of(
        &self,
        node_idx: NodeIdx,
    ) -> impl DoubleEndedIterator<Item = NodeIdx> + '_ {
        self[node_idx].children()
    }

    #[inline(always)]
    pub fn descendants_of(
        &self,
        node_idx: NodeIdx,
    ) -> impl DoubleEndedIterator<Item = NodeIdx> {
        self.dfs(node_idx).filter(move |&didx| didx != node_idx)
    }

    /// Walk the subtree rooted in `self[start_idx]` in pre-order i.e.
    /// depth-first, parent before children, siblings left-to-right.
    /// The walk is driven by an explicit LIFO work list rather than
    /// recursion, so it cannot overflow the call stack on deep trees.
    /// Children are pushed in reverse order so that popping yields them
    /// left-to-right.  Every node reachable from `self[start_idx]` is
    /// visited exactly once.
    pub fn dfs(
        &self,
        start_idx: NodeIdx,
    ) -> impl DoubleEndedIterator<Item = NodeIdx> {
        let mut output = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![start_idx];
        while let Some(node_idx) = stack.pop() {
            output.push(node_idx);
            stack.extend(self[node_idx].children().rev());
        }
        output.into_iter()
    }
}

impl<T> std::ops::Index<NodeIdx> for Arena<T> {
    type Output = Node<T>;

    fn index(&self, idx: NodeIdx) -> &Self::Output {
        &self.nodes[idx.0]
    }
}

impl<T> std::ops::IndexMut<NodeIdx> for Arena<T> {
    fn index_mut(&mut self, idx: NodeIdx) -> &mut Self::Output {
        &mut self.nodes[idx.0]
    }
}
