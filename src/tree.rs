//!

use crate::arena::Arena;
use crate::cursor::Cursor;
pub use crate::{
    error::{Error, Result},
    node::Node,
    node_count::NodeCount,
    node_idx::NodeIdx,
};
use itertools::{EitherOrBoth, Itertools};
use std::fmt;

#[macro_export]
/// Declaratively construct `Tree<T>` instances, where the `$value`
/// arguments all have type `T`.  The first parenthesized group is the
/// root; nested groups are appended as children, left to right.
macro_rules! tree {
    () => {
        $crate::Tree::new()
    };
    (
        ($value:expr $(, $($children:tt),+)?)
        $(,)?
    ) => {{ #[allow(redundant_semicolons, unused)] {
        let mut tree = $crate::Tree::with_root($value);
        if let Some(root_idx) = tree.root() {
            $(
                $(
                    $crate::place_tree! { [in tree] root_idx; $children }
                )+
            )? ;
        }
        tree
    }}};
}

pub use tree;

#[doc(hidden)]
#[macro_export]
// A "placement in" variant of the `tree!{}` macro.
// This internal version accommodates 3 things:
//   1. No `Tree` instance is created. Instead, one is passed
//      in as an additional macro argument named `$tree`.
//   2. No `Tree` instance is returned.
//   3. A `$parent_idx` is passed as a macro argument.
macro_rules! place_tree {
    (
        [in $tree:expr]
        $parent_idx:expr;
        ($value:expr $(, $($children:tt),+)?)
    ) => {{ #[allow(redundant_semicolons, unused)] {
        let node_idx: $crate::NodeIdx = $tree.add_node($parent_idx, $value);
        $(
            $(
                $crate::place_tree! { [in $tree] node_idx; $children }
            )+
        )? ;
    }}};
}

/// A rooted, ordered, multi-child tree.  Sibling order is insertion
/// order; this is not a search tree.  All nodes live in a flat arena
/// and are addressed by stable `NodeIdx` handles, with `parent` stored
/// as a non-owning back-index, so the acyclic ownership invariant
/// holds by construction.
#[derive(Clone, Debug)]
pub struct Tree<T> {
    arena: Arena<T>,
    root: Option<NodeIdx>,
}

impl<T> Default for Tree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Tree<T> {
    /// Construct an empty tree i.e. one without a root node.
    pub fn new() -> Self {
        Self::with_capacity(64)
    }

    /// Construct an empty tree with room for `cap` nodes.
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            arena: Arena::with_capacity(cap),
            root: None,
        }
    }

    /// Construct a tree with a single root node carrying `value`.
    pub fn with_root(value: T) -> Self {
        let mut arena = Arena::default();
        let root = arena.add_node(value);
        Self { arena, root: Some(root) }
    }

    #[inline(always)]
    pub fn root(&self) -> Option<NodeIdx> {
        self.root
    }

    #[inline(always)]
    pub fn root_ref(&self) -> Option<&Node<T>> {
        self.root.map(|ridx| &self[ridx])
    }

    /// Get the logical size, which is defined as `physical size - garbage size`
    /// i.e. the number of live nodes in `self`.
    #[inline]
    pub fn len(&self) -> NodeCount {
        self.arena.logical_size()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Get the physical size, which is defined as the number of nodes
    /// allocated in the tree, whether they are garbage or not.
    #[inline]
    pub fn physical_size(&self) -> NodeCount {
        self.arena.physical_size()
    }

    /// Get the garbage size i.e. the number of recycled nodes in `self`.
    #[inline]
    pub fn garbage_size(&self) -> NodeCount {
        self.arena.garbage_size()
    }

    /// Recycle every node in `self`, leaving the tree empty.
    pub fn clear(&mut self) {
        if let Some(root_idx) = self.root.take() {
            self.arena.rm_node(root_idx);
        }
    }

    /// Allocate a new leaf node carrying `value` and append it at the
    /// end of the children of `self[parent_idx]`.  This is the only
    /// operation that introduces new nodes into a tree; appending a
    /// fresh leaf can never create a cycle.
    pub fn add_node(&mut self, parent_idx: NodeIdx, value: T) -> NodeIdx {
        let node_idx = self.arena.add_node(value);
        self.arena.add_edge(parent_idx, node_idx);
        node_idx
    }

    /// Allocate a new leaf node carrying `value` and append it at the
    /// end of the root's children.
    /// Return `Error::EmptyTree` if `self` has no root; callers must
    /// construct the tree with an initial root value before appending.
    pub fn append(&mut self, value: T) -> Result<NodeIdx> {
        let root_idx = self.root.ok_or(Error::EmptyTree)?;
        Ok(self.add_node(root_idx, value))
    }

    #[rustfmt::skip]
    /// Make `self[subroot_idx]` the last child node of `self[parent_idx]`.
    /// Return `Error::Cycle` if `self[subroot_idx]` is `self[parent_idx]`
    /// itself or one of its ancestors: reattaching such a node would put
    /// it inside its own subtree.  On error, `self` is left unchanged.
    pub fn move_subtree(
        &mut self,
        subroot_idx: NodeIdx,
        parent_idx: NodeIdx,
    ) -> Result<()> {
        let is_cycle = self.arena.self_or_ancestors_of(parent_idx)
            .any(|aidx| aidx == subroot_idx);
        if is_cycle {
            return Err(Error::Cycle { subroot: subroot_idx, parent: parent_idx });
        }
        if let Some(old_parent_idx) = self.parent_of(subroot_idx) {
            self.arena.rm_edge(old_parent_idx, subroot_idx);
        }
        self.arena.add_edge(parent_idx, subroot_idx);
        Ok(())
    }

    /// Recycle `self[node_idx]`.  Since a node owns its children, the
    /// whole subtree rooted in `self[node_idx]` is recycled with it.
    /// Removing the root leaves the tree empty.
    pub fn rm_subtree(&mut self, node_idx: NodeIdx) {
        self.arena.rm_node(node_idx);
        if self.root == Some(node_idx) {
            self.root = None;
        }
    }

    /// Remove all descendant nodes of `self[node_idx]`, but
    /// not `self[node_idx]` itself.
    pub fn rm_descendants_of(&mut self, node_idx: NodeIdx) {
        for child_idx in self[node_idx].children.clone() {
            self.rm_subtree(child_idx);
        }
    }

    #[inline]
    pub fn parent_of(&self, node_idx: NodeIdx) -> Option<NodeIdx> {
        self[node_idx].parent()
    }

    #[inline(always)]
    pub fn self_or_ancestors_of(
        &self,
        node_idx: NodeIdx,
    ) -> impl DoubleEndedIterator<Item = NodeIdx> {
        self.arena.self_or_ancestors_of(node_idx)
    }

    #[inline(always)]
    pub fn ancestors_of(
        &self,
        node_idx: NodeIdx,
    ) -> impl DoubleEndedIterator<Item = NodeIdx> {
        self.arena.ancestors_of(node_idx)
    }

    #[inline(always)]
    pub fn children_of(
        &self,
        node_idx: NodeIdx,
    ) -> impl DoubleEndedIterator<Item = NodeIdx> + '_ {
        self.arena.children_of(node_idx)
    }

    #[inline(always)]
    pub fn descendants_of(
        &self,
        node_idx: NodeIdx,
    ) -> impl DoubleEndedIterator<Item = NodeIdx> {
        self.arena.descendants_of(node_idx)
    }

    #[inline(always)]
    pub fn dfs(
        &self,
        start_idx: NodeIdx,
    ) -> impl DoubleEndedIterator<Item = NodeIdx> {
        self.arena.dfs(start_idx)
    }

    /// Get the `index`-th child of `self[parent_idx]`.
    /// Return `Error::IndexOutOfRange` when `index` is not smaller than
    /// the current child count of `self[parent_idx]`.
    pub fn nth_child(
        &self,
        parent_idx: NodeIdx,
        index: usize,
    ) -> Result<NodeIdx> {
        let parent = &self[parent_idx];
        match parent.children.get(index) {
            Some(&child_idx) => Ok(child_idx),
            None => Err(Error::IndexOutOfRange {
                index,
                len: parent.count_children(),
            }),
        }
    }

    /// Get the `index`-th child of the root node.
    /// Return `Error::EmptyTree` if `self` has no root.
    pub fn child_at(&self, index: usize) -> Result<NodeIdx> {
        let root_idx = self.root.ok_or(Error::EmptyTree)?;
        self.nth_child(root_idx, index)
    }
}

impl<T: PartialEq> Tree<T> {
    /// Get the 0-based position among the children of `self[parent_idx]`
    /// of the first child whose value equals `value`, or `None` if no
    /// child matches.  Matching is by value, not by node identity, so
    /// duplicate-valued siblings beyond the first are never reported.
    #[rustfmt::skip]
    pub fn child_position(
        &self,
        parent_idx: NodeIdx,
        value: &T,
    ) -> Option<usize> {
        self.children_of(parent_idx)
            .position(|cidx| self[cidx].value() == value)
    }

    /// Get the position of the first root child whose value equals
    /// `value`.  Return `None` if no child matches or `self` is empty.
    pub fn index_of(&self, value: &T) -> Option<usize> {
        let root_idx = self.root?;
        self.child_position(root_idx, value)
    }

    /// Remove the first child of `self[parent_idx]` whose value equals
    /// `value`, recycling its whole subtree.  Return whether a match
    /// was found; removing a non-existent child is a no-op, not an error.
    pub fn rm_child(&mut self, parent_idx: NodeIdx, value: &T) -> bool {
        let Some(pos) = self.child_position(parent_idx, value) else {
            return false;
        };
        let child_idx = self[parent_idx].children[pos];
        self.rm_subtree(child_idx);
        true
    }

    /// Remove the first root child whose value equals `value`, recycling
    /// its whole subtree.  Return whether a match was found; `false` on
    /// an empty tree.
    pub fn remove(&mut self, value: &T) -> bool {
        match self.root {
            Some(root_idx) => self.rm_child(root_idx, value),
            None => false,
        }
    }

    /// Find the first node in pre-order whose value equals `target`,
    /// or `None` if there is no such node or `self` is empty.
    /// The walk shares its algorithm with `Self::dfs`: an explicit LIFO
    /// work list, children pushed in reverse order so that popping
    /// visits them left-to-right, parent before children.
    pub fn search(&self, target: &T) -> Option<NodeIdx> {
        let root_idx = self.root?;
        let mut stack = vec![root_idx];
        while let Some(node_idx) = stack.pop() {
            if self[node_idx].value() == target {
                return Some(node_idx);
            }
            stack.extend(self[node_idx].children().rev());
        }
        None
    }
}

impl<T> Tree<T> {
    /// Get a cursor positioned at the root, or at the end position if
    /// `self` is empty.  A fresh cursor always restarts from the root;
    /// traversal is not restartable from mid-stream.
    #[inline]
    pub fn cursor(&self) -> Cursor<'_, T> {
        Cursor::begin(self)
    }

    /// Get the cursor denoting the end position of a pre-order
    /// traversal over `self`.
    #[inline]
    pub fn cursor_end(&self) -> Cursor<'_, T> {
        Cursor::end(self)
    }

    /// Lazily iterate over the values of `self` in pre-order.
    #[inline]
    pub fn iter(&self) -> Cursor<'_, T> {
        self.cursor()
    }
}

impl<'tree, T> IntoIterator for &'tree Tree<T> {
    type Item = &'tree T;
    type IntoIter = Cursor<'tree, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.cursor()
    }
}

impl<T> std::ops::Index<NodeIdx> for Tree<T> {
    type Output = Node<T>;

    fn index(&self, idx: NodeIdx) -> &Self::Output {
        &self.arena[idx]
    }
}

impl<T> std::ops::IndexMut<NodeIdx> for Tree<T> {
    fn index_mut(&mut self, idx: NodeIdx) -> &mut Self::Output {
        &mut self.arena[idx]
    }
}

impl<T> PartialEq<Self> for Tree<T>
where
    T: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        // NOTE: The idea is to do a logical comparison where:
        // 1. Garbage nodes are excluded from comparison
        // 2. Live nodes are compared in DFS order
        let (sroot, oroot) = match (self.root, other.root) {
            (None, None) => return true,
            (Some(sroot), Some(oroot)) => (sroot, oroot),
            _ => return false,
        };
        for pair in self.dfs(sroot).zip_longest(other.dfs(oroot)) {
            let EitherOrBoth::Both(sidx, oidx) = pair else {
                return false;
            };
            let (snode, onode) = (&self[sidx], &other[oidx]);
            if snode.count_children() != onode.count_children() {
                return false;
            }
            if snode.value() != onode.value() {
                return false;
            }
        }
        true
    }
}

#[rustfmt::skip]
impl<T> Eq for Tree<T> where T: Eq {}

impl<T> fmt::Display for Tree<T>
where
    T: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let Some(root_idx) = self.root else {
            return Ok(());
        };
        // NOTE: This loop is `O(D * N)`, where:
        //       - D is the maximum depth of `self`
        //       - N is the number of nodes in `self`
        for node_idx in self.dfs(root_idx) {
            for _ in self.ancestors_of(node_idx) {
                write!(f, "| ")?; // no newline
            }
            let node = &self[node_idx];
            writeln!(f, "{} {}", node.idx(), node.value())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Data {
        tree: Tree<&'static str>,
        root: NodeIdx,
        node_a: NodeIdx,
        node_b: NodeIdx,
        node_c: NodeIdx,
        node_d: NodeIdx,
        dfs_order: Vec<NodeIdx>,
    }

    // R
    // |-- A
    // |   |-- C
    // |   `-- D
    // `-- B
    #[rustfmt::skip]
    fn make_data() -> Result<Data> {
        let mut tree = Tree::with_root("R");
        let root = tree.root().ok_or(Error::EmptyTree)?;
        let node_a = tree.append("A")?;
        let node_c = tree.add_node(node_a, "C");
        let node_d = tree.add_node(node_a, "D");
        let node_b = tree.append("B")?;
        Ok(Data {
            tree,
            root,
            node_a,
            node_b,
            node_c,
            node_d,
            dfs_order: vec![root, node_a, node_c, node_d, node_b],
        })
    }

    #[test]
    fn dfs_is_preorder() -> Result<()> {
        let data = make_data()?;
        let dfs_order: Vec<_> = data.tree.dfs(data.root).collect();
        assert_eq!(dfs_order, data.dfs_order);
        let values: Vec<_> = data.tree.iter().copied().collect();
        assert_eq!(values, &["R", "A", "C", "D", "B"]);
        Ok(())
    }

    #[test]
    fn sibling_order_is_insertion_order() -> Result<()> {
        let data = make_data()?;
        let children: Vec<_> = data.tree.children_of(data.root).collect();
        assert_eq!(children, &[data.node_a, data.node_b]);
        let children: Vec<_> = data.tree.children_of(data.node_a).collect();
        assert_eq!(children, &[data.node_c, data.node_d]);
        Ok(())
    }

    #[test]
    fn append_to_empty_tree() {
        let mut tree = Tree::<&str>::new();
        assert_eq!(tree.append("N"), Err(Error::EmptyTree));
    }

    #[test]
    fn search_finds_first_preorder_match() -> Result<()> {
        let data = make_data()?;
        assert_eq!(data.tree.search(&"C"), Some(data.node_c));
        assert_eq!(data.tree.search(&"B"), Some(data.node_b));
        assert_eq!(data.tree.search(&"R"), Some(data.root));
        assert_eq!(data.tree.search(&"Z"), None);
        Ok(())
    }

    #[test]
    fn search_prefers_the_first_duplicate() -> Result<()> {
        // Both `A` and `B` have a child valued "X"; pre-order visits
        // the one under `A` first.
        let mut data = make_data()?;
        let under_a = data.tree.add_node(data.node_a, "X");
        let _under_b = data.tree.add_node(data.node_b, "X");
        assert_eq!(data.tree.search(&"X"), Some(under_a));
        Ok(())
    }

    #[test]
    fn structural_remove_and_index_of() {
        let mut tree = tree! { (0, (1), (2), (2), (3)) };
        assert_eq!(tree.index_of(&2), Some(1));
        assert!(tree.remove(&2));
        let Some(root_idx) = tree.root() else {
            panic!("the macro built a rooted tree");
        };
        let children: Vec<i32> = tree.children_of(root_idx)
            .map(|cidx| *tree[cidx].value())
            .collect();
        assert_eq!(children, &[1, 2, 3]);
        // Absence is a no-op, not an error:
        assert!(!tree.remove(&7));
        assert_eq!(tree.index_of(&7), None);
    }

    #[test]
    fn nth_child_bounds() -> Result<()> {
        let data = make_data()?;
        assert_eq!(data.tree.child_at(0)?, data.node_a);
        assert_eq!(data.tree.child_at(1)?, data.node_b);
        assert_eq!(
            data.tree.child_at(2),
            Err(Error::IndexOutOfRange { index: 2, len: 2 })
        );
        assert_eq!(
            data.tree.nth_child(data.node_b, 0),
            Err(Error::IndexOutOfRange { index: 0, len: 0 })
        );
        Ok(())
    }

    #[test]
    fn empty_tree() {
        let tree = Tree::<u32>::default();
        assert_eq!(tree.root(), None);
        assert!(tree.root_ref().is_none());
        assert!(tree.is_empty());
        assert_eq!(tree.len(), NodeCount::from(0));
        assert_eq!(tree.search(&42), None);
        assert_eq!(tree.index_of(&42), None);
        assert_eq!(tree.child_at(0), Err(Error::EmptyTree));
        assert!(tree.cursor().is_end());
        assert_eq!(tree.cursor(), tree.cursor_end());
    }

    #[test]
    fn cycle_detection_leaves_the_tree_unchanged() -> Result<()> {
        let mut data = make_data()?;
        // `node_a` is an ancestor of `node_c`:
        assert_eq!(
            data.tree.move_subtree(data.node_a, data.node_c),
            Err(Error::Cycle { subroot: data.node_a, parent: data.node_c })
        );
        // A node is its own ancestor for the purposes of this check:
        assert_eq!(
            data.tree.move_subtree(data.node_b, data.node_b),
            Err(Error::Cycle { subroot: data.node_b, parent: data.node_b })
        );
        // The root can never be reattached:
        assert_eq!(
            data.tree.move_subtree(data.root, data.node_b),
            Err(Error::Cycle { subroot: data.root, parent: data.node_b })
        );
        let dfs_order: Vec<_> = data.tree.dfs(data.root).collect();
        assert_eq!(dfs_order, data.dfs_order);
        Ok(())
    }

    #[test]
    fn move_subtree_appends_at_the_back() -> Result<()> {
        let mut data = make_data()?;
        // Make `B` the last child of `A`, after `C` and `D`:
        data.tree.move_subtree(data.node_b, data.node_a)?;
        let children: Vec<_> = data.tree.children_of(data.node_a).collect();
        assert_eq!(children, &[data.node_c, data.node_d, data.node_b]);
        assert_eq!(data.tree.parent_of(data.node_b), Some(data.node_a));
        let values: Vec<_> = data.tree.iter().copied().collect();
        assert_eq!(values, &["R", "A", "C", "D", "B"]);
        Ok(())
    }

    #[test]
    fn removal_tears_down_the_whole_subtree() -> Result<()> {
        let mut data = make_data()?;
        assert!(data.tree.remove(&"A"));
        // No node of the `A` subtree remains reachable:
        assert_eq!(data.tree.search(&"A"), None);
        assert_eq!(data.tree.search(&"C"), None);
        assert_eq!(data.tree.search(&"D"), None);
        assert_eq!(data.tree.search(&"B"), Some(data.node_b));
        assert_eq!(data.tree.len(), NodeCount::from(2));
        assert_eq!(data.tree.garbage_size(), NodeCount::from(3));
        Ok(())
    }

    #[test]
    fn removing_the_root_empties_the_tree() -> Result<()> {
        let mut data = make_data()?;
        data.tree.rm_subtree(data.root);
        assert!(data.tree.is_empty());
        assert_eq!(data.tree.root(), None);
        assert_eq!(data.tree.len(), NodeCount::from(0));
        assert!(data.tree.cursor().is_end());
        Ok(())
    }

    #[test]
    fn rm_descendants_of() -> Result<()> {
        let mut data = make_data()?;
        data.tree.rm_descendants_of(data.node_a);
        assert!(data.tree[data.node_a].is_leaf());
        let values: Vec<_> = data.tree.iter().copied().collect();
        assert_eq!(values, &["R", "A", "B"]);
        Ok(())
    }

    #[test]
    fn ancestors_of() -> Result<()> {
        let data = make_data()?;
        let ancestors: Vec<_> = data.tree.ancestors_of(data.node_c).collect();
        assert_eq!(ancestors, &[data.node_a, data.root]);
        let ancestors: Vec<_> = data.tree.ancestors_of(data.root).collect();
        assert!(ancestors.is_empty());
        Ok(())
    }

    #[test]
    fn descendants_of() -> Result<()> {
        let data = make_data()?;
        let descendants: Vec<_> = data.tree.descendants_of(data.node_a).collect();
        assert_eq!(descendants, &[data.node_c, data.node_d]);
        Ok(())
    }

    #[test]
    fn tree_macro_matches_manual_construction() -> Result<()> {
        let data = make_data()?;
        let tree = tree! {
            ("R",
                ("A", ("C"), ("D")),
                ("B"))
        };
        assert_eq!(tree, data.tree, "\n{} !=\n{}", tree, data.tree);
        let empty = tree! {};
        assert_eq!(empty, Tree::<&str>::new());
        Ok(())
    }

    #[test]
    fn logical_eq_ignores_garbage() -> Result<()> {
        let data = make_data()?;
        // Build the same logical tree along a different allocation
        // history, so that the arenas differ physically:
        let mut other = tree! {
            ("R",
                ("A", ("C"), ("D")),
                ("XYZ"),
                ("B"))
        };
        assert_ne!(other, data.tree);
        assert!(other.remove(&"XYZ"));
        assert_eq!(other, data.tree, "\n{} !=\n{}", other, data.tree);
        assert_ne!(other.garbage_size(), data.tree.garbage_size());
        Ok(())
    }

    #[test]
    fn display_indents_by_depth() -> Result<()> {
        let data = make_data()?;
        let rendered = format!("{}", data.tree);
        let lines: Vec<_> = rendered.lines().collect();
        assert_eq!(lines, &[
            "0 R",
            "| 1 A",
            "| | 2 C",
            "| | 3 D",
            "| 4 B",
        ]);
        assert_eq!(format!("{}", Tree::<&str>::new()), "");
        Ok(())
    }

    #[test]
    fn clear_recycles_every_node() -> Result<()> {
        let mut data = make_data()?;
        data.tree.clear();
        assert!(data.tree.is_empty());
        assert_eq!(data.tree.len(), NodeCount::from(0));
        assert_eq!(data.tree.garbage_size(), NodeCount::from(5));
        Ok(())
    }
}
