//!

use crate::node_idx::NodeIdx;

#[rustfmt::skip]
#[derive(
    Clone,
    derive_more::Deref,
    derive_more::DerefMut,
)]
pub struct Node<T> {
    pub(crate) idx: NodeIdx,
    pub(crate) parent: Option<NodeIdx>,
    pub(crate) children: Vec<NodeIdx>,
    #[deref]
    #[deref_mut]
    pub(crate) value: T,
}

impl<T> Node<T> {
    pub(crate) fn new(idx: NodeIdx, value: T) -> Self {
        Node {
            idx,
            parent: None,
            children: Vec::with_capacity(4),
            value,
        }
    }

    #[inline(always)]
    pub fn idx(&self) -> NodeIdx {
        self.idx
    }

    #[inline(always)]
    pub fn value(&self) -> &T {
        &self.value
    }

    /// The parent of `self`, or `None` if `self` is a root.
    /// This is a back-reference: the parent owns `self`, never vice versa.
    #[inline(always)]
    pub fn parent(&self) -> Option<NodeIdx> {
        self.parent
    }

    /// A read-only, insertion-ordered view of the children of `self`.
    #[inline(always)]
    pub fn children(&self) -> impl DoubleEndedIterator<Item = NodeIdx> + '_ {
        self.children.iter().copied()
    }

    #[inline(always)]
    pub fn count_children(&self) -> usize {
        self.children.len()
    }

    #[inline(always)]
    pub(crate) fn add_child(&mut self, child_idx: NodeIdx) {
        self.children.push(child_idx);
    }

    /// Filter out `child_idx` from `self.children`.
    /// A no-op if `self.children` does not contain `child_idx`.
    #[inline]
    #[rustfmt::skip]
    pub(crate) fn remove_child(&mut self, child_idx: NodeIdx) {
        self.children.retain(|&cidx| cidx != child_idx);
    }

    #[inline(always)]
    pub(crate) fn reset(&mut self, value: T) {
        self.parent = None;
        self.children.clear();
        self.value = value;
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    #[inline]
    pub fn is_branch(&self) -> bool {
        !self.is_leaf()
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Node equality is shallow: 2 nodes are equal iff their values are
/// equal. Neither `parent` nor `children` nor `idx` take part, so
/// `rm_child`/`child_position` match by payload rather than identity.
impl<T: PartialEq> PartialEq for Node<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T: Eq> Eq for Node<T> {}

impl<T: std::fmt::Debug> std::fmt::Debug for Node<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut ds = f.debug_struct("Node");
        let ds = ds.field("idx", &self.idx);
        let ds = ds.field("parent", &self.parent);
        let ds = ds.field("children", &self.children);
        let ds = ds.field("value", &self.value);
        ds.finish()
    }
}
