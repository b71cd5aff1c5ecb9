//! The structural unit of the KDTree.

use std::cell::Cell;

use crate::r#type::IndexableNum;

/// An owned link to a child node. `None` marks the boundary of the tree.
pub(crate) type Link<'a, N, const D: usize> = Option<Box<Node<'a, N, D>>>;

/// A node in the KDTree.
///
/// A node owns both of its children but only borrows the coordinates of its point. Points in the
/// `left` subtree compare strictly less than this node on the node's splitting axis; points in the
/// `right` subtree compare greater or equal.
#[derive(Debug)]
pub(crate) struct Node<'a, N: IndexableNum, const D: usize> {
    pub(crate) left: Link<'a, N, D>,
    pub(crate) right: Link<'a, N, D>,
    pub(crate) coords: &'a [N; D],
    /// Soft-delete marker. Disabled nodes keep their place in the tree but are skipped by
    /// distance and range computations.
    pub(crate) enabled: Cell<bool>,
}

impl<'a, N: IndexableNum, const D: usize> Node<'a, N, D> {
    pub(crate) fn new(coords: &'a [N; D]) -> Self {
        Self {
            left: None,
            right: None,
            coords,
            enabled: Cell::new(true),
        }
    }

    /// Returns `true` if this is a leaf node without children.
    #[inline]
    pub(crate) fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// The coordinate of this node's point on the given axis.
    ///
    /// Panics if `axis >= D`.
    #[inline]
    pub(crate) fn coord(&self, axis: usize) -> N {
        debug_assert!(axis < D, "axis {} out of range for {} dimensions", axis, D);
        self.coords[axis]
    }

    #[inline]
    pub(crate) fn is_enabled(&self) -> bool {
        self.enabled.get()
    }

    /// Set the enabled flag, returning the previous value.
    #[inline]
    pub(crate) fn set_enabled(&self, enabled: bool) -> bool {
        self.enabled.replace(enabled)
    }
}
