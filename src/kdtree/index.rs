use std::marker::PhantomData;

use tinyvec::TinyVec;

use crate::cmp::Comparator;
use crate::error::{KDIndexError, Result};
use crate::kdtree::node::{Link, Node};
use crate::r#type::IndexableNum;

/// Inline capacity of the explicit traversal stacks. Deeper trees spill onto the heap.
pub(crate) const STACK_SIZE: usize = 32;

/// A K-D tree built by successive insertion over points owned by the caller.
///
/// - `N`: the coordinate type.
/// - `D`: the number of dimensions. The splitting axis at depth `d` is `d % D`.
/// - `S`: the type squared distances are accumulated in. Defaults to `N`. Squared distances
///   saturate at `S::max_value()`, so nearest neighbor results are only exact while `S` can hold
///   `D * max_diff²`. Pick a wider type (e.g. `f64` for `i32` coordinates) when they could not.
/// - `C`: the [`Comparator`] ordering coordinates. Defaults to exact comparison for integers and
///   epsilon-tolerant comparison for floats.
///
/// The tree only stores references to points, so the point storage must outlive the tree. Points
/// can be soft-deleted ("disabled"), which hides them from queries without changing the tree's
/// shape.
///
/// The tree is not balanced: inserting points in sorted order degrades it towards a linked list.
/// All traversals use an explicit stack, so deep trees are slow but never overflow the call stack.
#[derive(Debug)]
pub struct KDTree<
    'a,
    N: IndexableNum,
    const D: usize,
    S: IndexableNum = N,
    C: Comparator<N> = <N as IndexableNum>::DefaultComparator,
> {
    pub(crate) root: Link<'a, N, D>,
    pub(crate) num_items: usize,
    pub(crate) num_disabled: usize,
    pub(crate) comparator: C,
    pub(crate) phantom: PhantomData<S>,
}

impl<'a, N: IndexableNum, const D: usize, S: IndexableNum, C: Comparator<N> + Default>
    KDTree<'a, N, D, S, C>
{
    /// Create an empty tree using the default comparator.
    pub fn new() -> Self {
        Self::with_comparator(C::default())
    }

    /// Create a tree from every point in `points`, inserted in slice order.
    pub fn from_points(points: &'a [[N; D]]) -> Self {
        let mut tree = Self::new();
        tree.extend(points);
        tree
    }

    /// Create a tree from the first `count` points of `points`, inserted in slice order.
    ///
    /// Returns [`KDIndexError::CountMismatch`] without inserting anything if `points` holds fewer
    /// than `count` points.
    #[tracing::instrument(level = "debug", skip(points))]
    pub fn try_from_points(points: &'a [[N; D]], count: usize) -> Result<Self> {
        if count > points.len() {
            return Err(KDIndexError::CountMismatch {
                requested: count,
                available: points.len(),
            });
        }

        let mut tree = Self::new();
        tree.extend(&points[..count]);
        tracing::debug!(num_items = count, height = tree.height(), "bulk loaded KDTree");
        Ok(tree)
    }

    /// Create a tree from a flat, interleaved coordinate buffer such as
    /// `[x0, y0, x1, y1, ...]` for `D = 2`.
    ///
    /// Returns [`KDIndexError::InvalidCoordinateBuffer`] if the buffer length isn't a multiple of
    /// `D`.
    pub fn from_interleaved(coords: &'a [N]) -> Result<Self> {
        let points = as_points::<N, D>(coords)?;
        Self::try_from_points(points, points.len())
    }
}

impl<'a, N: IndexableNum, const D: usize, S: IndexableNum, C: Comparator<N> + Default> Default
    for KDTree<'a, N, D, S, C>
{
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, N: IndexableNum, const D: usize, S: IndexableNum, C: Comparator<N>>
    KDTree<'a, N, D, S, C>
{
    /// Create an empty tree ordering coordinates with the given comparator.
    pub fn with_comparator(comparator: C) -> Self {
        Self {
            root: None,
            num_items: 0,
            num_disabled: 0,
            comparator,
            phantom: PhantomData,
        }
    }

    /// The number of dimensions of the points in this tree.
    pub fn dimensions() -> usize {
        D
    }

    /// The comparator ordering coordinates in this tree.
    pub fn comparator(&self) -> &C {
        &self.comparator
    }

    /// Insert a point into the tree.
    ///
    /// The point descends from the root, going left when its coordinate on the current axis
    /// compares strictly less than the visited node's and right otherwise, until it reaches an
    /// empty slot. Different insertion orders produce different tree shapes.
    pub fn insert(&mut self, point: &'a [N; D]) {
        let mut slot = &mut self.root;
        let mut depth = 0;
        while let Some(node) = slot {
            let axis = depth % D;
            slot = if self
                .comparator
                .compare(point[axis], node.coord(axis))
                .is_lt()
            {
                &mut node.left
            } else {
                &mut node.right
            };
            depth += 1;
        }
        *slot = Some(Box::new(Node::new(point)));
        self.num_items += 1;
    }

    /// The total number of points in this tree, whether enabled or not.
    pub fn len(&self) -> usize {
        self.num_items
    }

    /// Returns `true` if no points have been inserted since the tree was created or last cleared.
    pub fn is_empty(&self) -> bool {
        self.num_items == 0
    }

    /// The number of points currently visible to queries.
    pub fn num_enabled(&self) -> usize {
        self.num_items - self.num_disabled
    }

    /// The number of points currently hidden from queries.
    pub fn num_disabled(&self) -> usize {
        self.num_disabled
    }

    /// The number of nodes on the longest path from the root to a leaf. `0` for an empty tree.
    ///
    /// This visits every node.
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut stack: TinyVec<[(Option<&Node<'a, N, D>>, usize); STACK_SIZE]> = TinyVec::new();
        stack.push((self.root.as_deref(), 1));

        while let Some((node, depth)) = stack.pop() {
            let Some(node) = node else { continue };
            if node.is_leaf() {
                height = height.max(depth);
                continue;
            }
            stack.push((node.right.as_deref(), depth + 1));
            stack.push((node.left.as_deref(), depth + 1));
        }

        height
    }

    /// Enable every point in the tree.
    pub fn enable_all(&mut self) {
        self.for_each_node(|node| {
            node.set_enabled(true);
        });
        self.num_disabled = 0;
    }

    /// Remove every point from the tree, resetting it to empty.
    #[tracing::instrument(level = "debug", skip_all, fields(num_items = self.num_items))]
    pub fn remove_all(&mut self) {
        // Detach children before dropping each node so dropping never recurses.
        let mut stack: Vec<Box<Node<'a, N, D>>> = Vec::new();
        stack.extend(self.root.take());
        let mut freed = 0usize;
        while let Some(mut node) = stack.pop() {
            stack.extend(node.left.take());
            stack.extend(node.right.take());
            freed += 1;
        }

        if freed > 0 {
            tracing::debug!(freed, "tore down KDTree");
        }
        self.num_items = 0;
        self.num_disabled = 0;
    }

    /// Visit every node in pre-order.
    pub(crate) fn for_each_node(&self, mut f: impl FnMut(&Node<'a, N, D>)) {
        let mut stack: TinyVec<[Option<&Node<'a, N, D>>; STACK_SIZE]> = TinyVec::new();
        stack.push(self.root.as_deref());

        while let Some(node) = stack.pop() {
            let Some(node) = node else { continue };
            f(node);
            stack.push(node.right.as_deref());
            stack.push(node.left.as_deref());
        }
    }
}

impl<'a, N: IndexableNum, const D: usize, S: IndexableNum, C: Comparator<N>> Extend<&'a [N; D]>
    for KDTree<'a, N, D, S, C>
{
    fn extend<I: IntoIterator<Item = &'a [N; D]>>(&mut self, points: I) {
        for point in points {
            self.insert(point);
        }
    }
}

impl<'a, N: IndexableNum, const D: usize, S: IndexableNum, C: Comparator<N> + Clone> Clone
    for KDTree<'a, N, D, S, C>
{
    /// Copy the tree structure. The copy has new nodes in the same shape with the same enabled
    /// flags, but references the same point buffers as `self`.
    fn clone(&self) -> Self {
        let mut tree = Self::with_comparator(self.comparator.clone());
        tree.clone_from(self);
        tree
    }

    fn clone_from(&mut self, source: &Self) {
        self.remove_all();
        self.comparator = source.comparator.clone();

        let mut stack: Vec<(&Node<'a, N, D>, &mut Link<'a, N, D>)> = Vec::new();
        if let Some(root) = source.root.as_deref() {
            stack.push((root, &mut self.root));
        }
        while let Some((node, slot)) = stack.pop() {
            let copy = slot.insert(Box::new(Node::new(node.coords)));
            copy.set_enabled(node.is_enabled());
            let Node { left, right, .. } = &mut **copy;
            if let Some(right_node) = node.right.as_deref() {
                stack.push((right_node, right));
            }
            if let Some(left_node) = node.left.as_deref() {
                stack.push((left_node, left));
            }
        }

        self.num_items = source.num_items;
        self.num_disabled = source.num_disabled;
    }
}

impl<N: IndexableNum, const D: usize, S: IndexableNum, C: Comparator<N>> Drop
    for KDTree<'_, N, D, S, C>
{
    fn drop(&mut self) {
        self.remove_all();
    }
}

/// View a flat coordinate buffer as a slice of points.
pub(crate) fn as_points<N: IndexableNum, const D: usize>(coords: &[N]) -> Result<&[[N; D]]> {
    if D == 0 || coords.len() % D != 0 {
        return Err(KDIndexError::InvalidCoordinateBuffer {
            len: coords.len(),
            dimensions: D,
        });
    }
    bytemuck::try_cast_slice(coords).map_err(|_| KDIndexError::InvalidCoordinateBuffer {
        len: coords.len(),
        dimensions: D,
    })
}
