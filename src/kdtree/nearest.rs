//! Nearest neighbor queries under the Euclidean metric.

use tinyvec::TinyVec;

use crate::cmp::Comparator;
use crate::kdtree::index::STACK_SIZE;
use crate::kdtree::node::Node;
use crate::kdtree::KDTree;
use crate::r#type::{abs_diff, add_square, IndexableNum};

/// A subtree waiting to be searched, with its depth and, for subtrees on the far side of a
/// splitting plane, the squared distance from the query to that plane.
type Visit<'t, 'a, N, const D: usize, S> = (Option<&'t Node<'a, N, D>>, usize, Option<S>);

impl<'a, N: IndexableNum, const D: usize, S: IndexableNum, C: Comparator<N>>
    KDTree<'a, N, D, S, C>
{
    /// Find the enabled point closest to `query` by Euclidean distance.
    ///
    /// Returns `None` if the tree is empty or every point is disabled. Among points at the same
    /// distance the first one reached by the search wins.
    pub fn nearest(&self, query: &[N; D]) -> Option<&'a [N; D]> {
        self.nearest_node(query).map(|(node, _)| node.coords)
    }

    /// Find the enabled point closest to `query`, optionally disabling it.
    ///
    /// With `disable_on_find` set, the found point is hidden from later queries, so repeated calls
    /// walk through the points in order of increasing distance. Use
    /// [`enable_all`][KDTree::enable_all] to bring them back.
    pub fn nearest_neighbor(
        &mut self,
        query: &[N; D],
        disable_on_find: bool,
    ) -> Option<&'a [N; D]> {
        let (node, _) = self.nearest_node(query)?;
        let coords = node.coords;
        if disable_on_find && node.set_enabled(false) {
            self.num_disabled += 1;
        }
        Some(coords)
    }

    /// Extract up to `k` enabled points closest to `query`, nearest first.
    ///
    /// Fewer than `k` points are returned if the tree doesn't have that many enabled points.
    /// Afterwards every returned point is enabled if `leave_enabled` is set and disabled
    /// otherwise.
    ///
    /// This runs one nearest neighbor search per returned point.
    pub fn k_nearest(
        &mut self,
        query: &[N; D],
        k: usize,
        leave_enabled: bool,
    ) -> Vec<&'a [N; D]> {
        let results: Vec<&'a [N; D]> = {
            let mut found: Vec<&Node<'a, N, D>> = Vec::with_capacity(k.min(self.num_enabled()));
            while found.len() < k {
                match self.nearest_node(query) {
                    Some((node, _)) => {
                        node.set_enabled(false);
                        found.push(node);
                    }
                    None => break,
                }
            }

            // Every found node was enabled before the search hid it.
            for node in found.iter() {
                node.set_enabled(leave_enabled);
            }
            found.iter().map(|node| node.coords).collect()
        };
        if !leave_enabled {
            self.num_disabled += results.len();
        }

        tracing::trace!(k, found = results.len(), leave_enabled, "k nearest extraction");
        results
    }

    /// Branch-and-bound search for the enabled node closest to `query`, with its squared distance.
    ///
    /// At each node the child on the query's side of the splitting plane is searched first. The
    /// other child is only searched if the splitting plane, moved towards the query by the
    /// comparator's tolerance, is strictly closer than the best point found so far. Disabled nodes
    /// are never candidates but still steer the descent.
    pub(crate) fn nearest_node(&self, query: &[N; D]) -> Option<(&Node<'a, N, D>, S)> {
        let mut best: Option<(&Node<'a, N, D>, S)> = None;
        let tolerance: S = abs_diff(N::zero(), self.comparator.tolerance());

        let mut stack: TinyVec<[Visit<'_, 'a, N, D, S>; STACK_SIZE]> = TinyVec::new();
        stack.push((self.root.as_deref(), 0, None));

        while let Some((node, depth, plane_dist)) = stack.pop() {
            let Some(node) = node else { continue };

            // The near side may have found something closer than this plane since it was queued.
            if let (Some(plane_dist), Some((_, best_dist))) = (plane_dist, best) {
                if plane_dist >= best_dist {
                    continue;
                }
            }

            if node.is_enabled() {
                let dist = sq_dist::<N, S, D>(query, node.coords);
                if best.map_or(true, |(_, best_dist)| dist < best_dist) {
                    best = Some((node, dist));
                }
            }

            let axis = depth % D;
            let (near, far) = if self
                .comparator
                .compare(query[axis], node.coord(axis))
                .is_lt()
            {
                (&node.left, &node.right)
            } else {
                (&node.right, &node.left)
            };

            // Far-side points can sit up to `tolerance` past the plane.
            let plane: S = abs_diff(query[axis], node.coord(axis));
            let bound = if plane > tolerance {
                plane - tolerance
            } else {
                S::zero()
            };
            // Pushed first so the whole near subtree is searched before it.
            stack.push((far.as_deref(), depth + 1, Some(add_square(S::zero(), bound))));
            stack.push((near.as_deref(), depth + 1, None));
        }

        best
    }
}

/// Squared Euclidean distance between two points, accumulated in `S` and saturating at
/// `S::max_value()`.
#[inline]
pub(crate) fn sq_dist<N: IndexableNum, S: IndexableNum, const D: usize>(
    a: &[N; D],
    b: &[N; D],
) -> S {
    a.iter()
        .zip(b.iter())
        .fold(S::zero(), |acc, (&a, &b)| add_square(acc, abs_diff(a, b)))
}
