//! Range queries over arbitrary areas and axis-aligned bounding boxes.

use tinyvec::TinyVec;

use crate::cmp::Comparator;
use crate::kdtree::index::STACK_SIZE;
use crate::kdtree::node::Node;
use crate::kdtree::KDTree;
use crate::r#type::IndexableNum;

/// Where a query area lies relative to a splitting plane.
///
/// The plane passes through a node's point and is perpendicular to one axis. "Left" is the side
/// of smaller coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AreaPosition {
    /// The area lies entirely on the left of the plane.
    Left,
    /// The area lies entirely on the right of the plane.
    Right,
    /// The area crosses the plane.
    Intersects,
    /// The position can't be determined. Treated like [`AreaPosition::Intersects`].
    Unknown,
}

impl<'a, N: IndexableNum, const D: usize, S: IndexableNum, C: Comparator<N>>
    KDTree<'a, N, D, S, C>
{
    /// Search the tree for enabled points inside an area described by two functions.
    ///
    /// - `area_position(point, axis)` reports where the area lies relative to the plane through
    ///   `point` perpendicular to `axis`. Whenever it answers [`AreaPosition::Left`] or
    ///   [`AreaPosition::Right`] the subtree on the other side is skipped.
    /// - `inside_area(point)` decides whether a single point belongs to the result.
    ///
    /// Results are in pre-order: a node comes before the points of its left subtree, which come
    /// before those of its right subtree.
    pub fn range_search<P, F>(&self, area_position: P, inside_area: F) -> Vec<&'a [N; D]>
    where
        P: Fn(&[N; D], usize) -> AreaPosition,
        F: Fn(&[N; D]) -> bool,
    {
        let mut result = vec![];

        let mut stack: TinyVec<[(Option<&Node<'a, N, D>>, usize); STACK_SIZE]> = TinyVec::new();
        stack.push((self.root.as_deref(), 0));

        while let Some((node, depth)) = stack.pop() {
            let Some(node) = node else { continue };
            let axis = depth % D;

            match area_position(node.coords, axis) {
                AreaPosition::Left => stack.push((node.left.as_deref(), depth + 1)),
                AreaPosition::Right => stack.push((node.right.as_deref(), depth + 1)),
                AreaPosition::Intersects | AreaPosition::Unknown => {
                    if node.is_enabled() && inside_area(node.coords) {
                        result.push(node.coords);
                    }
                    // Note: pushed in backwards order to what gets popped
                    stack.push((node.right.as_deref(), depth + 1));
                    stack.push((node.left.as_deref(), depth + 1));
                }
            }
        }

        result
    }

    /// Search the tree for enabled points inside the axis-aligned box `[min, max]`, bounds
    /// included.
    ///
    /// Subtrees are pruned with the tree's comparator; points are then matched exactly against
    /// `min[i] <= p[i] <= max[i]` on every axis.
    pub fn range_search_bbox(&self, min: &[N; D], max: &[N; D]) -> Vec<&'a [N; D]> {
        let comparator = &self.comparator;
        self.range_search(
            |point, axis| {
                if comparator.compare(max[axis], point[axis]).is_lt() {
                    AreaPosition::Left
                } else if comparator.compare(min[axis], point[axis]).is_gt() {
                    AreaPosition::Right
                } else {
                    AreaPosition::Intersects
                }
            },
            |point| {
                point
                    .iter()
                    .zip(min.iter().zip(max.iter()))
                    .all(|(p, (lo, hi))| lo <= p && p <= hi)
            },
        )
    }
}

#[cfg(test)]
mod test {
    use super::AreaPosition;
    use crate::kdtree::KDTree;

    #[test]
    fn bbox_on_empty_tree() {
        let tree = KDTree::<i32, 2>::new();
        assert!(tree.range_search_bbox(&[0, 0], &[10, 10]).is_empty());
    }

    #[test]
    fn bbox_bounds_are_inclusive() {
        let points = [[0, 0], [10, 10], [5, 5], [10, 0], [11, 5]];
        let tree = KDTree::<i32, 2>::from_points(&points);
        let mut result = tree.range_search_bbox(&[0, 0], &[10, 10]);
        result.sort();
        assert_eq!(result, vec![&[0, 0], &[5, 5], &[10, 0], &[10, 10]]);
    }

    #[test]
    fn results_are_in_pre_order() {
        // 5 is the root, 2 goes left, 8 goes right, 1 goes left of 2
        let points = [[5], [2], [8], [1]];
        let tree = KDTree::<i32, 1>::from_points(&points);
        let result = tree.range_search_bbox(&[0], &[10]);
        assert_eq!(result, vec![&[5], &[2], &[1], &[8]]);
    }

    #[test]
    fn disabled_points_are_excluded() {
        let points = [[1, 1], [2, 2], [3, 3]];
        let mut tree = KDTree::<i32, 2>::from_points(&points);
        tree.nearest_neighbor(&[2, 2], true);
        let mut result = tree.range_search_bbox(&[0, 0], &[5, 5]);
        result.sort();
        assert_eq!(result, vec![&[1, 1], &[3, 3]]);
    }

    #[test]
    fn unknown_position_visits_everything() {
        let points = [[3, 1], [1, 3], [2, 2], [4, 4], [0, 5]];
        let tree = KDTree::<i32, 2>::from_points(&points);
        let mut result = tree.range_search(|_, _| AreaPosition::Unknown, |p| p[0] + p[1] == 4);
        result.sort();
        assert_eq!(result, vec![&[1, 3], &[2, 2], &[3, 1]]);
    }

    #[test]
    fn half_plane_predicate_prunes() {
        let points = [[5, 0], [2, 0], [8, 0], [7, 0], [9, 0]];
        let tree = KDTree::<i32, 2>::from_points(&points);
        let visited = std::cell::Cell::new(0);
        // All points with x >= 7: entirely right of any plane at x < 7 on axis 0
        let result = tree.range_search(
            |point, axis| {
                visited.set(visited.get() + 1);
                if axis == 0 && point[0] < 7 {
                    AreaPosition::Right
                } else {
                    AreaPosition::Intersects
                }
            },
            |point| point[0] >= 7,
        );
        assert_eq!(result, vec![&[8, 0], &[7, 0], &[9, 0]]);
        // [2, 0] sits left of the root and is never visited
        assert_eq!(visited.get(), 4);
    }

    #[test]
    fn float_box_catches_points_within_epsilon_of_a_plane() {
        // 1.0 - 5e-7 compares equal to 1.0 and is stored right of the root
        let points = [[1.0, 0.0], [1.0 - 5e-7, 0.0]];
        let tree = KDTree::<f64, 2>::from_points(&points);
        let result = tree.range_search_bbox(&[0.0, -1.0], &[1.0 - 4e-7, 1.0]);
        assert_eq!(result, vec![&[1.0 - 5e-7, 0.0]]);
    }
}
