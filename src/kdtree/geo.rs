//! Two-dimensional queries taking [`geo_traits`] geometries.

use geo_traits::{CoordTrait, RectTrait};

use crate::cmp::Comparator;
use crate::kdtree::KDTree;
use crate::r#type::IndexableNum;

impl<'a, N: IndexableNum, S: IndexableNum, C: Comparator<N>> KDTree<'a, N, 2, S, C> {
    /// Search the tree for enabled points inside a rectangle, bounds included.
    ///
    /// See [`range_search_bbox`][KDTree::range_search_bbox].
    pub fn range_rect(&self, rect: &impl RectTrait<T = N>) -> Vec<&'a [N; 2]> {
        let (min, max) = (rect.min(), rect.max());
        self.range_search_bbox(&[min.x(), min.y()], &[max.x(), max.y()])
    }

    /// Find the enabled point closest to a coordinate.
    ///
    /// See [`nearest`][KDTree::nearest].
    pub fn nearest_coord(&self, coord: &impl CoordTrait<T = N>) -> Option<&'a [N; 2]> {
        self.nearest(&[coord.x(), coord.y()])
    }
}

#[cfg(test)]
mod test {
    use geo_types::{coord, Rect};

    use crate::kdtree::KDTree;

    #[test]
    fn rect_matches_bbox_search() {
        let points = [[0., 2.], [10., 10.], [0., 10.], [15., 0.]];
        let tree = KDTree::<f64, 2>::from_points(&points);
        let rect = Rect::new(coord! { x: -1., y: -1. }, coord! { x: 1., y: 20. });
        assert_eq!(
            tree.range_rect(&rect),
            tree.range_search_bbox(&[-1., -1.], &[1., 20.])
        );
        assert_eq!(tree.range_rect(&rect).len(), 2);
    }

    #[test]
    fn nearest_to_coord() {
        let points = [[0, 2], [10, 10], [0, 10], [15, 0]];
        let tree = KDTree::<i32, 2, f64>::from_points(&points);
        assert_eq!(tree.nearest_coord(&coord! { x: 14, y: 1 }), Some(&[15, 0]));
    }
}
