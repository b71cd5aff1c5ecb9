use crate::cmp::Comparator;
use crate::error::{KDIndexError, Result};
use crate::kdtree::index::as_points;
use crate::kdtree::KDTree;
use crate::r#type::IndexableNum;

/// A builder to create a [`KDTree`] holding a declared number of points.
///
/// Points are inserted as they are added, in the order they are added. [`finish`][Self::finish]
/// checks that exactly the declared number of points arrived.
#[derive(Debug)]
pub struct KDTreeBuilder<
    'a,
    N: IndexableNum,
    const D: usize,
    S: IndexableNum = N,
    C: Comparator<N> = <N as IndexableNum>::DefaultComparator,
> {
    tree: KDTree<'a, N, D, S, C>,
    num_items: usize,
}

impl<'a, N: IndexableNum, const D: usize, S: IndexableNum, C: Comparator<N> + Default>
    KDTreeBuilder<'a, N, D, S, C>
{
    /// Create a new builder with the provided number of items and the default comparator.
    pub fn new(num_items: usize) -> Self {
        Self::new_with_comparator(num_items, C::default())
    }
}

impl<'a, N: IndexableNum, const D: usize, S: IndexableNum, C: Comparator<N>>
    KDTreeBuilder<'a, N, D, S, C>
{
    /// Create a new builder with the provided number of items and comparator.
    pub fn new_with_comparator(num_items: usize, comparator: C) -> Self {
        Self {
            tree: KDTree::with_comparator(comparator),
            num_items,
        }
    }

    /// Add a point to the index, returning its insertion index.
    pub fn add(&mut self, point: &'a [N; D]) -> usize {
        let index = self.tree.len();
        self.tree.insert(point);
        index
    }

    /// Add every point of a flat, interleaved coordinate buffer such as `[x0, y0, x1, y1, ...]`.
    pub fn add_interleaved(&mut self, coords: &'a [N]) -> Result<()> {
        let points = as_points::<N, D>(coords)?;
        self.tree.extend(points);
        Ok(())
    }

    /// Consume this builder, returning the tree.
    ///
    /// Returns [`KDIndexError::CountMismatch`] if the number of added points differs from the
    /// number this builder was created with.
    pub fn finish(self) -> Result<KDTree<'a, N, D, S, C>> {
        if self.tree.len() != self.num_items {
            return Err(KDIndexError::CountMismatch {
                requested: self.num_items,
                available: self.tree.len(),
            });
        }
        Ok(self.tree)
    }
}
