//! An implementation of a K-D Tree built by insertion, with soft deletes.

#![warn(missing_docs)]

mod builder;
mod geo;
mod index;
mod nearest;
mod node;
mod range;

pub use builder::KDTreeBuilder;
pub use index::KDTree;
pub use range::AreaPosition;
