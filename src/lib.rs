#![doc = include_str!("../README.md")]

pub mod cmp;
mod error;
pub mod kdtree;
mod r#type;

pub use error::{KDIndexError, Result};
pub use kdtree::{AreaPosition, KDTree, KDTreeBuilder};
pub use r#type::IndexableNum;
