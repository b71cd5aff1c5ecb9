use std::fmt::Debug;
use thiserror::Error;

/// Enum with all errors in this crate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KDIndexError {
    /// More points were requested than the source actually holds, or a builder was finished
    /// with a different number of points than it was declared with.
    #[error("Expected {requested} points but {available} were available.")]
    CountMismatch {
        /// The number of points asked for.
        requested: usize,
        /// The number of points actually present.
        available: usize,
    },

    /// A flat coordinate buffer could not be viewed as a sequence of points.
    #[error("Coordinate buffer of length {len} cannot be split into points of {dimensions} dimensions.")]
    InvalidCoordinateBuffer {
        /// The length of the buffer.
        len: usize,
        /// The number of coordinates per point.
        dimensions: usize,
    },
}

/// Result type returned by fallible constructors in this crate.
pub type Result<T> = std::result::Result<T, KDIndexError>;

#[cfg(test)]
mod test {
    use super::KDIndexError;

    #[test]
    fn messages_name_the_fields() {
        let err = KDIndexError::CountMismatch {
            requested: 5,
            available: 3,
        };
        assert_eq!(err.to_string(), "Expected 5 points but 3 were available.");

        let err = KDIndexError::InvalidCoordinateBuffer {
            len: 7,
            dimensions: 2,
        };
        assert_eq!(
            err.to_string(),
            "Coordinate buffer of length 7 cannot be split into points of 2 dimensions."
        );
    }
}
