//! Error types for ordered collection operations.

use thiserror::Error;

/// Errors raised by the move operation.
///
/// Lookups by id never error: they report "not found" through their
/// return value instead.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderingError {
    /// A move referenced a position outside the sequence.
    #[error("Index {index} out of range for sequence of length {len}")]
    IndexOutOfRange {
        /// The offending index
        index: usize,
        /// Length of the sequence at the time of the move
        len: usize,
    },
}

impl OrderingError {
    /// Check if this error is an out-of-range index.
    pub fn is_index_out_of_range(&self) -> bool {
        matches!(self, OrderingError::IndexOutOfRange { .. })
    }
}

impl From<OrderingError> for crate::Error {
    fn from(err: OrderingError) -> Self {
        crate::Error::Ordering(err)
    }
}
