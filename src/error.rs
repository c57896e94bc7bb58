//! Errors returned by heap construction and bulk extraction.

use thiserror::Error;

/// Failures that reject a whole call without touching the heap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HeapError {
    /// The heap would be created with room for no elements.
    #[error("heap capacity must be at least 1, got {capacity}")]
    InvalidCapacity {
        /// Capacity that was asked for.
        capacity: usize,
    },
    /// More elements were requested than the heap could ever hold.
    #[error("cannot take {requested} elements from a heap with capacity {capacity}")]
    OutOfRange {
        /// Number of elements that was asked for.
        requested: usize,
        /// Fixed capacity of the heap.
        capacity: usize,
    },
}

/// Result alias used throughout the crate.
pub type Result<T, E = HeapError> = std::result::Result<T, E>;
