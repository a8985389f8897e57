//! Error types shared by every queue and by the search
//!
//! Runtime failures of a queue operation are [`HeapError`]s. Bad construction
//! parameters are [`ConfigError`]s and are reported by the fallible
//! constructors before any structure exists.
//!
//! Rejected-but-legal requests (adding an element an indexed queue already
//! holds, or a `decrease_priority` that does not strictly improve) are not
//! errors; those operations return `false`.

use thiserror::Error;

/// Error type for priority queue operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HeapError {
    /// `extract_min` was called on a queue holding no records
    #[error("priority queue is empty")]
    EmptyStructure,
    /// `decrease_priority` was called on a queue without an element index
    #[error("decrease_priority is not supported by unindexed priority queues")]
    UnsupportedOperation,
}

/// Invalid construction parameters
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Dial bucket width was zero, negative, NaN or infinite
    #[error("bucket width must be positive and finite, got {0}")]
    InvalidBucketWidth(String),
    /// d-ary heap arity below two
    #[error("heap arity must be at least 2, got {0}")]
    InvalidArity(usize),
    /// B-tree minimum degree below two
    #[error("B-tree minimum degree must be at least 2, got {0}")]
    InvalidMinimumDegree(usize),
    /// van Emde Boas universe smaller than the base case
    #[error("universe size {universe} is below the minimum of {minimum}")]
    UniverseTooSmall {
        /// Requested universe size
        universe: u64,
        /// Smallest accepted universe size
        minimum: u64,
    },
    /// van Emde Boas universe that cannot be rounded up to a power of two
    #[error("universe size {0} cannot be rounded up to a power of two")]
    UniverseTooLarge(u64),
}
