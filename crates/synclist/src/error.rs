//! # Sequence Error Types
//!
//! All errors that can be signaled by the sequence, its cursors, or config
//! loading. None of them ever leaves the arbiter in an acquired state.

use std::fmt;

use thiserror::Error;

/// Traversal direction of a cursor step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// `next()`.
    Forward,
    /// `previous()`.
    Backward,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Forward => f.write_str("next"),
            Self::Backward => f.write_str("previous"),
        }
    }
}

/// Errors that can occur when operating on a [`SyncSeq`](crate::SyncSeq).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SeqError {
    /// A cursor stepped past a valid bound.
    #[error("no {direction} element")]
    ExhaustedIteration {
        /// The direction of the failed step.
        direction: Direction,
    },

    /// Positional access with an invalid index.
    #[error("index {index} out of range for sequence of length {len}")]
    IndexOutOfRange {
        /// The offending index (cursor positions may be negative).
        index: isize,
        /// Length of the sequence at the time of the call.
        len: usize,
    },

    /// The operation is not implemented by this sequence.
    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),

    /// Invalid configuration text or file.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl SeqError {
    /// Builds an [`SeqError::IndexOutOfRange`] from an unsigned index.
    #[must_use]
    pub fn out_of_range(index: usize, len: usize) -> Self {
        Self::IndexOutOfRange {
            index: isize::try_from(index).unwrap_or(isize::MAX),
            len,
        }
    }
}

/// Result type for sequence operations.
pub type SeqResult<T> = Result<T, SeqError>;
