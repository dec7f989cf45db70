use std::{collections::TryReserveError, io};

use thiserror::Error;

/// Why a read could not complete.
///
/// End-of-stream is not an error: line reads return whatever was collected,
/// byte reads return `None`.
#[derive(Error, Debug)]
pub enum ReadError {
    /// The line buffer could not be allocated or grown.
    #[error("failed to grow line buffer to {requested} bytes")]
    Alloc {
        /// Total buffer size that was being requested.
        requested: usize,
        /// The allocator's refusal.
        #[source]
        source: TryReserveError,
    },
    /// The underlying raw read failed.
    #[error("raw read failed: {0}")]
    Io(#[from] io::Error),
}

/// Fieldless mirror of [`ReadError`] for matching without the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadErrorKind {
    /// See [`ReadError::Alloc`].
    Alloc,
    /// See [`ReadError::Io`].
    Io,
}

impl ReadError {
    /// Which of the two failure classes this is.
    #[must_use]
    pub fn kind(&self) -> ReadErrorKind {
        match self {
            Self::Alloc { .. } => ReadErrorKind::Alloc,
            Self::Io(_) => ReadErrorKind::Io,
        }
    }
}
