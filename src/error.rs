use std::io;

use thiserror::Error;

/// Failure taxonomy surfaced across the writer boundary.
///
/// Every public operation returns one of these synchronously; nothing is
/// retried internally. After a [`WriterError::FileWrite`] the pending bytes
/// that were not accepted by the OS remain buffered, so the caller may retry
/// [`flush`](crate::FileWriter::flush).
#[derive(Debug, Error)]
pub enum WriterError {
    /// Path argument was empty or unusable at open time.
    #[error("invalid file path")]
    InvalidPath,

    /// The OS-level open call failed (permissions, bad parent directory, ...).
    #[error("failed to open file")]
    FileOpen(#[source] io::Error),

    /// Operation invoked on a writer that was already closed.
    #[error("writer handle is closed")]
    InvalidHandle,

    /// Malformed call argument, e.g. a zero buffer-size request.
    #[error("invalid argument: {0}")]
    InvalidData(&'static str),

    /// The underlying write failed (disk full, I/O fault, broken pipe).
    #[error("failed to write to file")]
    FileWrite(#[source] io::Error),

    /// Sync or another I/O fault outside the write path.
    #[error("i/o error")]
    Io(#[source] io::Error),

    /// Close-time flush or the OS close call failed. The writer is
    /// invalidated regardless.
    #[error("failed to close file")]
    FileClose(#[source] io::Error),
}

pub type Result<T> = std::result::Result<T, WriterError>;
