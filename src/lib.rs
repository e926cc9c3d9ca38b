//! Buffered sequential file writer.
//!
//! A [`FileWriter`] owns one open file and a growable in-memory buffer. Bytes
//! pushed through [`FileWriter::write_raw`] and [`FileWriter::write_string`]
//! accumulate until the buffer's capacity threshold is crossed, then spill to
//! the file automatically; [`FileWriter::flush`] forces them out and
//! [`FileWriter::close`] flushes and releases the file. Buffering never
//! changes observable output: the file holds the exact concatenation of all
//! written bytes, in call order.
//!
//! The underlying OS file is reached through the [`file_system::FileSystem`]
//! capability trait, with a raw-fd [`file_system::LocalFileSystem`] as the
//! default implementation.

pub mod buffer;
pub mod error;
pub mod file_system;
pub mod writer;

pub use buffer::DEFAULT_BUFFER_CAPACITY;
pub use error::{Result, WriterError};
pub use writer::{FileWriter, OpenMode};
