use std::path::Path;

use tracing::{trace, warn};

use crate::buffer::{DEFAULT_BUFFER_CAPACITY, WriteBuffer};
use crate::error::{Result, WriterError};
use crate::file_system::{FileHandle, FileSystem, LocalFileSystem, OpenFlags};

/// Open-time behavior. Irrelevant once the file is open: both modes produce a
/// sequential writer positioned where new bytes belong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// Create the file if absent and write after any existing content.
    Append,
    /// Create the file if absent, truncating any existing content.
    Write,
}

/// Buffered sequential file writer.
///
/// Owns one open file resource and its pending-byte buffer. Writes accumulate
/// in memory until the buffer's capacity threshold is crossed, a flush is
/// requested, or the writer is closed. The file's content after each
/// flush/close equals the exact concatenation, in call order, of all bytes
/// passed to write operations since open.
///
/// [`close`](FileWriter::close) flushes and releases the file exactly once;
/// every later operation, including a second `close`, fails with
/// [`WriterError::InvalidHandle`] without touching any resource. A writer
/// dropped while still open is closed as a last resort, logging on failure —
/// call `close` to observe errors.
pub struct FileWriter<F: FileSystem = LocalFileSystem> {
    handle: Option<F::Handle>,
    buffer: WriteBuffer,
    mode: OpenMode,
}

impl FileWriter<LocalFileSystem> {
    /// Opens `path` for sequential writing on the local file system, creating
    /// missing parent directories first.
    pub fn open<P: AsRef<Path>>(path: P, mode: OpenMode) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(WriterError::FileOpen)?;
            }
        }
        Self::open_with(&LocalFileSystem, path, mode)
    }
}

impl<F: FileSystem> FileWriter<F> {
    /// Opens `path` through an explicit file-system capability.
    pub fn open_with(fs: &F, path: &Path, mode: OpenMode) -> Result<Self> {
        if path.as_os_str().is_empty() {
            return Err(WriterError::InvalidPath);
        }

        let flags = match mode {
            OpenMode::Append => OpenFlags::WRITE | OpenFlags::CREATE | OpenFlags::APPEND,
            OpenMode::Write => OpenFlags::WRITE | OpenFlags::CREATE | OpenFlags::TRUNCATE,
        };
        let handle = fs.open_file(path, flags).map_err(WriterError::FileOpen)?;

        Ok(FileWriter {
            handle: Some(handle),
            buffer: WriteBuffer::new(DEFAULT_BUFFER_CAPACITY),
            mode,
        })
    }

    pub fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    pub fn mode(&self) -> OpenMode {
        self.mode
    }

    pub fn buffer_capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// Replaces the internal buffer with one of `size` bytes. Pending bytes
    /// are flushed to the file first, never dropped.
    pub fn set_buffer_size(&mut self, size: usize) -> Result<()> {
        let Some(handle) = self.handle.as_mut() else {
            return Err(WriterError::InvalidHandle);
        };
        self.buffer.resize(handle, size)
    }

    /// Appends raw bytes. An empty slice is a legal no-op success. The bytes
    /// may not reach the file until a flush or close.
    pub fn write_raw(&mut self, data: &[u8]) -> Result<()> {
        let Some(handle) = self.handle.as_mut() else {
            return Err(WriterError::InvalidHandle);
        };
        self.buffer.append(handle, data)
    }

    /// Appends the string's content as raw bytes. No terminator of any kind
    /// is persisted.
    pub fn write_string(&mut self, text: &str) -> Result<()> {
        self.write_raw(text.as_bytes())
    }

    /// Appends each part in order. Empty parts are skipped; an empty batch
    /// succeeds without touching the file.
    pub fn write_batch(&mut self, parts: &[&[u8]]) -> Result<()> {
        let Some(handle) = self.handle.as_mut() else {
            return Err(WriterError::InvalidHandle);
        };
        for part in parts {
            self.buffer.append(handle, part)?;
        }
        Ok(())
    }

    /// Writes all pending bytes to the file and asks the OS to commit them.
    pub fn flush(&mut self) -> Result<()> {
        let Some(handle) = self.handle.as_mut() else {
            return Err(WriterError::InvalidHandle);
        };
        self.buffer.flush(handle)?;
        handle.sync().map_err(WriterError::Io)?;
        trace!(path = %handle.path().display(), "flushed writer");
        Ok(())
    }

    /// Flushes remaining bytes, releases the file resource, and invalidates
    /// the writer. The release happens even when the flush or the OS close
    /// fails; in that case the error is reported as
    /// [`WriterError::FileClose`]. Closing an already-closed writer fails
    /// with [`WriterError::InvalidHandle`] and releases nothing.
    pub fn close(&mut self) -> Result<()> {
        let Some(mut handle) = self.handle.take() else {
            return Err(WriterError::InvalidHandle);
        };

        let flush_err = self.buffer.flush(&mut handle).err();
        let close_err = handle.close().err();

        if let Some(e) = close_err {
            return Err(WriterError::FileClose(e));
        }
        if let Some(e) = flush_err {
            return Err(match e {
                WriterError::FileWrite(io) | WriterError::Io(io) => WriterError::FileClose(io),
                other => other,
            });
        }
        Ok(())
    }
}

impl<F: FileSystem> Drop for FileWriter<F> {
    fn drop(&mut self) {
        if self.handle.is_none() {
            return;
        }
        if let Err(e) = self.close() {
            warn!(error = %e, "failed to close writer during drop");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Error, ErrorKind, Result as IoResult};
    use std::path::{Path, PathBuf};

    use super::*;

    struct BrokenDiskFs;

    struct BrokenDiskHandle {
        path: PathBuf,
    }

    impl FileSystem for BrokenDiskFs {
        type Handle = BrokenDiskHandle;

        fn open_file(&self, path: &Path, _flags: OpenFlags) -> IoResult<Self::Handle> {
            Ok(BrokenDiskHandle {
                path: path.to_path_buf(),
            })
        }
    }

    impl FileHandle for BrokenDiskHandle {
        fn path(&self) -> &Path {
            &self.path
        }

        fn write(&mut self, _buffer: &[u8]) -> IoResult<usize> {
            Err(Error::new(ErrorKind::WriteZero, "disk full"))
        }

        fn sync(&mut self) -> IoResult<()> {
            Ok(())
        }

        fn close(&mut self) -> IoResult<()> {
            Ok(())
        }
    }

    #[test]
    fn close_invalidates_writer_even_when_flush_fails() {
        let mut writer =
            FileWriter::open_with(&BrokenDiskFs, Path::new("broken.bin"), OpenMode::Write)
                .unwrap();
        writer.write_raw(b"doomed").unwrap();

        assert!(matches!(writer.close(), Err(WriterError::FileClose(_))));
        assert!(!writer.is_open());
        assert!(matches!(writer.close(), Err(WriterError::InvalidHandle)));
    }

    #[test]
    fn failed_flush_surfaces_file_write_error() {
        let mut writer =
            FileWriter::open_with(&BrokenDiskFs, Path::new("broken.bin"), OpenMode::Write)
                .unwrap();
        writer.write_raw(b"doomed").unwrap();

        assert!(matches!(writer.flush(), Err(WriterError::FileWrite(_))));
        // Still open: the caller may retry or close.
        assert!(writer.is_open());
        let _ = writer.close();
    }

    #[test]
    fn empty_path_is_rejected_before_opening() {
        assert!(matches!(
            FileWriter::open_with(&BrokenDiskFs, Path::new(""), OpenMode::Append),
            Err(WriterError::InvalidPath)
        ));
    }
}
