use std::ffi::CString;
use std::io::{Error, ErrorKind, Result};
use std::path::{Path, PathBuf};

#[cfg(unix)]
use std::os::unix::ffi::OsStrExt;
#[cfg(unix)]
use std::os::unix::io::RawFd;

use tracing::warn;

use super::{FileHandle, FileSystem, OpenFlags};

/// Local file system backed by raw fds.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

pub struct LocalFileHandle {
    path: PathBuf,
    #[cfg(unix)]
    fd: RawFd,
}

#[cfg(unix)]
impl FileSystem for LocalFileSystem {
    type Handle = LocalFileHandle;

    fn open_file(&self, path: &Path, flags: OpenFlags) -> Result<Self::Handle> {
        debug_assert!(
            flags.contains(OpenFlags::WRITE),
            "writer only opens files for writing"
        );
        debug_assert!(
            !flags.contains(OpenFlags::TRUNCATE | OpenFlags::APPEND),
            "cannot combine TRUNCATE and APPEND flags"
        );

        let mut open_flags = libc::O_WRONLY | libc::O_CLOEXEC;
        if flags.contains(OpenFlags::CREATE) {
            open_flags |= libc::O_CREAT;
        }
        if flags.contains(OpenFlags::TRUNCATE) {
            open_flags |= libc::O_TRUNC;
        }
        if flags.contains(OpenFlags::APPEND) {
            open_flags |= libc::O_APPEND;
        }

        let c_path = CString::new(path.as_os_str().as_bytes())
            .map_err(|e| Error::new(ErrorKind::InvalidInput, e))?;
        let fd = unsafe { libc::open(c_path.as_ptr(), open_flags, 0o666) };
        if fd == -1 {
            return Err(Error::last_os_error());
        }

        Ok(LocalFileHandle {
            path: path.to_path_buf(),
            fd,
        })
    }
}

#[cfg(unix)]
impl FileHandle for LocalFileHandle {
    fn path(&self) -> &Path {
        &self.path
    }

    fn write(&mut self, buffer: &[u8]) -> Result<usize> {
        let result = unsafe {
            libc::write(
                self.fd,
                buffer.as_ptr() as *const libc::c_void,
                buffer.len(),
            )
        };

        if result == -1 {
            Err(Error::last_os_error())
        } else {
            Ok(result as usize)
        }
    }

    fn sync(&mut self) -> Result<()> {
        if unsafe { libc::fsync(self.fd) } == -1 {
            Err(Error::last_os_error())
        } else {
            Ok(())
        }
    }

    fn close(&mut self) -> Result<()> {
        if self.fd < 0 {
            return Ok(());
        }
        let fd = self.fd;
        // Mark released before the syscall; the fd must not be closed twice
        // even if close reports an error.
        self.fd = -1;
        if unsafe { libc::close(fd) } < 0 {
            return Err(Error::last_os_error());
        }
        Ok(())
    }
}

#[cfg(unix)]
impl Drop for LocalFileHandle {
    fn drop(&mut self) {
        if self.fd < 0 {
            return;
        }
        if let Err(e) = self.close() {
            warn!(path = %self.path.display(), error = %e, "failed to close file handle");
        }
    }
}
