pub mod local;

use std::io::Result;
use std::path::Path;

use bitflags::bitflags;

pub use local::{LocalFileHandle, LocalFileSystem};

bitflags! {
    /// Open-time behavior requested from a [`FileSystem`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct OpenFlags: u16 {
        const WRITE    = 1 << 0;
        const CREATE   = 1 << 1;
        const TRUNCATE = 1 << 2;
        const APPEND   = 1 << 3;
    }
}

/// The file capability the writer depends on. Everything the buffering engine
/// needs from the host is an open call producing a handle that can accept
/// bytes, commit them, and be released.
pub trait FileSystem {
    type Handle: FileHandle;

    fn open_file(&self, path: &Path, flags: OpenFlags) -> Result<Self::Handle>;
}

/// An open file resource. `write` may accept fewer bytes than offered, as the
/// underlying syscall may; callers loop. `close` releases the resource and
/// must be safe to call at most once; the handle's `Drop` covers the case
/// where it was never called.
pub trait FileHandle {
    fn path(&self) -> &Path;

    fn write(&mut self, buffer: &[u8]) -> Result<usize>;

    fn sync(&mut self) -> Result<()>;

    fn close(&mut self) -> Result<()>;
}
