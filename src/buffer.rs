use crate::error::{Result, WriterError};
use crate::file_system::FileHandle;

pub const DEFAULT_BUFFER_CAPACITY: usize = 8192;

/// Accumulates pending bytes and decides flush timing. Buffering is purely a
/// syscall-count optimization: for any sequence of appends the bytes reach the
/// handle byte-for-byte in append order, no matter where the flush boundaries
/// fall.
///
/// On a failed write the successfully written prefix is drained and the rest
/// of the pending bytes are retained, so a later `flush` retries exactly the
/// unwritten suffix.
pub struct WriteBuffer {
    data: Vec<u8>,
    capacity: usize,
}

impl WriteBuffer {
    pub fn new(capacity: usize) -> Self {
        WriteBuffer {
            data: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn pending_len(&self) -> usize {
        self.data.len()
    }

    /// Appends `bytes` to the pending region, flushing first when the result
    /// would exceed capacity. Oversized payloads bypass the buffer entirely
    /// and go straight to the handle.
    pub fn append<H: FileHandle>(&mut self, handle: &mut H, bytes: &[u8]) -> Result<()> {
        if bytes.is_empty() {
            return Ok(());
        }

        if self.data.len() + bytes.len() > self.capacity {
            self.flush(handle)?;
        }

        if bytes.len() > self.capacity {
            write_all(handle, bytes)?;
        } else {
            self.data.extend_from_slice(bytes);
        }
        Ok(())
    }

    /// Writes all pending bytes to the handle in order, then clears the
    /// pending region. Succeeds as a no-op when nothing is pending.
    pub fn flush<H: FileHandle>(&mut self, handle: &mut H) -> Result<()> {
        if self.data.is_empty() {
            return Ok(());
        }

        let mut written = 0;
        while written < self.data.len() {
            match handle.write(&self.data[written..]) {
                Ok(n) => written += n,
                Err(e) => {
                    // Keep the unwritten suffix pending for retry.
                    self.data.drain(..written);
                    return Err(WriterError::FileWrite(e));
                }
            }
        }
        self.data.clear();
        Ok(())
    }

    /// Replaces the buffer with a fresh allocation of `new_capacity` bytes.
    /// Pending bytes are flushed first, never dropped. The old allocation is
    /// released rather than resized in place.
    pub fn resize<H: FileHandle>(&mut self, handle: &mut H, new_capacity: usize) -> Result<()> {
        if new_capacity == 0 {
            return Err(WriterError::InvalidData("buffer capacity must be > 0"));
        }
        self.flush(handle)?;
        self.data = Vec::with_capacity(new_capacity);
        self.capacity = new_capacity;
        Ok(())
    }
}

fn write_all<H: FileHandle>(handle: &mut H, bytes: &[u8]) -> Result<()> {
    let mut written = 0;
    while written < bytes.len() {
        written += handle
            .write(&bytes[written..])
            .map_err(WriterError::FileWrite)?;
    }
    Ok(())
}
