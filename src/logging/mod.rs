//! Log sink plumbing
//!
//! The logger itself is env_logger, built once in `main`. This module
//! supplies the size-capped file it writes to, the line layout, and the
//! guard that syncs the file on the way out.

mod format;
mod rotate;

use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard};

pub use format::{TIMESTAMP_FORMAT, write_record};
pub use rotate::{DEFAULT_BACKUPS, DEFAULT_MAX_BYTES, RotatingFileWriter, RotationPolicy};

/// Cloneable handle to one `RotatingFileWriter`.
///
/// One clone goes to env_logger as its pipe target, another to the
/// `LogGuard`, so both reach the same file.
#[derive(Debug, Clone)]
pub struct SharedWriter {
    inner: Arc<Mutex<RotatingFileWriter>>,
}

impl SharedWriter {
    pub fn new(writer: RotatingFileWriter) -> Self {
        Self {
            inner: Arc::new(Mutex::new(writer)),
        }
    }

    fn lock(&self) -> io::Result<MutexGuard<'_, RotatingFileWriter>> {
        self.inner
            .lock()
            .map_err(|_| io::Error::other("log writer lock poisoned"))
    }

    /// Flush and sync the underlying file.
    pub fn sync(&self) -> io::Result<()> {
        self.lock()?.sync()
    }
}

impl Write for SharedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.lock()?.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.lock()?.flush()
    }
}

/// Owns a handle to the log file; syncs it to disk when dropped.
#[derive(Debug)]
pub struct LogGuard {
    writer: SharedWriter,
}

impl LogGuard {
    /// Call once, right after the logger has been installed with a clone of `writer`.
    pub fn new(writer: SharedWriter) -> Self {
        Self { writer }
    }

    pub fn flush(&self) -> io::Result<()> {
        log::logger().flush();
        self.writer.sync()
    }
}

impl Drop for LogGuard {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            eprintln!("Failed to flush log file: {}", e);
        }
    }
}
