//! Size-capped log file with numbered backups.
//!
//! `autoscaler.log` rolls over to `autoscaler.log.1`, pushing older
//! segments up to `.N`; the segment that would become `.N+1` is deleted.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// 10 MiB per segment
pub const DEFAULT_MAX_BYTES: u64 = 10 * 1024 * 1024;

/// Prior segments kept after rollover
pub const DEFAULT_BACKUPS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationPolicy {
    /// Rollover threshold; 0 disables rotation
    pub max_bytes: u64,
    /// Number of `.1`..`.N` segments retained; 0 truncates in place
    pub backups: usize,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_BYTES,
            backups: DEFAULT_BACKUPS,
        }
    }
}

/// Append-only writer that rotates before a write would exceed `max_bytes`.
///
/// Rotation happens between writes, so a record handed over in one
/// `write` call is never split across segments.
#[derive(Debug)]
pub struct RotatingFileWriter {
    path: PathBuf,
    policy: RotationPolicy,
    file: File,
    written: u64,
}

impl RotatingFileWriter {
    /// Open (or create) `path` for appending, creating parent directories.
    pub fn open(path: impl Into<PathBuf>, policy: RotationPolicy) -> io::Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = open_append(&path)?;
        let written = file.metadata()?.len();

        Ok(Self {
            path,
            policy,
            file,
            written,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of backup segment `index` (1 is the most recent)
    pub fn backup_path(&self, index: usize) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(format!(".{}", index));
        PathBuf::from(name)
    }

    /// Flush and push the current segment's data to disk.
    pub fn sync(&mut self) -> io::Result<()> {
        self.file.flush()?;
        self.file.sync_data()
    }

    fn should_rotate(&self, incoming: usize) -> bool {
        self.policy.max_bytes > 0 && self.written > 0 && self.written + incoming as u64 > self.policy.max_bytes
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;

        if self.policy.backups == 0 {
            self.file = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&self.path)?;
            self.written = 0;
            return Ok(());
        }

        let oldest = self.backup_path(self.policy.backups);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }
        for index in (1..self.policy.backups).rev() {
            let src = self.backup_path(index);
            if src.exists() {
                fs::rename(&src, self.backup_path(index + 1))?;
            }
        }
        fs::rename(&self.path, self.backup_path(1))?;

        self.file = open_append(&self.path)?;
        self.written = 0;
        Ok(())
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

impl Write for RotatingFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.should_rotate(buf.len()) {
            self.rotate()?;
        }
        let n = self.file.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}
