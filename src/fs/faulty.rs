//! Fault-injecting filesystem for testing
//!
//! Wraps [`StdFilesystem`] and fails selected operations, so the write
//! protocol can be exercised against failures at each step.

use super::{Filesystem, StdFilesystem};
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

/// A filesystem that fails on demand
///
/// All operations go to the real filesystem unless a fault is armed for
/// them. Faults stay armed for every call until the value is dropped.
#[derive(Clone, Debug, Default)]
pub struct FaultyFilesystem {
    inner: StdFilesystem,
    fail_create: bool,
    write_budget: Option<usize>,
    fail_remove: bool,
    fail_rename: bool,
}

impl FaultyFilesystem {
    /// A filesystem with no faults armed
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every `create`
    pub fn fail_create(mut self) -> Self {
        self.fail_create = true;
        self
    }

    /// Let each created file accept `bytes` bytes, then fail further writes
    pub fn fail_writes_after(mut self, bytes: usize) -> Self {
        self.write_budget = Some(bytes);
        self
    }

    /// Fail every `remove` with a permission error
    pub fn fail_remove(mut self) -> Self {
        self.fail_remove = true;
        self
    }

    /// Fail every `rename`
    pub fn fail_rename(mut self) -> Self {
        self.fail_rename = true;
        self
    }

    fn injected(kind: io::ErrorKind, op: &str) -> io::Error {
        io::Error::new(kind, format!("injected {} failure", op))
    }
}

/// File handle that stops accepting bytes once its budget is spent
#[derive(Debug)]
pub struct FaultyFile {
    inner: File,
    remaining: Option<usize>,
}

impl Write for FaultyFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let allowed = match self.remaining {
            None => buf.len(),
            Some(0) if !buf.is_empty() => {
                return Err(FaultyFilesystem::injected(io::ErrorKind::Other, "write"))
            }
            Some(n) => n.min(buf.len()),
        };
        let written = self.inner.write(&buf[..allowed])?;
        if let Some(n) = self.remaining.as_mut() {
            *n -= written;
        }
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl Filesystem for FaultyFilesystem {
    type File = FaultyFile;

    fn create(&self, path: &Path) -> io::Result<FaultyFile> {
        if self.fail_create {
            return Err(Self::injected(io::ErrorKind::PermissionDenied, "create"));
        }
        Ok(FaultyFile {
            inner: self.inner.create(path)?,
            remaining: self.write_budget,
        })
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.inner.read(path)
    }

    fn sync_file(&self, file: &mut FaultyFile) -> io::Result<()> {
        self.inner.sync_file(&mut file.inner)
    }

    fn sync_parent(&self, path: &Path) -> io::Result<()> {
        self.inner.sync_parent(path)
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        if self.fail_remove {
            return Err(Self::injected(io::ErrorKind::PermissionDenied, "remove"));
        }
        self.inner.remove(path)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        if self.fail_rename {
            return Err(Self::injected(io::ErrorKind::Other, "rename"));
        }
        self.inner.rename(from, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_no_faults_passes_through() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("file");
        let fs = FaultyFilesystem::new();

        let mut file = fs.create(&path).unwrap();
        file.write_all(b"hello").unwrap();
        drop(file);
        assert_eq!(fs.read(&path).unwrap(), b"hello");
    }

    #[test]
    fn test_write_budget() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("file");
        let fs = FaultyFilesystem::new().fail_writes_after(3);

        let mut file = fs.create(&path).unwrap();
        assert!(file.write_all(b"hello").is_err());
        drop(file);
        assert_eq!(fs.read(&path).unwrap(), b"hel");
    }

    #[test]
    fn test_armed_faults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("file");
        std::fs::write(&path, b"x").unwrap();

        let fs = FaultyFilesystem::new().fail_create().fail_remove().fail_rename();
        assert_eq!(
            fs.create(&path).unwrap_err().kind(),
            io::ErrorKind::PermissionDenied
        );
        assert_eq!(
            fs.remove(&path).unwrap_err().kind(),
            io::ErrorKind::PermissionDenied
        );
        assert!(fs.rename(&path, &dir.path().join("other")).is_err());
        assert!(path.exists());
    }
}
