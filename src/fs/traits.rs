//! Filesystem trait definition

use std::io::{self, Write};
use std::path::Path;

/// The filesystem primitives the durable store is built on
///
/// Implementations can use:
/// - The real filesystem ([`StdFilesystem`](super::StdFilesystem))
/// - A fault-injecting wrapper for crash and failure simulation
///
/// `rename` must atomically replace `to` if it exists. Both paths are
/// expected to live on the same filesystem.
pub trait Filesystem {
    /// Open write handle. Dropping it closes the file.
    type File: Write;

    /// Create or truncate `path` for writing
    fn create(&self, path: &Path) -> io::Result<Self::File>;

    /// Read the entire content of `path`
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Flush a written file to stable storage
    fn sync_file(&self, file: &mut Self::File) -> io::Result<()>;

    /// Flush the directory entry of `path` to stable storage
    fn sync_parent(&self, path: &Path) -> io::Result<()>;

    /// Remove `path`. A missing file is not an error.
    fn remove(&self, path: &Path) -> io::Result<()>;

    /// Atomically rename `from` to `to`, replacing `to`
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;
}
