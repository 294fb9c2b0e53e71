//! Filesystem backed by `std::fs`

use super::Filesystem;
use std::fs::{self, File};
use std::io;
use std::path::Path;

/// The real filesystem
#[derive(Clone, Copy, Debug, Default)]
pub struct StdFilesystem;

impl Filesystem for StdFilesystem {
    type File = File;

    fn create(&self, path: &Path) -> io::Result<File> {
        File::create(path)
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }

    fn sync_file(&self, file: &mut File) -> io::Result<()> {
        file.sync_all()
    }

    fn sync_parent(&self, path: &Path) -> io::Result<()> {
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        File::open(parent)?.sync_all()
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        match fs::remove_file(path) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_remove_missing_is_ok() {
        let dir = tempdir().unwrap();
        StdFilesystem.remove(&dir.path().join("nothing")).unwrap();
    }

    #[test]
    fn test_rename_replaces_target() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        fs::write(&a, b"new").unwrap();
        fs::write(&b, b"old").unwrap();

        StdFilesystem.rename(&a, &b).unwrap();
        assert!(!a.exists());
        assert_eq!(fs::read(&b).unwrap(), b"new");
    }

    #[test]
    fn test_create_truncates_and_syncs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("file");
        fs::write(&path, b"previous longer content").unwrap();

        let mut file = StdFilesystem.create(&path).unwrap();
        file.write_all(b"short").unwrap();
        StdFilesystem.sync_file(&mut file).unwrap();
        drop(file);
        StdFilesystem.sync_parent(&path).unwrap();

        assert_eq!(StdFilesystem.read(&path).unwrap(), b"short");
    }
}
