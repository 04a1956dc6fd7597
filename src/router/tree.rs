//! Read-only view of the source tree.
//!
//! The classifier and planner only read the filesystem through [`SourceTree`],
//! which keeps "does not exist" distinct from "exists but is a broken symlink".

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Kind of a directory entry, without following symlinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    Symlink,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: OsString,
    pub kind: EntryKind,
}

impl DirEntry {
    pub fn is_directory(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

pub trait SourceTree {
    /// List the entries of a directory.
    fn list_directory(&self, path: &Path) -> io::Result<Vec<DirEntry>>;

    /// Kind of the entry at `path`, or `None` when nothing is there.
    fn entry_kind(&self, path: &Path) -> io::Result<Option<EntryKind>>;

    /// Resolve a symlink to its final target.
    fn resolve_symlink(&self, path: &Path) -> io::Result<PathBuf>;

    fn exists(&self, path: &Path) -> io::Result<bool> {
        Ok(self.entry_kind(path)?.is_some())
    }
}

/// The real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsTree;

impl SourceTree for OsTree {
    /// Entries are sorted by name so repeated runs see the same order.
    fn list_directory(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path)? {
            let entry = entry?;
            let file_type = entry.file_type()?;
            let kind = if file_type.is_symlink() {
                EntryKind::Symlink
            } else if file_type.is_dir() {
                EntryKind::Directory
            } else {
                EntryKind::File
            };
            entries.push(DirEntry {
                name: entry.file_name(),
                kind,
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn entry_kind(&self, path: &Path) -> io::Result<Option<EntryKind>> {
        match fs::symlink_metadata(path) {
            Ok(meta) if meta.file_type().is_symlink() => Ok(Some(EntryKind::Symlink)),
            Ok(meta) if meta.is_dir() => Ok(Some(EntryKind::Directory)),
            Ok(_) => Ok(Some(EntryKind::File)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn resolve_symlink(&self, path: &Path) -> io::Result<PathBuf> {
        fs::canonicalize(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_list_directory_sorted() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.txt"), "").unwrap();
        fs::write(dir.path().join("a.txt"), "").unwrap();
        fs::create_dir(dir.path().join("c")).unwrap();

        let entries = OsTree.list_directory(dir.path()).unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.name.clone()).collect();
        assert_eq!(names, ["a.txt", "b.txt", "c"]);
        assert!(entries[2].is_directory());
        assert!(!entries[0].is_directory());
    }

    #[test]
    fn test_list_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        assert!(OsTree.list_directory(&dir.path().join("nope")).is_err());
    }

    #[test]
    fn test_entry_kind() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("f"), "").unwrap();
        assert_eq!(
            OsTree.entry_kind(&dir.path().join("f")).unwrap(),
            Some(EntryKind::File)
        );
        assert_eq!(
            OsTree.entry_kind(dir.path()).unwrap(),
            Some(EntryKind::Directory)
        );
        assert_eq!(OsTree.entry_kind(&dir.path().join("x")).unwrap(), None);
        assert!(!OsTree.exists(&dir.path().join("x")).unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn test_broken_symlink_exists_but_does_not_resolve() {
        let dir = TempDir::new().unwrap();
        let link = dir.path().join("link");
        std::os::unix::fs::symlink(dir.path().join("gone"), &link).unwrap();

        assert_eq!(OsTree.entry_kind(&link).unwrap(), Some(EntryKind::Symlink));
        assert!(OsTree.exists(&link).unwrap());
        assert!(OsTree.resolve_symlink(&link).is_err());

        let entries = OsTree.list_directory(dir.path()).unwrap();
        assert_eq!(entries[0].kind, EntryKind::Symlink);
    }
}
