//! Directory listing snapshots.
//! A listing is read once, classified without following symlinks, and sorted by
//! name so callers can mutate the tree while iterating their own copy.

use anyhow::Result;
use std::ffi::OsString;
use std::fs;
use std::path::Path;
use tracing::debug;

use super::helpers::io_error_with_help;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
    Symlink,
    /// Sockets, fifos, devices.
    Other,
}

/// One child of a directory as seen at listing time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: OsString,
    pub kind: EntryKind,
}

impl Entry {
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }

    pub fn is_hidden(&self) -> bool {
        self.name.to_string_lossy().starts_with('.')
    }
}

/// Read `dir` once into a name-sorted vector of entries.
pub fn list_entries(dir: &Path) -> Result<Vec<Entry>> {
    let rd = fs::read_dir(dir).map_err(io_error_with_help("list directory", dir))?;
    let mut entries = Vec::new();
    for item in rd {
        let item = item.map_err(io_error_with_help("read directory entry", dir))?;
        // DirEntry::file_type does not traverse symlinks.
        let ftype = item
            .file_type()
            .map_err(io_error_with_help("stat entry", &item.path()))?;
        let kind = if ftype.is_symlink() {
            EntryKind::Symlink
        } else if ftype.is_dir() {
            EntryKind::Dir
        } else if ftype.is_file() {
            EntryKind::File
        } else {
            EntryKind::Other
        };
        entries.push(Entry {
            name: item.file_name(),
            kind,
        });
    }
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    debug!(dir = %dir.display(), count = entries.len(), "listed directory");
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    #[test]
    fn lists_sorted_and_classified() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("b.png").touch().unwrap();
        temp.child("a").create_dir_all().unwrap();
        temp.child(".hidden").touch().unwrap();

        let entries = list_entries(temp.path()).unwrap();
        let names: Vec<_> = entries
            .iter()
            .map(|e| e.name.to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec![".hidden", "a", "b.png"]);
        assert!(entries[0].is_hidden());
        assert!(entries[1].is_dir());
        assert_eq!(entries[2].kind, EntryKind::File);
    }

    #[test]
    fn missing_directory_is_move_failed() {
        let temp = assert_fs::TempDir::new().unwrap();
        let err = list_entries(&temp.path().join("nope")).unwrap_err();
        assert!(err.downcast_ref::<crate::errors::WebnormError>().is_some());
    }
}
