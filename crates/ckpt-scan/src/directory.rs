//! Working directory access.
//!
//! The scanner only needs two things from a directory: a listing of names
//! with their entry type, and a way to open one entry for reading.
//! [`FsDirectory`] provides both over the local filesystem.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Read, Seek};
use std::path::PathBuf;

/// Type of a directory entry, without following symlinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Regular file.
    File,
    /// Directory.
    Directory,
    /// Symbolic link.
    Symlink,
    /// Device, socket, pipe or anything else.
    Other,
}

/// A name returned by a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    /// Raw entry name.
    pub name: OsString,
    /// Entry type.
    pub kind: EntryKind,
}

impl DirectoryEntry {
    /// Create an entry.
    pub fn new(name: impl Into<OsString>, kind: EntryKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Iterator over directory entries.
pub type Entries<'a> = Box<dyn Iterator<Item = io::Result<DirectoryEntry>> + 'a>;

/// A directory that can be listed and read from.
pub trait WorkingDirectory {
    /// Readable handle for one entry.
    type File: Read + Seek;

    /// Human-readable location used in messages.
    fn label(&self) -> String;

    /// List the directory in its native enumeration order.
    ///
    /// # Errors
    ///
    /// Returns an error when the directory cannot be opened.
    fn entries(&self) -> io::Result<Entries<'_>>;

    /// Open the entry called `name` for reading.
    ///
    /// # Errors
    ///
    /// Returns an error when the entry cannot be opened.
    fn open(&self, name: &str) -> io::Result<Self::File>;
}

/// A directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct FsDirectory {
    root: PathBuf,
}

impl FsDirectory {
    /// Use `root` as the working directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl WorkingDirectory for FsDirectory {
    type File = File;

    fn label(&self) -> String {
        self.root.display().to_string()
    }

    fn entries(&self) -> io::Result<Entries<'_>> {
        let listing = fs::read_dir(&self.root)?;
        Ok(Box::new(listing.map(|entry| {
            let entry = entry?;
            let file_type = entry.file_type()?;
            let kind = if file_type.is_file() {
                EntryKind::File
            } else if file_type.is_dir() {
                EntryKind::Directory
            } else if file_type.is_symlink() {
                EntryKind::Symlink
            } else {
                EntryKind::Other
            };
            Ok(DirectoryEntry::new(entry.file_name(), kind))
        })))
    }

    fn open(&self, name: &str) -> io::Result<File> {
        File::open(self.root.join(name))
    }
}
