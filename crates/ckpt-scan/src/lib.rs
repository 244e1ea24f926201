//! Checkpoint file discovery.
//!
//! Lists a working directory, keeps the entries whose names look like
//! checkpoint files, bounds and sorts the candidate set and decodes each
//! candidate in order.

pub mod directory;
pub mod discovery;
pub mod error;
pub mod filename;

pub use directory::{DirectoryEntry, Entries, EntryKind, FsDirectory, WorkingDirectory};
pub use discovery::{MAX_CANDIDATES, MAX_NAME_LEN, ScanEntry, ScanReport, scan};
pub use error::{Result, ScanError};
pub use filename::{CandidateFile, classify};
