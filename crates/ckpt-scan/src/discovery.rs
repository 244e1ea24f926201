//! Bounded checkpoint discovery.
//!
//! A scan lists the working directory once, keeps regular files whose names
//! pass [`classify`](crate::classify), stops at [`MAX_CANDIDATES`], sorts the
//! candidates by name and decodes each one in that order. Decode failures stay
//! attached to their file and never stop the scan.

use ckpt_format::{CheckpointReader, DecodeError};
use ckpt_model::Checkpoint;
use tracing::{debug, info, info_span, warn};

use crate::directory::{Entries, EntryKind, WorkingDirectory};
use crate::error::{Result, ScanError};
use crate::filename::CandidateFile;

/// Most candidates collected by one scan.
pub const MAX_CANDIDATES: usize = 100;

/// Longest accepted file name in bytes.
pub const MAX_NAME_LEN: usize = 100;

/// One scanned checkpoint file.
#[derive(Debug)]
pub struct ScanEntry {
    /// File name.
    pub name: String,
    /// Whether the name carries a `.bu` backup suffix.
    pub backup: bool,
    /// Decoded checkpoint, or why it could not be decoded.
    pub outcome: std::result::Result<Checkpoint, DecodeError>,
}

impl ScanEntry {
    /// The decoded checkpoint, if decoding succeeded.
    #[must_use]
    pub fn checkpoint(&self) -> Option<&Checkpoint> {
        self.outcome.as_ref().ok()
    }
}

/// Result of scanning one directory.
#[derive(Debug)]
pub struct ScanReport {
    /// Directory label.
    pub directory: String,
    /// Entries in name order.
    pub entries: Vec<ScanEntry>,
    /// Whether accepted files beyond [`MAX_CANDIDATES`] were left out.
    pub cap_reached: bool,
}

impl ScanReport {
    /// Number of entries that decoded.
    #[must_use]
    pub fn decoded_count(&self) -> usize {
        self.entries.iter().filter(|e| e.outcome.is_ok()).count()
    }

    /// Entries that failed to decode.
    pub fn failures(&self) -> impl Iterator<Item = &ScanEntry> {
        self.entries.iter().filter(|e| e.outcome.is_err())
    }

    /// True when no candidate was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Scan `dir` for checkpoint files and decode them.
///
/// # Errors
///
/// Returns [`ScanError::DirectoryUnavailable`] when the directory cannot be
/// listed. Nothing else aborts a scan.
pub fn scan<D: WorkingDirectory>(dir: &D) -> Result<ScanReport> {
    let directory = dir.label();
    let span = info_span!("scan", directory = %directory);
    let _guard = span.enter();

    let listing = dir
        .entries()
        .map_err(|source| ScanError::DirectoryUnavailable {
            directory: directory.clone(),
            source,
        })?;
    let (mut candidates, cap_reached) = collect_candidates(listing);
    if cap_reached {
        warn!(limit = MAX_CANDIDATES, "candidate limit reached, ignoring further files");
    }
    candidates.sort();

    let entries: Vec<ScanEntry> = candidates
        .into_iter()
        .map(|candidate| decode_candidate(dir, candidate))
        .collect();

    let report = ScanReport {
        directory,
        entries,
        cap_reached,
    };
    info!(
        candidates = report.entries.len(),
        decoded = report.decoded_count(),
        "scan complete"
    );
    Ok(report)
}

/// Collect accepted regular files in enumeration order, stopping at the cap.
///
/// The flag is set only when an accepted file past the cap was seen.
fn collect_candidates(listing: Entries<'_>) -> (Vec<CandidateFile>, bool) {
    let mut candidates = Vec::new();
    for entry in listing {
        let entry = match entry {
            Ok(entry) => entry,
            Err(error) => {
                warn!(%error, "skipping unreadable directory entry");
                continue;
            }
        };
        if entry.kind != EntryKind::File {
            continue;
        }
        // Length is checked on the raw name before anything is copied.
        if entry.name.len() > MAX_NAME_LEN {
            debug!(len = entry.name.len(), "skipping over-long name");
            continue;
        }
        let Some(name) = entry.name.to_str() else {
            continue;
        };
        let Some(candidate) = CandidateFile::from_name(name) else {
            continue;
        };
        if candidates.len() == MAX_CANDIDATES {
            return (candidates, true);
        }
        candidates.push(candidate);
    }
    (candidates, false)
}

fn decode_candidate<D: WorkingDirectory>(dir: &D, candidate: CandidateFile) -> ScanEntry {
    let outcome = dir
        .open(&candidate.name)
        .map_err(DecodeError::from)
        .and_then(|file| CheckpointReader::new(file).decode());
    match &outcome {
        Ok(checkpoint) => debug!(file = %candidate.name, kind = %checkpoint.kind(), "decoded"),
        Err(error) => warn!(file = %candidate.name, %error, "unable to parse checkpoint"),
    }
    ScanEntry {
        name: candidate.name,
        backup: candidate.backup,
        outcome,
    }
}
