//! Integration tests for checkpoint discovery.

use std::cell::Cell;
use std::fs;
use std::io::{self, Cursor};

use ckpt_format::{DecodeError, LL_MAGIC, encode};
use ckpt_model::{Checkpoint, CheckpointHeader, ComputationSpec, IterationProgress, ProgressRecord};
use ckpt_scan::{
    DirectoryEntry, Entries, EntryKind, FsDirectory, MAX_CANDIDATES, ScanError, WorkingDirectory,
    scan,
};

fn ll_bytes(n: u32) -> Vec<u8> {
    encode(&Checkpoint {
        header: CheckpointHeader {
            magic: LL_MAGIC,
            version: 1,
            spec: ComputationSpec::mersenne(n),
            stage_label: "LL".to_string(),
            pct_complete: 0.5,
            checksum: 0,
        },
        progress: ProgressRecord::LucasLehmer(IterationProgress {
            iterations_done: n / 2,
            iterations_total: n,
            error_count: 0,
        }),
    })
}

/// In-memory directory that lists entries in the given order and counts opens.
struct MemoryDirectory {
    files: Vec<(String, EntryKind, Vec<u8>)>,
    opens: Cell<usize>,
    fail_listing: bool,
}

impl MemoryDirectory {
    fn new(files: Vec<(String, EntryKind, Vec<u8>)>) -> Self {
        Self {
            files,
            opens: Cell::new(0),
            fail_listing: false,
        }
    }
}

impl WorkingDirectory for MemoryDirectory {
    type File = Cursor<Vec<u8>>;

    fn label(&self) -> String {
        "memory".to_string()
    }

    fn entries(&self) -> io::Result<Entries<'_>> {
        if self.fail_listing {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
        }
        Ok(Box::new(
            self.files
                .iter()
                .map(|(name, kind, _)| Ok::<_, io::Error>(DirectoryEntry::new(name.clone(), *kind))),
        ))
    }

    fn open(&self, name: &str) -> io::Result<Cursor<Vec<u8>>> {
        self.opens.set(self.opens.get() + 1);
        self.files
            .iter()
            .find(|(file, _, _)| file == name)
            .map(|(_, _, bytes)| Cursor::new(bytes.clone()))
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))
    }
}

#[test]
fn test_caps_candidates_and_sorts() {
    // 150 accepted names, enumerated in descending order.
    let files: Vec<_> = (0..150u32)
        .rev()
        .map(|i| (format!("p{:05}", 10_000 + i), EntryKind::File, ll_bytes(10_000 + i)))
        .collect();
    let dir = MemoryDirectory::new(files);

    let report = scan(&dir).expect("scan");

    assert_eq!(report.entries.len(), MAX_CANDIDATES);
    assert_eq!(dir.opens.get(), MAX_CANDIDATES);
    assert!(report.cap_reached);
    let names: Vec<&str> = report.entries.iter().map(|e| e.name.as_str()).collect();
    let mut sorted = names.clone();
    sorted.sort_unstable();
    assert_eq!(names, sorted);
    // Discovery order decides which 100 survive: the first 100 enumerated.
    assert_eq!(names.first(), Some(&"p10050"));
    assert_eq!(names.last(), Some(&"p10149"));
}

#[test]
fn test_exactly_cap_candidates_is_not_capped() {
    let mut files: Vec<_> = (0..MAX_CANDIDATES as u32)
        .map(|i| (format!("p{}", 10_000 + i), EntryKind::File, ll_bytes(10_000 + i)))
        .collect();
    files.push(("notes.txt".to_string(), EntryKind::File, Vec::new()));
    let report = scan(&MemoryDirectory::new(files.clone())).expect("scan");
    assert_eq!(report.entries.len(), MAX_CANDIDATES);
    assert!(!report.cap_reached);

    files.push(("p99999".to_string(), EntryKind::File, ll_bytes(99_999)));
    let report = scan(&MemoryDirectory::new(files)).expect("scan");
    assert_eq!(report.entries.len(), MAX_CANDIDATES);
    assert!(report.cap_reached);
    assert!(report.entries.iter().all(|e| e.name != "p99999"));
}

#[test]
fn test_skips_non_regular_and_rejected_names() {
    let long_name = format!("p{}", "1".repeat(120));
    let dir = MemoryDirectory::new(vec![
        ("p86243".to_string(), EntryKind::File, ll_bytes(86_243)),
        ("p11213".to_string(), EntryKind::Directory, Vec::new()),
        ("p19937".to_string(), EntryKind::Symlink, Vec::new()),
        ("p21701".to_string(), EntryKind::Other, Vec::new()),
        ("worktodo.txt".to_string(), EntryKind::File, Vec::new()),
        (long_name, EntryKind::File, ll_bytes(127)),
        ("m44497.bu2".to_string(), EntryKind::File, ll_bytes(44_497)),
    ]);

    let report = scan(&dir).expect("scan");

    let names: Vec<&str> = report.entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["m44497.bu2", "p86243"]);
    assert!(report.entries[0].backup);
    assert!(!report.entries[1].backup);
    assert!(!report.cap_reached);
    assert_eq!(report.decoded_count(), 2);
}

#[test]
fn test_decode_failure_does_not_stop_scan() {
    let mut truncated = ll_bytes(3_217);
    truncated.truncate(30);
    let dir = MemoryDirectory::new(vec![
        ("p3217".to_string(), EntryKind::File, truncated),
        ("p4253".to_string(), EntryKind::File, vec![0xAB; 64]),
        ("p4423".to_string(), EntryKind::File, ll_bytes(4_423)),
    ]);

    let report = scan(&dir).expect("scan");

    assert_eq!(report.entries.len(), 3);
    assert!(matches!(
        report.entries[0].outcome,
        Err(DecodeError::Truncated { .. })
    ));
    assert!(matches!(
        report.entries[1].outcome,
        Err(DecodeError::UnknownFormat { .. })
    ));
    assert_eq!(
        report.entries[2].checkpoint().map(|c| c.spec().n),
        Some(4_423)
    );
    assert_eq!(report.failures().count(), 2);
}

#[test]
fn test_listing_failure_is_terminal() {
    let mut dir = MemoryDirectory::new(vec![(
        "p86243".to_string(),
        EntryKind::File,
        ll_bytes(86_243),
    )]);
    dir.fail_listing = true;

    let err = scan(&dir).unwrap_err();
    assert!(matches!(err, ScanError::DirectoryUnavailable { .. }));
    assert_eq!(dir.opens.get(), 0);
}

#[test]
fn test_scans_filesystem_directory() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("p86243"), ll_bytes(86_243)).expect("write");
    fs::write(dir.path().join("p86243.bu"), ll_bytes(86_243)).expect("write");
    fs::write(dir.path().join("results.txt"), b"nothing").expect("write");
    fs::write(dir.path().join("e1277"), b"short").expect("write");
    fs::create_dir(dir.path().join("p99991")).expect("mkdir");

    let report = scan(&FsDirectory::new(dir.path())).expect("scan");

    let names: Vec<&str> = report.entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["e1277", "p86243", "p86243.bu"]);
    assert_eq!(report.decoded_count(), 2);
    assert!(report.entries[0].outcome.is_err());
}

#[test]
fn test_missing_directory_is_unavailable() {
    let dir = tempfile::tempdir().expect("tempdir");
    let missing = FsDirectory::new(dir.path().join("missing"));
    let err = scan(&missing).unwrap_err();
    let ScanError::DirectoryUnavailable { directory, .. } = err;
    assert!(directory.ends_with("missing"));
}
