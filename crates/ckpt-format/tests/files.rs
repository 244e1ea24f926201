use std::fs;

use ckpt_format::{CheckpointReader, DecodeError, LL_MAGIC, WorkUnitValidator, decode_path, encode};
use ckpt_model::{Checkpoint, CheckpointHeader, ComputationSpec, IterationProgress, ProgressRecord};

fn ll_checkpoint(n: u32) -> Checkpoint {
    Checkpoint {
        header: CheckpointHeader {
            magic: LL_MAGIC,
            version: 1,
            spec: ComputationSpec::mersenne(n),
            stage_label: "LL".to_string(),
            pct_complete: 0.3,
            checksum: 0,
        },
        progress: ProgressRecord::LucasLehmer(IterationProgress {
            iterations_done: n / 3,
            iterations_total: n,
            error_count: 0,
        }),
    }
}

#[test]
fn decodes_file_from_disk() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("p86243");
    fs::write(&path, encode(&ll_checkpoint(86_243))).expect("write checkpoint");

    let checkpoint = decode_path(&path).expect("decode");
    assert_eq!(checkpoint, ll_checkpoint(86_243));
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = decode_path(&dir.path().join("p1")).unwrap_err();
    assert!(matches!(err, DecodeError::Io(_)));
}

#[test]
fn work_unit_validator_fills_derived_fields() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("p86243.bu");
    fs::write(&path, encode(&ll_checkpoint(86_243))).expect("write checkpoint");

    let expected = ComputationSpec::mersenne(86_243)
        .with_sieve_depth(68.0)
        .with_pminus1ed(true);
    let file = fs::File::open(&path).expect("open");
    let checkpoint = CheckpointReader::with_validator(file, WorkUnitValidator::new(&expected))
        .decode()
        .expect("decode");
    assert_eq!(checkpoint.spec().sieve_depth, 68.0);
    assert!(checkpoint.spec().pminus1ed);

    let other = ComputationSpec::mersenne(86_249);
    let file = fs::File::open(&path).expect("open");
    let err = CheckpointReader::with_validator(file, WorkUnitValidator::new(&other))
        .decode()
        .unwrap_err();
    assert!(matches!(err, DecodeError::Invalid { .. }));
}
