//! Integration tests for settings files.

use std::fs;

use ckpt_cli::config::{ConfigError, load_settings};

#[test]
fn no_path_means_defaults() {
    let settings = load_settings(None).expect("defaults");
    assert_eq!(settings.report.restore_buffer_len, 1000);
    assert_eq!(settings.timing.ms_per_iteration, 10.0);
}

#[test]
fn missing_file_means_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let settings = load_settings(Some(&dir.path().join("ckpt-status.toml"))).expect("defaults");
    assert_eq!(settings.report.range_buffer_len, 2000);
}

#[test]
fn file_overrides_selected_values() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("ckpt-status.toml");
    fs::write(
        &path,
        "[report]\nstatus_lines = 12\n\n[report.estimator]\ndouble_check_error_rate = 0.05\n\n[timing]\nms_per_iteration = 2.5\n",
    )
    .expect("write");
    let settings = load_settings(Some(&path)).expect("load");
    assert_eq!(settings.report.status_lines, Some(12));
    assert_eq!(settings.report.estimator.double_check_error_rate, 0.05);
    assert_eq!(settings.report.estimator.prp_double_check_error_rate, 0.0001);
    assert_eq!(settings.timing.ms_per_iteration, 2.5);
}

#[test]
fn malformed_file_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("ckpt-status.toml");
    fs::write(&path, "[report\nreserve = ").expect("write");
    let err = load_settings(Some(&path)).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));

    fs::write(&path, "[report]\nreserve = \"lots\"\n").expect("write");
    assert!(matches!(load_settings(Some(&path)), Err(ConfigError::Parse { .. })));
}
