//! Backup file status report.

use ckpt_scan::{ScanError, ScanReport, WorkingDirectory, scan};
use tracing::debug;

use crate::buffer::{RenderStatus, StatusBuffer};
use crate::options::ReportOptions;
use crate::render::render_entry;

/// Write the status of a scanned directory into `buffer`.
///
/// Stops at the first record that does not fit.
pub fn write_restore_status(
    result: &ckpt_scan::Result<ScanReport>,
    buffer: &mut StatusBuffer,
) -> RenderStatus {
    let report = match result {
        Ok(report) => report,
        Err(ScanError::DirectoryUnavailable { directory, .. }) => {
            return buffer.push_record(&format!("Unable to read working directory ({directory})."));
        }
    };
    if report.is_empty() {
        return buffer.push_record(&format!(
            "No Backup files (*.bu) were found in {}.",
            report.directory
        ));
    }
    if buffer
        .push_record(&format!("Status of files in '{}'.", report.directory))
        .is_truncated()
    {
        return RenderStatus::Truncated;
    }
    for entry in &report.entries {
        if render_entry(entry, buffer).is_truncated() {
            return RenderStatus::Truncated;
        }
    }
    RenderStatus::Written
}

/// Scan `dir` and build its backup status report.
#[must_use]
pub fn restore_status_message<D: WorkingDirectory>(dir: &D, options: &ReportOptions) -> String {
    let mut buffer = StatusBuffer::with_reserve(options.restore_buffer_len, options.reserve);
    let result = scan(dir);
    if write_restore_status(&result, &mut buffer).is_truncated() {
        debug!(len = buffer.len(), "restore status truncated");
    }
    buffer.into_string()
}
