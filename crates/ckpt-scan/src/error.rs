//! Scan errors.

use thiserror::Error;

/// Errors that abort a whole scan.
///
/// Failures on individual files are not errors here; they are reported per
/// entry in the scan result.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The working directory could not be listed.
    #[error("unable to read working directory ({directory}): {source}")]
    DirectoryUnavailable {
        directory: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for scans.
pub type Result<T> = std::result::Result<T, ScanError>;
