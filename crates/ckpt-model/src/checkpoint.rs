//! Decoded checkpoint header and record.

use serde::{Deserialize, Serialize};

use crate::kind::WorkKind;
use crate::progress::ProgressRecord;
use crate::spec::ComputationSpec;

/// Common header present at the start of every checkpoint file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckpointHeader {
    /// Format magic number.
    pub magic: u32,
    /// Format version for that magic number.
    pub version: u32,
    /// The number under test.
    pub spec: ComputationSpec,
    /// Free-form stage label written by the client (at most 10 characters).
    pub stage_label: String,
    /// Completed fraction as recorded by the client, clamped to `0.0..=1.0`.
    pub pct_complete: f64,
    /// Checksum of the data that follows the header.
    pub checksum: u32,
}

/// A fully decoded checkpoint file.
///
/// Only the decoder constructs these, and only when every field was read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Common header.
    pub header: CheckpointHeader,
    /// Kind-specific progress.
    pub progress: ProgressRecord,
}

impl Checkpoint {
    /// The computation kind.
    #[must_use]
    pub const fn kind(&self) -> WorkKind {
        self.progress.kind()
    }

    /// The number under test.
    #[must_use]
    pub fn spec(&self) -> &ComputationSpec {
        &self.header.spec
    }
}
