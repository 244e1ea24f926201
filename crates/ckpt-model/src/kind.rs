//! Computation kinds.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The algorithm a checkpoint or queued work unit belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkKind {
    /// Lucas-Lehmer primality test.
    LucasLehmer,
    /// Probable-prime test.
    Prp,
    /// P-1 factoring.
    PMinus1,
    /// Elliptic curve factoring.
    Ecm,
    /// Trial factoring.
    TrialFactor,
    /// Lucas-Lehmer double-check.
    DoubleCheck,
    /// Placeholder entry with no work attached.
    None,
}

impl WorkKind {
    /// Whether the kind is a primality test that counts toward the
    /// probability-of-success estimate.
    #[must_use]
    pub const fn is_primality_test(self) -> bool {
        matches!(self, Self::LucasLehmer | Self::DoubleCheck | Self::Prp)
    }

    /// Short label used in status lines.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::LucasLehmer => "LL",
            Self::Prp => "PRP",
            Self::PMinus1 => "P-1",
            Self::Ecm => "ECM",
            Self::TrialFactor => "TF",
            Self::DoubleCheck => "DC",
            Self::None => "NONE",
        }
    }
}

impl fmt::Display for WorkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
