//! Pending work descriptors.

use serde::{Deserialize, Serialize};

use crate::kind::WorkKind;
use crate::spec::ComputationSpec;

/// One pending computation in a worker's queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueuedWork {
    /// What kind of work is queued.
    pub kind: WorkKind,
    /// The number to work on.
    pub spec: ComputationSpec,
    /// ECM curves requested.
    #[serde(default)]
    pub curves_to_do: u32,
    /// Bound 1 for P-1 and ECM work.
    #[serde(default)]
    pub bound1: Option<f64>,
    /// Target depth in bits for trial factoring.
    #[serde(default)]
    pub factor_to: Option<f64>,
    /// Estimated seconds to complete this item.
    #[serde(default)]
    pub estimated_seconds: f64,
}

impl QueuedWork {
    /// Create a queued item with no kind-specific parameters.
    #[must_use]
    pub fn new(kind: WorkKind, spec: ComputationSpec) -> Self {
        Self {
            kind,
            spec,
            curves_to_do: 0,
            bound1: None,
            factor_to: None,
            estimated_seconds: 0.0,
        }
    }

    /// Set the time estimate.
    #[must_use]
    pub fn with_estimate(mut self, seconds: f64) -> Self {
        self.estimated_seconds = seconds;
        self
    }

    /// Set bound 1.
    #[must_use]
    pub fn with_bound1(mut self, bound1: f64) -> Self {
        self.bound1 = Some(bound1);
        self
    }

    /// Set the number of ECM curves.
    #[must_use]
    pub fn with_curves(mut self, curves: u32) -> Self {
        self.curves_to_do = curves;
        self
    }

    /// Set the trial factoring target.
    #[must_use]
    pub fn with_factor_to(mut self, bits: f64) -> Self {
        self.factor_to = Some(bits);
        self
    }
}
