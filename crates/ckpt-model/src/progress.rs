//! Per-kind progress records.
//!
//! A [`ProgressRecord`] is a tagged union keyed by [`WorkKind`]: each variant
//! owns only the fields that are meaningful for its computation. The on-disk
//! P-1 layout stores one counter whose meaning depends on the stage; here the
//! counter is split into [`PMinus1Stage`] variants at decode time.

use serde::{Deserialize, Serialize};

use crate::kind::WorkKind;

/// Progress decoded from a checkpoint, one variant per computation kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "progress")]
pub enum ProgressRecord {
    /// Lucas-Lehmer test.
    LucasLehmer(IterationProgress),
    /// Probable-prime test.
    Prp(IterationProgress),
    /// P-1 factoring.
    PMinus1(PMinus1Progress),
    /// Elliptic curve factoring.
    Ecm(EcmProgress),
    /// Trial factoring checkpoint. The layout is reserved and not decoded.
    TrialFactor,
}

impl ProgressRecord {
    /// The kind this record belongs to.
    #[must_use]
    pub const fn kind(&self) -> WorkKind {
        match self {
            Self::LucasLehmer(_) => WorkKind::LucasLehmer,
            Self::Prp(_) => WorkKind::Prp,
            Self::PMinus1(_) => WorkKind::PMinus1,
            Self::Ecm(_) => WorkKind::Ecm,
            Self::TrialFactor => WorkKind::TrialFactor,
        }
    }
}

/// Iteration counter shared by LL and PRP tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IterationProgress {
    /// Iterations completed.
    pub iterations_done: u32,
    /// Iterations required, equal to the exponent `n`.
    pub iterations_total: u32,
    /// Hardware errors detected so far.
    pub error_count: u32,
}

impl IterationProgress {
    /// Completed fraction in `0.0..=1.0`; zero when the total is unknown.
    #[must_use]
    pub fn fraction(&self) -> f64 {
        if self.iterations_total == 0 {
            return 0.0;
        }
        (f64::from(self.iterations_done) / f64::from(self.iterations_total)).min(1.0)
    }
}

/// Stage of a P-1 run together with the counter that stage owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PMinus1Stage {
    /// Stage 1, exponentiating by small primes.
    Stage0 {
        /// Index of the next bit to process.
        next_bit: u64,
    },
    /// Stage 1, processing the larger primes up to B1.
    Stage1 {
        /// Last prime processed.
        last_prime: u64,
    },
    /// Stage 2 relation accumulation in progress.
    Stage2Running {
        /// The bound-1 value stage 1 completed with.
        bound1_completed: u64,
    },
    /// Both stages are finished.
    Done,
}

impl PMinus1Stage {
    /// On-disk stage code for Stage0.
    pub const RAW_STAGE0: u32 = 3;
    /// On-disk stage code for Stage1.
    pub const RAW_STAGE1: u32 = 0;
    /// On-disk stage code for Stage2Running.
    pub const RAW_STAGE2: u32 = 1;
    /// On-disk stage code for Done.
    pub const RAW_DONE: u32 = 2;

    /// Interpret the stored stage code and overloaded counter.
    ///
    /// Returns `None` for an unknown stage code.
    #[must_use]
    pub const fn from_raw(stage: u32, counter: u64) -> Option<Self> {
        match stage {
            Self::RAW_STAGE0 => Some(Self::Stage0 { next_bit: counter }),
            Self::RAW_STAGE1 => Some(Self::Stage1 {
                last_prime: counter,
            }),
            Self::RAW_STAGE2 => Some(Self::Stage2Running {
                bound1_completed: counter,
            }),
            Self::RAW_DONE => Some(Self::Done),
            _ => None,
        }
    }

    /// Stored stage code and overloaded counter.
    #[must_use]
    pub const fn to_raw(self) -> (u32, u64) {
        match self {
            Self::Stage0 { next_bit } => (Self::RAW_STAGE0, next_bit),
            Self::Stage1 { last_prime } => (Self::RAW_STAGE1, last_prime),
            Self::Stage2Running { bound1_completed } => (Self::RAW_STAGE2, bound1_completed),
            Self::Done => (Self::RAW_DONE, 0),
        }
    }
}

/// P-1 factoring progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PMinus1Progress {
    /// Current stage and its counter.
    pub stage: PMinus1Stage,
    /// Bound 1 completed so far.
    pub bound1_done: u64,
    /// Target bound 1.
    pub bound1: u64,
    /// Bound 2 completed so far.
    pub bound2_done: u64,
    /// Where stage 2 started.
    pub bound2_start: u64,
    /// Target bound 2.
    pub bound2: u64,
    /// Stage 2 step size (`D`).
    pub stage2_step: u32,
    /// Stage 2 relation count (`E`); only meaningful when at least 2.
    pub relations_done: u32,
}

/// ECM stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EcmStage {
    /// Stage 1.
    Stage1,
    /// Stage 2.
    Stage2,
}

impl EcmStage {
    /// Interpret the stored stage code (0 or 1).
    #[must_use]
    pub const fn from_raw(stage: u32) -> Option<Self> {
        match stage {
            0 => Some(Self::Stage1),
            1 => Some(Self::Stage2),
            _ => None,
        }
    }

    /// Stored stage code.
    #[must_use]
    pub const fn to_raw(self) -> u32 {
        match self {
            Self::Stage1 => 0,
            Self::Stage2 => 1,
        }
    }

    /// One-based stage number for display.
    #[must_use]
    pub const fn number(self) -> u32 {
        self.to_raw() + 1
    }
}

/// ECM factoring progress.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EcmProgress {
    /// Current stage.
    pub stage: EcmStage,
    /// Curve currently being run.
    pub curve_index: u32,
    /// Curves requested. Not stored in checkpoints; filled from queue data.
    pub curves_to_do: Option<u32>,
    /// Curve parameter.
    pub sigma: f64,
    /// Bound 1.
    pub bound1: u64,
    /// Bound 1 processed so far.
    pub bound1_processed: u64,
    /// Bound 2 processed so far.
    pub bound2_processed: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pminus1_stage_codes_roundtrip() {
        for (raw, counter) in [(3, 17), (0, 1_009), (1, 1_000_000)] {
            let stage = PMinus1Stage::from_raw(raw, counter).expect("known stage");
            assert_eq!(stage.to_raw(), (raw, counter));
        }
        assert_eq!(PMinus1Stage::from_raw(2, 99), Some(PMinus1Stage::Done));
        assert_eq!(PMinus1Stage::from_raw(4, 0), None);
    }

    #[test]
    fn counter_meaning_follows_stage() {
        assert_eq!(
            PMinus1Stage::from_raw(PMinus1Stage::RAW_STAGE0, 42),
            Some(PMinus1Stage::Stage0 { next_bit: 42 })
        );
        assert_eq!(
            PMinus1Stage::from_raw(PMinus1Stage::RAW_STAGE1, 42),
            Some(PMinus1Stage::Stage1 { last_prime: 42 })
        );
        assert_eq!(
            PMinus1Stage::from_raw(PMinus1Stage::RAW_STAGE2, 42),
            Some(PMinus1Stage::Stage2Running {
                bound1_completed: 42
            })
        );
    }

    #[test]
    fn iteration_fraction_handles_zero_total() {
        let progress = IterationProgress {
            iterations_done: 5,
            iterations_total: 0,
            error_count: 0,
        };
        assert_eq!(progress.fraction(), 0.0);
    }

    #[test]
    fn ecm_stage_numbers_are_one_based() {
        assert_eq!(EcmStage::Stage1.number(), 1);
        assert_eq!(EcmStage::Stage2.number(), 2);
        assert_eq!(EcmStage::from_raw(7), None);
    }
}
