//! Per-checkpoint status lines.
//!
//! Each decoded checkpoint becomes one summary phrase chosen by its kind and,
//! for P-1, by its stage. Percentages are always progress over total.

use std::fmt::Write as _;

use ckpt_model::{Checkpoint, PMinus1Progress, PMinus1Stage, ProgressRecord};
use ckpt_scan::ScanEntry;

use crate::buffer::{RenderStatus, StatusBuffer};

/// Text used when there is nothing to describe.
const UNKNOWN: &str = "UNKNOWN";

/// Summary phrase for a decoded checkpoint.
#[must_use]
pub fn progress_summary(checkpoint: &Checkpoint) -> String {
    let pct = checkpoint.header.pct_complete * 100.0;
    match &checkpoint.progress {
        ProgressRecord::Ecm(ecm) => format!(
            "ECM | Curve {} | Stage {} ({pct:.1}%)",
            ecm.curve_index,
            ecm.stage.number()
        ),
        ProgressRecord::PMinus1(pm1) => pminus1_summary(pm1, pct),
        ProgressRecord::LucasLehmer(iter) => format!(
            "LL  | Iteration {}/{} [{:.2}%]",
            iter.iterations_done,
            iter.iterations_total,
            iter.fraction() * 100.0
        ),
        ProgressRecord::Prp(iter) => format!(
            "PRP | Iteration {}/{} [{:.2}%]",
            iter.iterations_done,
            iter.iterations_total,
            iter.fraction() * 100.0
        ),
        ProgressRecord::TrialFactor => "TF  | unsupported checkpoint".to_string(),
    }
}

fn pminus1_summary(pm1: &PMinus1Progress, pct: f64) -> String {
    match pm1.stage {
        PMinus1Stage::Stage0 { next_bit } => {
            format!("P-1 | Stage 1 ({pct:.1}%) B1 @ {next_bit}")
        }
        PMinus1Stage::Stage1 { last_prime } => {
            format!("P-1 | Stage 1 ({pct:.1}%) B1 <{last_prime}")
        }
        PMinus1Stage::Stage2Running { .. } => {
            format!("P-1 | B1={} complete, Stage 2 ({pct:.1}%)", pm1.bound1)
        }
        PMinus1Stage::Done => {
            let mut text = format!("P-1 | B1={}", pm1.bound1);
            if pm1.bound2 > pm1.bound1 {
                let _ = write!(text, ",B2={}", pm1.bound2);
                if pm1.relations_done >= 2 {
                    let _ = write!(text, ",E={}", pm1.relations_done);
                }
            }
            text.push_str(" complete");
            text
        }
    }
}

/// Summary phrase, or `UNKNOWN` when there is no checkpoint.
#[must_use]
pub fn describe(checkpoint: Option<&Checkpoint>) -> String {
    checkpoint.map_or_else(|| UNKNOWN.to_string(), progress_summary)
}

/// Line reported for a file that could not be decoded.
#[must_use]
pub fn parse_error_line(name: &str) -> String {
    format!("Unable to parse ({name}).")
}

/// Full status line for one scanned file.
#[must_use]
pub fn status_line(entry: &ScanEntry) -> String {
    match entry.checkpoint() {
        Some(checkpoint) => {
            format!("Backup {:<16} | {}.", entry.name, progress_summary(checkpoint))
        }
        None => parse_error_line(&entry.name),
    }
}

/// Render one scanned file into `buffer`.
pub fn render_entry(entry: &ScanEntry, buffer: &mut StatusBuffer) -> RenderStatus {
    buffer.push_record(&status_line(entry))
}

#[cfg(test)]
mod tests {
    use ckpt_format::DecodeError;
    use ckpt_model::{
        CheckpointHeader, ComputationSpec, EcmProgress, EcmStage, IterationProgress,
    };

    use super::*;

    fn checkpoint(pct: f64, progress: ProgressRecord) -> Checkpoint {
        Checkpoint {
            header: CheckpointHeader {
                magic: 0,
                version: 1,
                spec: ComputationSpec::mersenne(1_277),
                stage_label: String::new(),
                pct_complete: pct,
                checksum: 0,
            },
            progress,
        }
    }

    fn pminus1(stage: PMinus1Stage, bound2: u64, relations: u32) -> Checkpoint {
        checkpoint(
            0.375,
            ProgressRecord::PMinus1(PMinus1Progress {
                stage,
                bound1_done: 0,
                bound1: 1_000_000,
                bound2_done: 0,
                bound2_start: 0,
                bound2,
                stage2_step: 2_310,
                relations_done: relations,
            }),
        )
    }

    #[test]
    fn ecm_uses_one_based_stage() {
        let ecm = checkpoint(
            0.5,
            ProgressRecord::Ecm(EcmProgress {
                stage: EcmStage::Stage2,
                curve_index: 7,
                curves_to_do: None,
                sigma: 123.0,
                bound1: 50_000,
                bound1_processed: 50_000,
                bound2_processed: 100,
            }),
        );
        assert_eq!(progress_summary(&ecm), "ECM | Curve 7 | Stage 2 (50.0%)");
    }

    #[test]
    fn pminus1_phrase_follows_stage() {
        let stage0 = pminus1(PMinus1Stage::Stage0 { next_bit: 4_096 }, 0, 0);
        assert_eq!(progress_summary(&stage0), "P-1 | Stage 1 (37.5%) B1 @ 4096");

        let stage1 = pminus1(PMinus1Stage::Stage1 { last_prime: 65_537 }, 0, 0);
        assert_eq!(progress_summary(&stage1), "P-1 | Stage 1 (37.5%) B1 <65537");

        let stage2 = pminus1(PMinus1Stage::Stage2Running { bound1_completed: 7 }, 0, 0);
        assert_eq!(
            progress_summary(&stage2),
            "P-1 | B1=1000000 complete, Stage 2 (37.5%)"
        );
    }

    #[test]
    fn pminus1_done_suffixes() {
        let plain = pminus1(PMinus1Stage::Done, 0, 0);
        assert_eq!(progress_summary(&plain), "P-1 | B1=1000000 complete");

        let with_b2 = pminus1(PMinus1Stage::Done, 30_000_000, 1);
        assert_eq!(progress_summary(&with_b2), "P-1 | B1=1000000,B2=30000000 complete");

        let with_e = pminus1(PMinus1Stage::Done, 30_000_000, 12);
        assert_eq!(
            progress_summary(&with_e),
            "P-1 | B1=1000000,B2=30000000,E=12 complete"
        );
    }

    #[test]
    fn iteration_percent_is_done_over_total() {
        let ll = checkpoint(
            0.9,
            ProgressRecord::LucasLehmer(IterationProgress {
                iterations_done: 250,
                iterations_total: 1_000,
                error_count: 0,
            }),
        );
        assert_eq!(progress_summary(&ll), "LL  | Iteration 250/1000 [25.00%]");

        let prp = checkpoint(
            0.0,
            ProgressRecord::Prp(IterationProgress {
                iterations_done: 1,
                iterations_total: 3,
                error_count: 0,
            }),
        );
        assert_eq!(progress_summary(&prp), "PRP | Iteration 1/3 [33.33%]");
    }

    #[test]
    fn missing_checkpoint_is_unknown() {
        assert_eq!(describe(None), "UNKNOWN");
    }

    #[test]
    fn failed_entry_renders_parse_error() {
        let entry = ScanEntry {
            name: "p1277".to_string(),
            backup: false,
            outcome: Err(DecodeError::Truncated { field: "k" }),
        };
        assert_eq!(status_line(&entry), "Unable to parse (p1277).");
    }

    #[test]
    fn decoded_entry_pads_name() {
        let entry = ScanEntry {
            name: "p1277.bu".to_string(),
            backup: true,
            outcome: Ok(pminus1(PMinus1Stage::Done, 0, 0)),
        };
        let mut buffer = StatusBuffer::new(1_000);
        assert_eq!(render_entry(&entry, &mut buffer), RenderStatus::Written);
        insta::assert_snapshot!(buffer.as_str().trim_end(), @"Backup p1277.bu         | P-1 | B1=1000000 complete.");
    }
}
