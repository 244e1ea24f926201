//! Kind-specific record decoding.

use std::io::Read;

use ckpt_model::{
    ComputationSpec, EcmProgress, EcmStage, IterationProgress, PMinus1Progress, PMinus1Stage,
    ProgressRecord, WorkKind,
};

use crate::error::{DecodeError, Result};
use crate::field::FieldCursor;
use crate::format::FormatSpec;

/// Read the field sequence declared by `format` into a progress record.
///
/// Nothing is returned unless every declared field was read.
pub(crate) fn read_progress<R: Read>(
    reader: &mut R,
    format: &FormatSpec,
    spec: &ComputationSpec,
) -> Result<ProgressRecord> {
    let mut cursor = FieldCursor::new(reader, format.fields);
    let record = match format.kind {
        WorkKind::Ecm => ProgressRecord::Ecm(read_ecm(&mut cursor)?),
        WorkKind::PMinus1 => ProgressRecord::PMinus1(read_pminus1(&mut cursor)?),
        WorkKind::LucasLehmer => ProgressRecord::LucasLehmer(read_iterations(&mut cursor, spec)?),
        WorkKind::Prp => ProgressRecord::Prp(read_iterations(&mut cursor, spec)?),
        WorkKind::TrialFactor => ProgressRecord::TrialFactor,
        WorkKind::DoubleCheck | WorkKind::None => {
            return Err(DecodeError::invalid(format!(
                "{} has no checkpoint record",
                format.kind
            )));
        }
    };
    cursor.finish()?;
    Ok(record)
}

fn read_ecm<R: Read>(cursor: &mut FieldCursor<'_, R>) -> Result<EcmProgress> {
    let raw_stage = cursor.u32()?;
    let curve_index = cursor.u32()?;
    let sigma = cursor.f64()?;
    let bound1 = cursor.u64()?;
    let bound1_processed = cursor.u64()?;
    let bound2_processed = cursor.u64()?;
    let stage = EcmStage::from_raw(raw_stage)
        .ok_or_else(|| DecodeError::invalid(format!("unknown ECM stage {raw_stage}")))?;
    Ok(EcmProgress {
        stage,
        curve_index,
        curves_to_do: None,
        sigma,
        bound1,
        bound1_processed,
        bound2_processed,
    })
}

fn read_pminus1<R: Read>(cursor: &mut FieldCursor<'_, R>) -> Result<PMinus1Progress> {
    let raw_stage = cursor.u32()?;
    let bound1_done = cursor.u64()?;
    let bound1 = cursor.u64()?;
    let bound2_done = cursor.u64()?;
    let bound2_start = cursor.u64()?;
    let bound2 = cursor.u64()?;
    let processed = cursor.u64()?;
    let stage2_step = cursor.u32()?;
    let relations_done = cursor.u32()?;
    let stage = PMinus1Stage::from_raw(raw_stage, processed)
        .ok_or_else(|| DecodeError::invalid(format!("unknown P-1 stage {raw_stage}")))?;
    Ok(PMinus1Progress {
        stage,
        bound1_done,
        bound1,
        bound2_done,
        bound2_start,
        bound2,
        stage2_step,
        relations_done,
    })
}

fn read_iterations<R: Read>(
    cursor: &mut FieldCursor<'_, R>,
    spec: &ComputationSpec,
) -> Result<IterationProgress> {
    let error_count = cursor.u32()?;
    let iterations_done = cursor.u32()?;
    Ok(IterationProgress {
        iterations_done,
        iterations_total: spec.n,
        error_count,
    })
}
