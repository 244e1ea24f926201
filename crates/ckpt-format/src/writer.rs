//! Checkpoint file writer.
//!
//! Produces the same layout the reader consumes. The header is written
//! exactly as given, including its magic number and version, so mismatched
//! files can be produced on purpose.

use std::io::{self, Write};

use ckpt_model::{Checkpoint, CheckpointHeader, EcmProgress, PMinus1Progress, ProgressRecord};

use crate::header::{HEADER_LEN, stage_label_bytes};

/// Checkpoint writer.
pub struct CheckpointWriter<W: Write> {
    writer: W,
}

impl<W: Write> CheckpointWriter<W> {
    /// Create a new writer.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Write a full checkpoint: header followed by the kind-specific record.
    pub fn write_checkpoint(&mut self, checkpoint: &Checkpoint) -> io::Result<()> {
        self.write_header(&checkpoint.header)?;
        match &checkpoint.progress {
            ProgressRecord::Ecm(ecm) => self.write_ecm(ecm)?,
            ProgressRecord::PMinus1(pm1) => self.write_pminus1(pm1)?,
            ProgressRecord::LucasLehmer(iter) | ProgressRecord::Prp(iter) => {
                self.u32(iter.error_count)?;
                self.u32(iter.iterations_done)?;
            }
            ProgressRecord::TrialFactor => {}
        }
        self.writer.flush()
    }

    /// Consume the writer and return the underlying sink.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_header(&mut self, header: &CheckpointHeader) -> io::Result<()> {
        self.u32(header.magic)?;
        self.u32(header.version)?;
        self.f64(header.spec.k)?;
        self.u32(header.spec.b)?;
        self.u32(header.spec.n)?;
        self.writer.write_all(&header.spec.c.to_le_bytes())?;
        self.writer.write_all(&stage_label_bytes(&header.stage_label))?;
        self.writer.write_all(&[0u8])?;
        self.f64(header.pct_complete)?;
        self.u32(header.checksum)
    }

    fn write_ecm(&mut self, ecm: &EcmProgress) -> io::Result<()> {
        self.u32(ecm.stage.to_raw())?;
        self.u32(ecm.curve_index)?;
        self.f64(ecm.sigma)?;
        self.u64(ecm.bound1)?;
        self.u64(ecm.bound1_processed)?;
        self.u64(ecm.bound2_processed)
    }

    fn write_pminus1(&mut self, pm1: &PMinus1Progress) -> io::Result<()> {
        let (stage, processed) = pm1.stage.to_raw();
        self.u32(stage)?;
        self.u64(pm1.bound1_done)?;
        self.u64(pm1.bound1)?;
        self.u64(pm1.bound2_done)?;
        self.u64(pm1.bound2_start)?;
        self.u64(pm1.bound2)?;
        self.u64(processed)?;
        self.u32(pm1.stage2_step)?;
        self.u32(pm1.relations_done)
    }

    fn u32(&mut self, value: u32) -> io::Result<()> {
        self.writer.write_all(&value.to_le_bytes())
    }

    fn u64(&mut self, value: u64) -> io::Result<()> {
        self.writer.write_all(&value.to_le_bytes())
    }

    fn f64(&mut self, value: f64) -> io::Result<()> {
        self.writer.write_all(&value.to_le_bytes())
    }
}

/// Encode a checkpoint into a byte vector.
#[must_use]
pub fn encode(checkpoint: &Checkpoint) -> Vec<u8> {
    let mut buffer = Vec::with_capacity(HEADER_LEN + 64);
    let mut writer = CheckpointWriter::new(&mut buffer);
    // Writing into a Vec cannot fail.
    let _ = writer.write_checkpoint(checkpoint);
    buffer
}

#[cfg(test)]
mod tests {
    use ckpt_model::{ComputationSpec, IterationProgress};

    use super::*;
    use crate::format::{FormatSpec, PRP_MAGIC, lookup_format};

    #[test]
    fn header_is_fixed_length() {
        let checkpoint = Checkpoint {
            header: CheckpointHeader {
                magic: PRP_MAGIC,
                version: 4,
                spec: ComputationSpec::new(3.0, 2, 1_000, 1),
                stage_label: "PRP".to_string(),
                pct_complete: 0.0,
                checksum: 0,
            },
            progress: ProgressRecord::Prp(IterationProgress {
                iterations_done: 10,
                iterations_total: 1_000,
                error_count: 0,
            }),
        };
        let bytes = encode(&checkpoint);
        let record_len = lookup_format(PRP_MAGIC).map(FormatSpec::record_len).unwrap_or(0);
        assert_eq!(bytes.len(), HEADER_LEN + record_len);
        assert_eq!(&bytes[..4], &PRP_MAGIC.to_le_bytes());
    }
}
