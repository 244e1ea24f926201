//! Checkpoint file reader.
//!
//! Decoding follows a fixed order: seek to the start, read the magic number,
//! read and validate the common header, check the version required for the
//! magic number, then read the kind-specific fields.

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use ckpt_model::Checkpoint;
use tracing::trace;

use crate::error::{DecodeError, Result};
use crate::field::read_u32;
use crate::format::lookup_format;
use crate::header::{HeaderValidator, StandardHeaderValidator, read_header_body};
use crate::record::read_progress;

/// Checkpoint reader.
///
/// Decodes one checkpoint from any seekable byte source.
pub struct CheckpointReader<R: Read + Seek, V = StandardHeaderValidator> {
    reader: BufReader<R>,
    validator: V,
}

impl<R: Read + Seek> CheckpointReader<R> {
    /// Create a reader with the standard header checks.
    pub fn new(reader: R) -> Self {
        Self::with_validator(reader, StandardHeaderValidator)
    }
}

impl<R: Read + Seek, V: HeaderValidator> CheckpointReader<R, V> {
    /// Create a reader with a custom header validator.
    pub fn with_validator(reader: R, validator: V) -> Self {
        Self {
            reader: BufReader::new(reader),
            validator,
        }
    }

    /// Decode the checkpoint.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::UnknownFormat`] for an unrecognized magic number
    /// - [`DecodeError::UnsupportedVersion`] when the version does not match
    ///   the one required for the magic number
    /// - [`DecodeError::Truncated`] when the data ends before a required field
    /// - [`DecodeError::Invalid`] when the header validator rejects the header
    pub fn decode(&mut self) -> Result<Checkpoint> {
        self.reader.seek(SeekFrom::Start(0))?;

        let magic = read_u32(&mut self.reader, "magic")?;
        let format = lookup_format(magic).ok_or(DecodeError::UnknownFormat { magic })?;

        let mut header = read_header_body(&mut self.reader, magic)?;
        self.validator.validate(&mut header)?;

        if header.version != format.version {
            return Err(DecodeError::UnsupportedVersion {
                kind: format.kind,
                expected: format.version,
                found: header.version,
            });
        }

        let progress = read_progress(&mut self.reader, format, &header.spec)?;
        trace!(kind = %format.kind, spec = %header.spec, "decoded checkpoint");
        Ok(Checkpoint { header, progress })
    }

    /// Decode into reused storage.
    ///
    /// The slot is cleared before reading, so after a failed decode it holds
    /// nothing rather than the previous record.
    pub fn decode_into(&mut self, slot: &mut Option<Checkpoint>) -> Result<()> {
        *slot = None;
        *slot = Some(self.decode()?);
        Ok(())
    }
}

impl CheckpointReader<File> {
    /// Open a checkpoint file for reading.
    ///
    /// # Arguments
    /// * `path` - Path to the checkpoint file
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(file))
    }
}

/// Decode a checkpoint file from a path.
///
/// This is a convenience function that opens and decodes the file.
pub fn decode_path(path: &Path) -> Result<Checkpoint> {
    CheckpointReader::open(path)?.decode()
}
