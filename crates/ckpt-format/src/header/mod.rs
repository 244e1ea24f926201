//! Common checkpoint header.
//!
//! # Structure
//!
//! | Offset | Length | Field        | Description                         |
//! |--------|--------|--------------|-------------------------------------|
//! | 0      | 4      | magic        | Format magic number                 |
//! | 4      | 4      | version      | Format version                      |
//! | 8      | 8      | k            | Coefficient in `k*b^n+c`            |
//! | 16     | 4      | b            | Base                                |
//! | 20     | 4      | n            | Exponent                            |
//! | 24     | 4      | c            | Additive term (signed)              |
//! | 28     | 11     | stage        | NUL-padded stage label              |
//! | 39     | 1      | pad          | Unused                              |
//! | 40     | 8      | pct_complete | Completed fraction                  |
//! | 48     | 4      | checksum     | Checksum of the data that follows   |

mod validate;

use std::io::Read;

use ckpt_model::{CheckpointHeader, ComputationSpec};

use crate::error::Result;
use crate::field::{read_array, read_f64, read_i32, read_u32};

pub use validate::{HeaderValidator, StandardHeaderValidator, WorkUnitValidator};

/// Header length in bytes.
pub const HEADER_LEN: usize = 52;

/// Length of the stage label field.
pub const STAGE_LABEL_LEN: usize = 11;

/// Read the header fields that follow an already-consumed magic number.
pub(crate) fn read_header_body<R: Read>(reader: &mut R, magic: u32) -> Result<CheckpointHeader> {
    let version = read_u32(reader, "version")?;
    let k = read_f64(reader, "k")?;
    let b = read_u32(reader, "b")?;
    let n = read_u32(reader, "n")?;
    let c = read_i32(reader, "c")?;
    let stage = read_array::<STAGE_LABEL_LEN, _>(reader, "stage")?;
    let _pad = read_array::<1, _>(reader, "pad")?;
    let pct_complete = read_f64(reader, "pct_complete")?;
    let checksum = read_u32(reader, "checksum")?;

    Ok(CheckpointHeader {
        magic,
        version,
        spec: ComputationSpec::new(k, b, n, c),
        stage_label: parse_stage_label(&stage),
        pct_complete,
        checksum,
    })
}

/// Decode the stage label; the last byte is always treated as a terminator.
fn parse_stage_label(bytes: &[u8; STAGE_LABEL_LEN]) -> String {
    let usable = &bytes[..STAGE_LABEL_LEN - 1];
    let end = usable.iter().position(|&b| b == 0).unwrap_or(usable.len());
    String::from_utf8_lossy(&usable[..end]).trim().to_string()
}

/// Encode a stage label into the fixed-width field.
pub(crate) fn stage_label_bytes(label: &str) -> [u8; STAGE_LABEL_LEN] {
    let mut bytes = [0u8; STAGE_LABEL_LEN];
    let source = label.as_bytes();
    let len = source.len().min(STAGE_LABEL_LEN - 1);
    bytes[..len].copy_from_slice(&source[..len]);
    bytes
}
