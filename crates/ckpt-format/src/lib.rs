//! Checkpoint (save file) format reader and writer.
//!
//! Checkpoints written by the computation client share a common 52-byte
//! header followed by a field sequence that depends on the computation kind.
//! The kind is identified by a magic number and every magic number accepts
//! exactly one format version.
//!
//! # Features
//!
//! - Data-driven dispatch through a static magic number table ([`FORMATS`])
//! - All-or-nothing decoding: a record is only returned when every field was read
//! - Pluggable header validation ([`HeaderValidator`])
//! - A matching encoder ([`CheckpointWriter`]) for fixtures and regression tests
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use ckpt_format::decode_path;
//!
//! let checkpoint = decode_path(Path::new("p86243")).unwrap();
//! println!("{} at {:.1}%", checkpoint.kind(), checkpoint.header.pct_complete * 100.0);
//! ```

mod error;
mod field;
pub mod format;
pub mod header;
mod reader;
mod record;
mod writer;

// Re-export error types
pub use error::{DecodeError, Result};

// Re-export the format table
pub use format::{
    ECM_MAGIC, FACTOR_MAGIC, FORMATS, Field, FieldType, FormatSpec, LL_MAGIC, PM1_MAGIC,
    PRP_MAGIC, SPOOL_MAGIC, format_for_kind, lookup_format,
};

// Re-export header handling
pub use header::{HEADER_LEN, HeaderValidator, StandardHeaderValidator, WorkUnitValidator};

// Re-export reader functionality
pub use reader::{CheckpointReader, decode_path};

// Re-export writer functionality
pub use writer::{CheckpointWriter, encode};
