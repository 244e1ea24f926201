//! Status report generation.
//!
//! This crate turns decoded checkpoints and queued work into bounded text:
//!
//! - **Backup status**: one line per checkpoint file found in a directory
//! - **Range status**: one line per queued work unit with a completion date
//! - **Success estimate**: the chance that the queued primality tests find a prime
//!
//! All output goes through [`StatusBuffer`], which never grows past its
//! capacity and marks truncation once.

mod buffer;
mod estimate;
mod options;
mod queue;
mod render;
mod restore;

// Re-export public types and functions
pub use buffer::{DEFAULT_RESERVE, RenderStatus, StatusBuffer, TRUNCATION_MARKER};
pub use estimate::{NO_WORK_QUEUED, SuccessEstimate, estimate_queue, item_probability};
pub use options::{EstimatorOptions, ReportOptions};
pub use queue::{
    EPOCH_LIMIT, POST_2038_SENTINEL, StaticQueue, WorkQueue, completion_date,
    range_status_message, work_description, write_range_status,
};
pub use render::{describe, parse_error_line, progress_summary, render_entry, status_line};
pub use restore::{restore_status_message, write_restore_status};
