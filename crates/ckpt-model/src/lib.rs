//! Data model for checkpoint (save file) status reporting.
//!
//! The types in this crate describe what a checkpoint file says about a
//! long-running computation: the number under test ([`ComputationSpec`]),
//! which algorithm is running ([`WorkKind`]) and how far it got
//! ([`ProgressRecord`]). They are produced by the decoder in `ckpt-format`
//! and consumed by the renderers in `ckpt-report`.

pub mod checkpoint;
pub mod kind;
pub mod progress;
pub mod queue;
pub mod spec;

pub use checkpoint::{Checkpoint, CheckpointHeader};
pub use kind::WorkKind;
pub use progress::{
    EcmProgress, EcmStage, IterationProgress, PMinus1Progress, PMinus1Stage, ProgressRecord,
};
pub use queue::QueuedWork;
pub use spec::ComputationSpec;
