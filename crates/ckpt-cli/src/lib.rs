//! Library components of the `ckpt-status` command.

pub mod config;
pub mod logging;
pub mod worktodo;
