//! Test execution engine
//!
//! Launches one `casperjs test` process per discovered script, either all at
//! once or one at a time, scrapes each output and folds the results into a
//! single batch verdict.

#![allow(dead_code)]

mod batch;
mod command;
mod orchestrator;
mod process;

pub use batch::Completion;
pub use orchestrator::Orchestrator;

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a batch
#[derive(Debug, Error)]
pub enum ExecutorError {
    /// The runner printed its runtime-error marker
    #[error("Runtime error in {}", .script.display())]
    Fatal { script: PathBuf, output: String },

    #[error("Failed to launch `{command}`: {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    #[error("Cannot build PATH overlay: {0}")]
    PathOverlay(String),

    #[error("Script discovery failed: {0}")]
    Discovery(String),
}

impl ExecutorError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, ExecutorError::Fatal { .. })
    }
}
