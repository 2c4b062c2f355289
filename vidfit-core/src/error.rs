//! Error types for vidfit-core.
//!
//! All fallible operations in the crate return [`CoreResult`]. External
//! command failures are funneled through the `command_*_error` helpers so
//! that the tool name and captured stderr end up in the error message.

use std::io;
use std::process::ExitStatus;

use thiserror::Error;

/// Errors produced by the core library.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Directory walk error: {0}")]
    Walkdir(#[from] walkdir::Error),

    #[error("Required external command not found: {0}")]
    DependencyNotFound(String),

    #[error("Failed to start command '{0}': {1}")]
    CommandStart(String, #[source] io::Error),

    #[error("Command '{cmd}' failed (exit code {code:?}): {stderr}")]
    CommandFailed {
        cmd: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("ffprobe output error: {0}")]
    FfprobeParse(String),

    #[error("Invalid path: {0}")]
    PathError(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("No video files found to process")]
    NoFilesFound,
}

/// Result type for vidfit-core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Builds a [`CoreError::CommandStart`] for a command that could not be spawned.
pub fn command_start_error(cmd: impl Into<String>, err: io::Error) -> CoreError {
    CoreError::CommandStart(cmd.into(), err)
}

/// Builds a [`CoreError::CommandFailed`] from an exit status and captured stderr.
pub fn command_failed_error(
    cmd: impl Into<String>,
    status: ExitStatus,
    stderr: impl Into<String>,
) -> CoreError {
    CoreError::CommandFailed {
        cmd: cmd.into(),
        code: status.code(),
        stderr: stderr.into(),
    }
}
