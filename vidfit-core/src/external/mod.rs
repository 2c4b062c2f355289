//! Interactions with the external ffmpeg and ffprobe tools.
//!
//! Everything that shells out lives under this module; the rest of the crate
//! works on the parsed results.

use std::io;
use std::process::{Command, Stdio};

use crate::error::{CoreError, CoreResult};

pub mod ffmpeg;
pub mod ffprobe;

pub use ffmpeg::{run_encode, EncodeParams};
pub use ffprobe::probe_media;

/// Checks that a required external command is available and executable by
/// running it with `-version`.
pub fn check_dependency(cmd_name: &str) -> CoreResult<()> {
    let result = Command::new(cmd_name)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match result {
        Ok(_) => {
            log::debug!("Found dependency: {cmd_name}");
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::warn!("Dependency '{cmd_name}' not found.");
            Err(CoreError::DependencyNotFound(cmd_name.to_string()))
        }
        Err(e) => {
            log::error!("Failed to start dependency check for '{cmd_name}': {e}");
            Err(CoreError::CommandStart(cmd_name.to_string(), e))
        }
    }
}
