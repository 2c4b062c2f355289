//! FFprobe integration for dimension and duration probing.
//!
//! Only two facts are consumed from the probe: the dimensions of the first
//! video stream and the container duration. A file that ffprobe can open but
//! not make sense of yields an empty [`MediaInfo`], which downstream code
//! handles with the neutral fallback chain. Only a file that cannot be
//! opened at all is an error.

use std::path::Path;

use ffprobe::{ffprobe, FfProbeError};

use crate::error::{command_start_error, CoreResult};
use crate::media::{MediaInfo, VideoGeometry};

/// Probes a media file for video dimensions and duration.
pub fn probe_media(input_path: &Path) -> CoreResult<MediaInfo> {
    log::debug!("Running ffprobe on: {}", input_path.display());

    let metadata = match ffprobe(input_path) {
        Ok(metadata) => metadata,
        Err(FfProbeError::Io(io_err)) => {
            return Err(command_start_error("ffprobe", io_err));
        }
        Err(err) => {
            // Unreadable or unparsable content is the normal "unknown" state
            log::warn!(
                "ffprobe could not analyze {}: {:?}",
                input_path.display(),
                err
            );
            return Ok(MediaInfo::default());
        }
    };

    let duration = metadata
        .format
        .duration
        .as_deref()
        .and_then(|d| d.parse::<f64>().ok())
        .filter(|d| d.is_finite() && *d >= 0.0);

    let geometry = metadata
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .and_then(|stream| match (stream.width, stream.height) {
            (Some(w), Some(h)) if w > 0 && h > 0 => {
                Some(VideoGeometry::new(w as u32, h as u32))
            }
            _ => None,
        });

    if geometry.is_none() {
        log::warn!(
            "No usable video stream dimensions in {}",
            input_path.display()
        );
    }

    Ok(MediaInfo { geometry, duration })
}
