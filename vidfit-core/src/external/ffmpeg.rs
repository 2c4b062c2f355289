//! FFmpeg command building and execution.
//!
//! Handles the main encode invocation (libx264 with the fitted filter chain)
//! and the short cropdetect windows used by black-bar detection. Both run
//! through ffmpeg-sidecar and consume its typed event stream.

use std::path::{Path, PathBuf};

use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel};

use crate::config::EncoderSettings;
use crate::error::{command_failed_error, command_start_error, CoreResult};
use crate::fitting::filter::FilterChain;
use crate::progress::{ProgressEvent, ProgressObserver, ProgressThrottle};
use crate::utils::parse_ffmpeg_time;

/// Parameters for one encode invocation.
#[derive(Debug, Clone)]
pub struct EncodeParams {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub filters: FilterChain,
    /// Source duration, used only for progress percentages.
    pub duration_secs: Option<f64>,
    pub settings: EncoderSettings,
}

/// Builds the complete ffmpeg command line for an encode.
fn build_encode_command(params: &EncodeParams) -> FfmpegCommand {
    let mut cmd = FfmpegCommand::new();
    cmd.args(["-hide_banner", "-y"]);
    cmd.input(params.input_path.to_string_lossy().as_ref());

    let vf = params.filters.render();
    if !vf.is_empty() {
        cmd.args(["-vf", &vf]);
    }

    cmd.args(["-c:v", "libx264", "-profile:v", "main", "-level", "3.0"]);
    cmd.args(["-preset", &params.settings.preset]);
    cmd.args(["-crf", &params.settings.crf.to_string()]);
    if let Some(threads) = params.settings.threads {
        cmd.args(["-threads", &threads.to_string()]);
    }
    cmd.args([
        "-c:a",
        "aac",
        "-b:a",
        &format!("{}k", params.settings.audio_bitrate_kbps),
    ]);
    cmd.args(["-pix_fmt", "yuv420p", "-movflags", "+faststart"]);
    cmd.output(params.output_path.to_string_lossy().as_ref());
    cmd
}

/// Runs an encode to completion, forwarding progress to the observer.
///
/// A non-zero exit discards the attempt: the error carries the collected
/// stderr and the partial output file is left on disk.
pub fn run_encode(params: &EncodeParams, observer: &dyn ProgressObserver) -> CoreResult<()> {
    let filename = params
        .input_path
        .file_name()
        .map_or_else(|| params.input_path.to_string_lossy(), |n| n.to_string_lossy())
        .to_string();

    observer.on_event(&ProgressEvent::Started {
        filename: filename.clone(),
        duration_secs: params.duration_secs,
    });

    let mut cmd = build_encode_command(params);
    log::debug!("FFmpeg command: {cmd:?}");

    let mut child = cmd
        .spawn()
        .map_err(|e| command_start_error("ffmpeg", e))?;

    let mut throttle = ProgressThrottle::new(params.duration_secs);
    let mut stderr_buffer = String::new();

    for event in child
        .iter()
        .map_err(|e| command_start_error("ffmpeg", std::io::Error::new(std::io::ErrorKind::Other, e.to_string())))?
    {
        match event {
            FfmpegEvent::Progress(progress) => {
                let Some(elapsed) = parse_ffmpeg_time(&progress.time) else {
                    continue;
                };
                let speed = (progress.speed > 0.0).then_some(progress.speed);
                if let Some(update) = throttle.update(elapsed, speed) {
                    observer.on_event(&update);
                }
            }
            FfmpegEvent::Log(level, message) => {
                match level {
                    LogLevel::Error | LogLevel::Fatal => {
                        stderr_buffer.push_str(&message);
                        stderr_buffer.push('\n');
                        log::debug!(target: "ffmpeg_log", "{message}");
                    }
                    LogLevel::Warning => log::debug!(target: "ffmpeg_log", "{message}"),
                    _ => log::trace!(target: "ffmpeg_log", "{message}"),
                }
            }
            FfmpegEvent::Error(error) => {
                stderr_buffer.push_str(&error);
                stderr_buffer.push('\n');
                log::debug!("ffmpeg stderr: {error}");
            }
            _ => {}
        }
    }

    let status = child
        .wait()
        .map_err(|e| command_start_error("ffmpeg", e))?;

    if status.success() {
        observer.on_event(&ProgressEvent::Completed { filename });
        Ok(())
    } else {
        observer.on_event(&ProgressEvent::Failed {
            filename,
            message: format!("ffmpeg exited with status {:?}", status.code()),
        });
        Err(command_failed_error(
            "ffmpeg",
            status,
            stderr_buffer.trim().to_string(),
        ))
    }
}

/// Runs a short cropdetect pass starting at `start_secs` and returns every
/// log line that carries a crop rectangle.
pub(crate) fn sample_crop_window(
    input_path: &Path,
    start_secs: f64,
    window_secs: f64,
) -> CoreResult<Vec<String>> {
    log::trace!(
        "Sampling crop at {:.1}s for {:.1}s on {}",
        start_secs,
        window_secs,
        input_path.display()
    );

    let mut cmd = FfmpegCommand::new();
    cmd.args(["-hide_banner"]);
    cmd.args(["-ss", &format!("{start_secs:.2}")]);
    cmd.input(input_path.to_string_lossy().as_ref());
    cmd.args([
        "-t",
        &format!("{window_secs:.2}"),
        "-vf",
        "cropdetect=limit=24:round=16:reset=0",
        "-f",
        "null",
        "-",
    ]);

    let mut child = cmd
        .spawn()
        .map_err(|e| command_start_error("ffmpeg", e))?;

    let mut lines = Vec::new();
    for event in child
        .iter()
        .map_err(|e| command_start_error("ffmpeg", std::io::Error::new(std::io::ErrorKind::Other, e.to_string())))?
    {
        if let FfmpegEvent::Log(_, line) = event {
            if line.contains("crop=") {
                lines.push(line);
            }
        }
    }

    // A failed sampler window is not fatal to detection; the caller treats
    // an empty result as "no candidates".
    let status = child
        .wait()
        .map_err(|e| command_start_error("ffmpeg", e))?;
    if !status.success() {
        log::warn!(
            "cropdetect sample at {:.1}s exited with {:?}",
            start_secs,
            status.code()
        );
    }

    Ok(lines)
}
