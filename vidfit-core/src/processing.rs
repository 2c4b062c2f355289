//! Batch orchestration: one file at a time through probe, detection,
//! fitting and encode.
//!
//! Every failure is isolated to its file; the batch always runs to the end.
//! The only persisted state is the presence of output files, checked
//! immediately before each file is started, which makes interrupted runs
//! resumable and repeat runs idempotent.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::Serialize;

use crate::config::CoreConfig;
use crate::detection::detect_bars;
use crate::discovery::find_subtitle;
use crate::error::CoreResult;
use crate::external::ffmpeg::{run_encode, EncodeParams};
use crate::external::ffprobe::probe_media;
use crate::fitting::scaling::{ScalingMode, ScalingPlan};
use crate::fitting::{compose, plan_scaling, select_target};
use crate::media::CropBox;
use crate::progress::ProgressObserver;
use crate::utils::{format_duration, get_filename_safe};
use crate::EncodeResult;

/// Counts of how sources were fitted, reported in the run summary.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StrategyStats {
    /// Aspect already matched; plain uniform scale.
    pub exact_fit: usize,
    /// Bounded non-uniform distortion.
    pub distorted: usize,
    /// Uniform cover scale followed by a centered crop.
    pub cropped: usize,
    /// Unknown geometry, neutral fallback chain.
    pub fallback: usize,
    /// Files where a letterbox crop was applied first.
    pub bar_cropped: usize,
}

/// Outcome of one batch run.
#[derive(Debug, Default, Clone, Serialize)]
pub struct BatchSummary {
    /// Successfully encoded files.
    pub results: Vec<EncodeResult>,
    /// Files skipped because their output already existed.
    pub skipped: usize,
    /// Files that failed probing or encoding.
    pub failed: usize,
    pub stats: StrategyStats,
}

/// Processes the given files sequentially according to `config`.
///
/// Expects ffmpeg and ffprobe to be present; callers check with
/// [`crate::external::check_dependency`] before starting a run. Individual
/// file failures are logged and counted, never propagated.
pub fn process_videos(
    config: &CoreConfig,
    files: &[PathBuf],
    observer: &dyn ProgressObserver,
) -> CoreResult<BatchSummary> {
    fs::create_dir_all(&config.output_dir)?;

    let mut summary = BatchSummary::default();
    let total = files.len();

    for (index, input_path) in files.iter().enumerate() {
        let filename = match get_filename_safe(input_path) {
            Ok(name) => name,
            Err(e) => {
                log::error!("{e}");
                summary.failed += 1;
                continue;
            }
        };
        let stem = input_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| filename.clone());
        let output_path = config.output_dir.join(format!("{stem}.mp4"));

        log::info!("({}/{}) {}", index + 1, total, filename);

        // A completed (or previously attempted) file is never redone.
        if output_path.exists() {
            log::info!("Skipping '{stem}', output exists.");
            summary.skipped += 1;
            continue;
        }

        match process_one(config, input_path, &output_path, observer, &mut summary.stats) {
            Ok(result) => {
                log::info!(
                    "Completed {} in {}",
                    result.filename,
                    format_duration(result.duration.as_secs_f64())
                );
                summary.results.push(result);
            }
            Err(e) => {
                log::error!("Failed to process {filename}: {e}");
                summary.failed += 1;
            }
        }
    }

    Ok(summary)
}

/// Runs the full pipeline for a single file.
fn process_one(
    config: &CoreConfig,
    input_path: &Path,
    output_path: &Path,
    observer: &dyn ProgressObserver,
    stats: &mut StrategyStats,
) -> CoreResult<EncodeResult> {
    let started = Instant::now();

    if !input_path.is_file() {
        return Err(crate::error::CoreError::PathError(format!(
            "Input file missing or unreadable: {}",
            input_path.display()
        )));
    }

    let info = probe_media(input_path)?;
    if let Some(geometry) = info.geometry {
        log::info!("  Source: {geometry}");
    }
    if let Some(duration) = info.duration {
        log::info!("  Duration: {}", format_duration(duration));
    }

    let subtitle = find_subtitle(input_path);
    if let Some(srt) = &subtitle {
        log::info!("  Subtitles: {}", srt.display());
    }

    let bar_crop: Option<CropBox> = match info.geometry {
        Some(geometry) if config.detect_bars => {
            match detect_bars(input_path, geometry, info.duration, config.bar_sample_secs) {
                Ok(crop) => crop,
                Err(e) => {
                    log::warn!("Bar detection failed, proceeding without crop: {e}");
                    None
                }
            }
        }
        _ => None,
    };
    if let Some(crop) = bar_crop {
        log::info!("  Black bars detected, cropping to {}x{}", crop.width, crop.height);
    }

    let plan: Option<ScalingPlan> = info.geometry.map(|geometry| {
        let effective = bar_crop.map_or(geometry, |crop| crop.geometry());
        let target = select_target(effective, config.rotation, &config.target);
        let plan = plan_scaling(effective, target, &config.limits);
        log::info!(
            "  Fit: {effective} -> {target} ({})",
            describe_plan(&plan)
        );
        plan
    });

    record_strategy(stats, plan.as_ref(), bar_crop.is_some());

    let filters = compose(
        plan.as_ref(),
        bar_crop,
        subtitle.as_deref(),
        config.rotation,
        &config.target,
        &config.subtitles,
    );
    log::info!("  Filters: {}", filters.render());

    let params = EncodeParams {
        input_path: input_path.to_path_buf(),
        output_path: output_path.to_path_buf(),
        filters,
        duration_secs: info.duration,
        settings: config.encoder.clone(),
    };
    run_encode(&params, observer)?;

    let input_size = fs::metadata(input_path).map(|m| m.len()).unwrap_or(0);
    let output_size = fs::metadata(output_path).map(|m| m.len()).unwrap_or(0);

    Ok(EncodeResult {
        filename: params
            .input_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| params.input_path.display().to_string()),
        duration: started.elapsed(),
        input_size,
        output_size,
    })
}

fn describe_plan(plan: &ScalingPlan) -> String {
    match plan.mode {
        ScalingMode::Distort if plan.distortion > 1.0 => {
            format!("{:.1}% distortion", (plan.distortion - 1.0) * 100.0)
        }
        ScalingMode::Distort => "exact fit".to_string(),
        ScalingMode::ScaleThenCrop => "scale and crop".to_string(),
    }
}

fn record_strategy(stats: &mut StrategyStats, plan: Option<&ScalingPlan>, bar_cropped: bool) {
    match plan {
        None => stats.fallback += 1,
        Some(plan) => match plan.mode {
            ScalingMode::Distort if plan.distortion > 1.0 => stats.distorted += 1,
            ScalingMode::Distort => stats.exact_fit += 1,
            ScalingMode::ScaleThenCrop => stats.cropped += 1,
        },
    }
    if bar_cropped {
        stats.bar_cropped += 1;
    }
}
