//! Filter chain composition.
//!
//! Builds the ordered transform pipeline handed to the encoder. The order is
//! fixed and never depends on configuration: bar-crop, scale, target-crop,
//! subtitles, rotation. Subtitles are composed before rotation so the
//! rendered text inherits the output orientation.

use std::path::{Path, PathBuf};

use crate::config::{Rotation, SubtitleStyle, TargetPolicy};
use crate::media::CropBox;

use super::scaling::ScalingPlan;

/// One geometric or overlay operation, with its ffmpeg rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterOp {
    /// Removal of detected letterbox/pillarbox borders.
    BarCrop(CropBox),
    /// Scale to the planned intermediate dimensions.
    Scale { width: u32, height: u32 },
    /// Centered crop bringing the scaled frame to the exact target.
    TargetCrop(CropBox),
    /// Burned-in subtitle overlay.
    Subtitles { path: PathBuf, style: SubtitleStyle },
    /// Final 90 degree rotation.
    Transpose(Rotation),
}

impl FilterOp {
    fn render(&self) -> String {
        match self {
            FilterOp::BarCrop(crop) | FilterOp::TargetCrop(crop) => {
                format!("crop={crop}")
            }
            FilterOp::Scale { width, height } => format!("scale={width}:{height}"),
            FilterOp::Subtitles { path, style } => {
                format!(
                    "subtitles='{}':force_style='FontName={},FontSize={},\
                     OutlineColour=&H80000000,Outline={},MarginV={}'",
                    escape_filter_path(path),
                    style.font_name,
                    style.font_size,
                    style.outline,
                    style.margin_v
                )
            }
            FilterOp::Transpose(Rotation::Clockwise) => "transpose=1".to_string(),
            FilterOp::Transpose(Rotation::Counterclockwise) => "transpose=2".to_string(),
        }
    }
}

/// The ordered transform pipeline for one file. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterChain {
    ops: Vec<FilterOp>,
}

impl FilterChain {
    #[must_use]
    pub fn ops(&self) -> &[FilterOp] {
        &self.ops
    }

    /// Renders the chain as an ffmpeg `-vf` argument.
    #[must_use]
    pub fn render(&self) -> String {
        self.ops
            .iter()
            .map(FilterOp::render)
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Assembles the filter chain for one file.
///
/// With a scaling plan the chain is bar-crop (if any), scale, target-crop
/// (if the plan overshoots), subtitles (if any), rotation (if configured).
/// Without a plan the source geometry was unknown and the neutral fallback
/// applies: scale straight to the preferred width at the target height,
/// keeping the subtitle and rotation steps.
#[must_use]
pub fn compose(
    plan: Option<&ScalingPlan>,
    bar_crop: Option<CropBox>,
    subtitle: Option<&Path>,
    rotation: Option<Rotation>,
    policy: &TargetPolicy,
    style: &SubtitleStyle,
) -> FilterChain {
    let mut ops = Vec::new();

    match plan {
        Some(plan) => {
            if let Some(crop) = bar_crop {
                ops.push(FilterOp::BarCrop(crop));
            }
            ops.push(FilterOp::Scale {
                width: plan.scale_width,
                height: plan.scale_height,
            });
            if let Some(crop) = plan.crop {
                ops.push(FilterOp::TargetCrop(crop));
            }
        }
        None => {
            ops.push(FilterOp::Scale {
                width: policy.width_preferred,
                height: policy.height,
            });
        }
    }

    if let Some(path) = subtitle {
        ops.push(FilterOp::Subtitles {
            path: path.to_path_buf(),
            style: style.clone(),
        });
    }

    if let Some(rotation) = rotation {
        ops.push(FilterOp::Transpose(rotation));
    }

    FilterChain { ops }
}

/// Escapes a path for use inside an ffmpeg filter argument.
fn escape_filter_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "\\\\").replace(':', "\\:")
}
