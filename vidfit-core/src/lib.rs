//! Core library for batch-fitting videos onto a fixed-geometry display.
//!
//! This crate discovers input videos, probes their dimensions, detects
//! letterbox bars, picks an output width within the display's band, chooses
//! between bounded aspect distortion and crop-after-scale, composes the
//! ffmpeg filter chain and drives the encode.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//! use vidfit_core::{CoreConfig, NullObserver, Rotation};
//!
//! let mut config = CoreConfig::new(
//!     PathBuf::from("/path/to/input"),
//!     PathBuf::from("/path/to/output"),
//! );
//! config.rotation = Some(Rotation::Counterclockwise);
//! config.validate().unwrap();
//!
//! let files = vidfit_core::find_videos(&config.input_dir).unwrap();
//! let summary = vidfit_core::process_videos(&config, &files, &NullObserver).unwrap();
//! println!(
//!     "{} converted, {} skipped, {} failed",
//!     summary.results.len(),
//!     summary.skipped,
//!     summary.failed
//! );
//! ```

pub mod config;
pub mod detection;
pub mod discovery;
pub mod error;
pub mod external;
pub mod fitting;
pub mod media;
pub mod processing;
pub mod progress;
pub mod utils;

// Re-exports for the public API
pub use config::{
    CoreConfig, EncoderSettings, Rotation, ScalingLimits, SubtitleStyle, TargetPolicy,
};
pub use discovery::{find_subtitle, find_videos};
pub use error::{CoreError, CoreResult};
pub use external::check_dependency;
pub use fitting::{compose, plan_scaling, select_target, FilterChain, ScalingMode, ScalingPlan};
pub use media::{CropBox, MediaInfo, VideoGeometry};
pub use processing::{process_videos, BatchSummary, StrategyStats};
pub use progress::{NullObserver, ProgressEvent, ProgressObserver};
pub use utils::{format_bytes, format_duration, parse_ffmpeg_time};

use serde::Serialize;
use std::time::Duration;

/// Statistics for one successfully converted file.
#[derive(Debug, Clone, Serialize)]
pub struct EncodeResult {
    pub filename: String,
    /// Wall-clock time spent on this file.
    pub duration: Duration,
    pub input_size: u64,
    pub output_size: u64,
}
