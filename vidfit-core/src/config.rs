//! Run configuration for the conversion pipeline.
//!
//! All policy knobs live here as plain immutable values. A single
//! [`CoreConfig`] is built by the consumer (vidfit-cli), validated once and
//! then threaded through every component call for the whole run.

use std::path::PathBuf;

use crate::error::{CoreError, CoreResult};

/// Direction of the optional 90 degree output rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    Clockwise,
    Counterclockwise,
}

/// The output width band and height of the target display.
///
/// The display accepts a range of widths rather than a single resolution.
/// `width_preferred` wins whenever the width that exactly reproduces the
/// source aspect lies within `preference_strength` pixels of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetPolicy {
    /// Fixed output height in pixels.
    pub height: u32,
    /// Minimum acceptable output width.
    pub width_min: u32,
    /// Maximum acceptable output width (full panel width).
    pub width_max: u32,
    /// Nominal output width, chosen absent a strong reason to deviate.
    pub width_preferred: u32,
    /// Pixel tolerance around the preferred width within which it wins.
    pub preference_strength: u32,
}

impl Default for TargetPolicy {
    fn default() -> Self {
        Self {
            height: 480,
            width_min: 770,
            width_max: 800,
            width_preferred: 780,
            preference_strength: 5,
        }
    }
}

/// Bounds on deliberate aspect-changing scaling.
///
/// `max_stretch` and `min_squeeze` are hard ceilings; the tighter
/// `preferred_max_distortion` is where distortion is still considered
/// visually acceptable. Factors between the preferred bound and the hard
/// ceiling fall through to the crop-based strategy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalingLimits {
    /// Largest permitted stretch factor (> 1.0).
    pub max_stretch: f64,
    /// Smallest permitted squeeze factor (< 1.0).
    pub min_squeeze: f64,
    /// Largest distortion factor that is actually chosen over cropping.
    pub preferred_max_distortion: f64,
}

impl Default for ScalingLimits {
    fn default() -> Self {
        Self {
            max_stretch: 1.15,
            min_squeeze: 0.85,
            preferred_max_distortion: 1.10,
        }
    }
}

impl ScalingLimits {
    /// Limits reproducing the historical fixed-stretch policy: the given
    /// factor is always applied, never traded against cropping.
    #[must_use]
    pub fn fixed_stretch(factor: f64) -> Self {
        Self {
            max_stretch: factor,
            min_squeeze: 1.0 / factor,
            preferred_max_distortion: factor,
        }
    }

    /// Limits reproducing the historical crop-tolerance policy. Cropping a
    /// fraction `tolerance` from one axis is equivalent to distorting the
    /// other by `1 / (1 - tolerance)`, so that factor becomes the bound.
    #[must_use]
    pub fn from_crop_tolerance(tolerance: f64) -> Self {
        let factor = 1.0 / (1.0 - tolerance);
        Self {
            max_stretch: factor,
            min_squeeze: 1.0 - tolerance,
            preferred_max_distortion: factor,
        }
    }
}

/// Styling for burned-in subtitles, sized for a small panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleStyle {
    pub font_name: String,
    pub font_size: u32,
    /// Outline width in pixels.
    pub outline: u32,
    /// Bottom margin in pixels.
    pub margin_v: u32,
}

impl Default for SubtitleStyle {
    fn default() -> Self {
        Self {
            font_name: "Arial".to_string(),
            font_size: 18,
            outline: 2,
            margin_v: 15,
        }
    }
}

/// Arguments handed to the external encoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderSettings {
    /// x264 speed/quality preset.
    pub preset: String,
    /// Constant rate factor.
    pub crf: u8,
    /// AAC audio bitrate in kbit/s.
    pub audio_bitrate_kbps: u32,
    /// Worker thread cap passed to the encoder. `None` lets the encoder
    /// decide.
    pub threads: Option<usize>,
}

impl Default for EncoderSettings {
    fn default() -> Self {
        Self {
            preset: "veryslow".to_string(),
            crf: 23,
            audio_bitrate_kbps: 256,
            threads: None,
        }
    }
}

/// Complete configuration for one batch run. Read-only once constructed.
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// Directory scanned recursively for input videos.
    pub input_dir: PathBuf,
    /// Directory where converted files are written.
    pub output_dir: PathBuf,
    /// Optional 90 degree rotation applied as the final filter step.
    pub rotation: Option<Rotation>,
    /// Whether to run black-bar detection before fitting.
    pub detect_bars: bool,
    /// Seconds of video analyzed per bar-detection sample point.
    pub bar_sample_secs: f64,
    pub target: TargetPolicy,
    pub limits: ScalingLimits,
    pub subtitles: SubtitleStyle,
    pub encoder: EncoderSettings,
}

impl CoreConfig {
    /// Creates a configuration with default policies for the given paths.
    pub fn new(input_dir: PathBuf, output_dir: PathBuf) -> Self {
        Self {
            input_dir,
            output_dir,
            rotation: None,
            detect_bars: true,
            bar_sample_secs: 3.0,
            target: TargetPolicy::default(),
            limits: ScalingLimits::default(),
            subtitles: SubtitleStyle::default(),
            encoder: EncoderSettings::default(),
        }
    }

    /// Checks internal consistency of the policy values.
    pub fn validate(&self) -> CoreResult<()> {
        let t = &self.target;
        if t.height == 0 {
            return Err(CoreError::InvalidConfig(
                "target height must be positive".to_string(),
            ));
        }
        if t.width_min == 0 || t.width_min > t.width_max {
            return Err(CoreError::InvalidConfig(format!(
                "target width band {}..{} is empty",
                t.width_min, t.width_max
            )));
        }
        if t.width_preferred < t.width_min || t.width_preferred > t.width_max {
            return Err(CoreError::InvalidConfig(format!(
                "preferred width {} outside band {}..{}",
                t.width_preferred, t.width_min, t.width_max
            )));
        }
        let l = &self.limits;
        if l.max_stretch < 1.0 {
            return Err(CoreError::InvalidConfig(format!(
                "max stretch factor {} must be at least 1.0",
                l.max_stretch
            )));
        }
        if l.min_squeeze <= 0.0 || l.min_squeeze > 1.0 {
            return Err(CoreError::InvalidConfig(format!(
                "min squeeze factor {} must be in (0, 1]",
                l.min_squeeze
            )));
        }
        if l.preferred_max_distortion < 1.0 {
            return Err(CoreError::InvalidConfig(format!(
                "preferred distortion bound {} must be at least 1.0",
                l.preferred_max_distortion
            )));
        }
        if self.bar_sample_secs <= 0.0 {
            return Err(CoreError::InvalidConfig(
                "bar sample window must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
