//! Scaling strategy selection: bounded distortion versus crop-after-scale.

use crate::config::ScalingLimits;
use crate::media::{CropBox, VideoGeometry};

/// Aspect ratios closer than this are treated as equal.
const ASPECT_EPSILON: f64 = 1e-6;

/// How a source is brought to the target dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalingMode {
    /// Non-uniform scale straight to the target dimensions.
    Distort,
    /// Uniform scale covering the target, then a centered crop.
    ScaleThenCrop,
}

/// The chosen strategy for one source. Consumed once by the filter chain
/// composer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalingPlan {
    pub mode: ScalingMode,
    /// Dimensions of the scale step.
    pub scale_width: u32,
    pub scale_height: u32,
    /// Centered crop bringing the scaled frame to the exact target, when the
    /// scale step overshoots it.
    pub crop: Option<CropBox>,
    /// The aspect distortion factor applied; 1.0 means none.
    pub distortion: f64,
}

impl ScalingPlan {
    /// Dimensions after the scale step and any crop.
    #[must_use]
    pub fn final_geometry(&self) -> VideoGeometry {
        match self.crop {
            Some(crop) => crop.geometry(),
            None => VideoGeometry::new(self.scale_width, self.scale_height),
        }
    }
}

/// Decides how to fit `source` into `target`.
///
/// If the aspect ratios already match, the frame scales straight to the
/// target. Otherwise the distortion factor that would equalize the aspects
/// is computed; it is applied only when it passes both the hard
/// stretch/squeeze ceiling and the tighter preferred bound. Factors between
/// the preferred bound and the ceiling fall through to cropping even though
/// pure distortion would technically fit.
///
/// The caller must not pass unknown or degenerate source dimensions; the
/// probe's fallback path handles those before this selector runs.
#[must_use]
pub fn plan_scaling(
    source: VideoGeometry,
    target: VideoGeometry,
    limits: &ScalingLimits,
) -> ScalingPlan {
    let source_aspect = source.aspect();
    let target_aspect = target.aspect();

    if (source_aspect - target_aspect).abs() < ASPECT_EPSILON {
        return ScalingPlan {
            mode: ScalingMode::Distort,
            scale_width: target.width,
            scale_height: target.height,
            crop: None,
            distortion: 1.0,
        };
    }

    // Source relatively taller than target means a stretch, wider means a
    // squeeze; either way the needed factor is the larger aspect quotient.
    let is_stretch = source_aspect < target_aspect;
    let needed = if is_stretch {
        target_aspect / source_aspect
    } else {
        source_aspect / target_aspect
    };

    let within_ceiling = if is_stretch {
        needed <= limits.max_stretch
    } else {
        needed <= 1.0 / limits.min_squeeze
    };

    if within_ceiling && needed <= limits.preferred_max_distortion {
        return ScalingPlan {
            mode: ScalingMode::Distort,
            scale_width: target.width,
            scale_height: target.height,
            crop: None,
            distortion: needed,
        };
    }

    // Cover the target by scaling along the tighter axis, then crop the
    // overflowing axis symmetrically.
    let (scale_width, scale_height) = if is_stretch {
        (target.width, (f64::from(target.width) / source_aspect) as u32)
    } else {
        ((f64::from(target.height) * source_aspect) as u32, target.height)
    };

    let crop = (scale_width != target.width || scale_height != target.height).then(|| {
        CropBox::new(
            target.width,
            target.height,
            (scale_width - target.width) / 2,
            (scale_height - target.height) / 2,
        )
    });

    ScalingPlan {
        mode: ScalingMode::ScaleThenCrop,
        scale_width,
        scale_height,
        crop,
        distortion: 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits() -> ScalingLimits {
        ScalingLimits::default()
    }

    #[test]
    fn test_matching_aspect_is_plain_scale() {
        // 1600x960 has exactly the 800x480 aspect
        let plan = plan_scaling(
            VideoGeometry::new(1600, 960),
            VideoGeometry::new(800, 480),
            &limits(),
        );
        assert_eq!(plan.mode, ScalingMode::Distort);
        assert_eq!(plan.distortion, 1.0);
        assert!(plan.crop.is_none());
        assert_eq!(plan.final_geometry(), VideoGeometry::new(800, 480));
    }

    #[test]
    fn test_small_squeeze_uses_distortion() {
        // 16:9 to 800x480: needed squeeze 1.778/1.667 = 1.067, under both
        // the 1/0.85 ceiling and the 1.10 preferred bound
        let plan = plan_scaling(
            VideoGeometry::new(1920, 1080),
            VideoGeometry::new(800, 480),
            &limits(),
        );
        assert_eq!(plan.mode, ScalingMode::Distort);
        assert!(plan.crop.is_none());
        assert_eq!((plan.scale_width, plan.scale_height), (800, 480));
        assert!((plan.distortion - (1920.0 / 1080.0) / (800.0 / 480.0)).abs() < 1e-9);
    }

    #[test]
    fn test_between_preferred_and_ceiling_selects_crop() {
        // Needed stretch of ~1.12 passes the 1.15 ceiling but not the 1.10
        // preferred bound, so cropping must win.
        let source = VideoGeometry::new(1000, 672); // aspect ~1.488
        let target = VideoGeometry::new(800, 480); // aspect ~1.667
        let needed = target.aspect() / source.aspect();
        assert!(needed > 1.10 && needed < 1.15, "needed = {needed}");

        let plan = plan_scaling(source, target, &limits());
        assert_eq!(plan.mode, ScalingMode::ScaleThenCrop);
        assert_eq!(plan.distortion, 1.0);
    }

    #[test]
    fn test_large_mismatch_selects_crop() {
        // 4:3 to 800x480 needs a 1.25 stretch, over every bound
        let plan = plan_scaling(
            VideoGeometry::new(4000, 3000),
            VideoGeometry::new(800, 480),
            &limits(),
        );
        assert_eq!(plan.mode, ScalingMode::ScaleThenCrop);
        // Cover scale pins the width and overshoots the height
        assert_eq!(plan.scale_width, 800);
        assert_eq!(plan.scale_height, 600);
        let crop = plan.crop.unwrap();
        assert_eq!((crop.width, crop.height), (800, 480));
        assert_eq!((crop.x, crop.y), (0, 60));
        assert_eq!(plan.final_geometry(), VideoGeometry::new(800, 480));
    }

    #[test]
    fn test_wide_source_crops_width() {
        // 2.35:1 squeezed to 800x480 would need ~1.41, so crop mode scales
        // by height and crops the sides.
        let plan = plan_scaling(
            VideoGeometry::new(1880, 800),
            VideoGeometry::new(800, 480),
            &limits(),
        );
        assert_eq!(plan.mode, ScalingMode::ScaleThenCrop);
        assert_eq!(plan.scale_height, 480);
        assert_eq!(plan.scale_width, 1128);
        let crop = plan.crop.unwrap();
        assert_eq!((crop.width, crop.height), (800, 480));
        assert_eq!((crop.x, crop.y), (164, 0));
    }

    #[test]
    fn test_crop_never_exceeds_scaled_frame() {
        let target = VideoGeometry::new(780, 480);
        for (w, h) in [
            (640, 480),
            (1920, 1080),
            (3840, 2160),
            (720, 576),
            (1280, 544),
            (486, 864),
        ] {
            let plan = plan_scaling(VideoGeometry::new(w, h), target, &limits());
            if let Some(crop) = plan.crop {
                let scaled = VideoGeometry::new(plan.scale_width, plan.scale_height);
                assert!(crop.fits_within(scaled), "{w}x{h}: {crop} in {scaled}");
                // Offsets are the floor of half the overflow
                assert_eq!(crop.x, (plan.scale_width - crop.width) / 2);
                assert_eq!(crop.y, (plan.scale_height - crop.height) / 2);
            }
        }
    }

    #[test]
    fn test_distortion_iff_within_preferred_bound() {
        let target = VideoGeometry::new(800, 480);
        // Sweep aspect mismatches from none to far past the ceiling
        for i in 0..60 {
            let factor = 1.0 + f64::from(i) * 0.005;
            let source_h = (f64::from(target.height) * factor).round() as u32;
            let source = VideoGeometry::new(target.width, source_h);
            let plan = plan_scaling(source, target, &limits());

            let needed = target.aspect() / source.aspect();
            let expect_distort = needed <= limits().preferred_max_distortion;
            let got_distort =
                plan.mode == ScalingMode::Distort && plan.crop.is_none();
            assert_eq!(
                got_distort, expect_distort,
                "factor {factor}: needed {needed}"
            );
        }
    }
}
