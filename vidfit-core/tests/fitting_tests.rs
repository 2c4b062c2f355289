// vidfit-core/tests/fitting_tests.rs
//
// End-to-end properties of the frame-fitting engine: target selection,
// scaling strategy and filter chain composition working together.

use vidfit_core::{
    compose, plan_scaling, select_target, CropBox, Rotation, ScalingLimits, ScalingMode,
    SubtitleStyle, TargetPolicy, VideoGeometry,
};

fn policy() -> TargetPolicy {
    TargetPolicy::default()
}

fn limits() -> ScalingLimits {
    ScalingLimits::default()
}

#[test]
fn test_rotated_widescreen_example() {
    // 1920x1080 with rotation: post-rotation aspect 0.5625 sits far below
    // the band, so the selector returns the minimum width.
    let source = VideoGeometry::new(1920, 1080);
    let target = select_target(source, Some(Rotation::Counterclockwise), &policy());
    assert_eq!(target, VideoGeometry::new(770, 480));

    // Scaling then works on the pre-rotation frame against that target.
    let plan = plan_scaling(source, target, &limits());
    let chain = compose(
        Some(&plan),
        None,
        None,
        Some(Rotation::Counterclockwise),
        &policy(),
        &SubtitleStyle::default(),
    );
    assert!(chain.render().ends_with("transpose=2"));
}

#[test]
fn test_four_by_three_takes_heavy_path() {
    // 4000x3000 against 800x480 needs a 1.25 stretch, beyond every bound,
    // so the selector must take the crop path rather than a minimal fit.
    let source = VideoGeometry::new(4000, 3000);
    let target = select_target(source, None, &policy());
    assert_eq!(target.width, 800);

    let plan = plan_scaling(source, target, &limits());
    assert_eq!(plan.mode, ScalingMode::ScaleThenCrop);
    let crop = plan.crop.expect("heavy path must crop");
    // A fifth of the scaled height is removed
    assert_eq!((plan.scale_width, plan.scale_height), (800, 600));
    assert_eq!((crop.width, crop.height), (800, 480));
}

#[test]
fn test_selected_width_always_within_band() {
    let policy = policy();
    let limits = limits();
    // Sweep sources from much narrower to much wider than the band
    for width in (200..4000).step_by(7) {
        let source = VideoGeometry::new(width, 1000);
        let target = select_target(source, None, &policy);
        assert!(
            target.width >= policy.width_min && target.width <= policy.width_max,
            "source {width}x1000 selected width {}",
            target.width
        );
        assert_eq!(target.height, policy.height);

        // Whatever the plan, the final geometry is exactly the target
        let plan = plan_scaling(source, target, &limits);
        assert_eq!(plan.final_geometry(), target, "source {width}x1000");
    }
}

#[test]
fn test_boundary_aspects_select_band_edges() {
    let policy = policy();

    // Aspect exactly width_min/height
    let source = VideoGeometry::new(policy.width_min * 3, policy.height * 3);
    assert_eq!(select_target(source, None, &policy).width, policy.width_min);

    // Aspect exactly width_max/height
    let source = VideoGeometry::new(policy.width_max * 3, policy.height * 3);
    assert_eq!(select_target(source, None, &policy).width, policy.width_max);
}

#[test]
fn test_snapping_to_preferred_width() {
    let policy = policy();
    // Natural widths within preference_strength of 780 all snap to 780
    for natural in 775..=785 {
        let source = VideoGeometry::new(natural * 10, 4800);
        let target = select_target(source, None, &policy);
        assert_eq!(target.width, 780, "natural width {natural}");
    }
    // Just outside the snap range the natural width survives
    let source = VideoGeometry::new(7860, 4800);
    assert_eq!(select_target(source, None, &policy).width, 786);
}

#[test]
fn test_crop_offsets_centered_and_non_negative() {
    let limits = limits();
    let policy = policy();
    for (w, h) in [(4000, 3000), (640, 480), (2560, 1080), (1280, 544), (500, 900)] {
        let source = VideoGeometry::new(w, h);
        let target = select_target(source, None, &policy);
        let plan = plan_scaling(source, target, &limits);
        if let Some(crop) = plan.crop {
            assert_eq!(crop.x, (plan.scale_width - crop.width) / 2);
            assert_eq!(crop.y, (plan.scale_height - crop.height) / 2);
            assert!(crop.fits_within(VideoGeometry::new(
                plan.scale_width,
                plan.scale_height
            )));
        }
    }
}

#[test]
fn test_bar_crop_feeds_fitting_not_chain_only() {
    // A letterboxed 16:9 frame: bars removed, the remaining 2.40:1 picture
    // drives target selection.
    let source = VideoGeometry::new(1920, 1080);
    let bar_crop = CropBox::new(1920, 800, 0, 140);

    let effective = bar_crop.geometry();
    let target = select_target(effective, None, &policy());
    assert_eq!(target.width, 800);

    let plan = plan_scaling(effective, target, &limits());
    let chain = compose(
        Some(&plan),
        Some(bar_crop),
        None,
        None,
        &policy(),
        &SubtitleStyle::default(),
    );
    let rendered = chain.render();
    assert!(
        rendered.starts_with("crop=1920:800:0:140,scale="),
        "chain was {rendered}"
    );
    // Source is untouched by the bar crop value
    assert_eq!(source.width, 1920);
}
