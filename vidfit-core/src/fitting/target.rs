//! Output width selection within the display's width band.

use crate::config::{Rotation, TargetPolicy};
use crate::media::VideoGeometry;

/// Picks the output dimensions for a source.
///
/// The selector always reasons in post-rotation orientation, since that is
/// what the viewer sees. Sources whose aspect falls outside the band clamp
/// to the band edge; inside the band the width that exactly reproduces the
/// source aspect is used, snapped to the preferred width when it is within
/// `preference_strength` pixels of it.
#[must_use]
pub fn select_target(
    source: VideoGeometry,
    rotation: Option<Rotation>,
    policy: &TargetPolicy,
) -> VideoGeometry {
    let effective = if rotation.is_some() {
        source.swapped()
    } else {
        source
    };
    let source_aspect = effective.aspect();

    let height = f64::from(policy.height);
    let min_aspect = f64::from(policy.width_min) / height;
    let max_aspect = f64::from(policy.width_max) / height;

    let width = if source_aspect <= min_aspect {
        policy.width_min
    } else if source_aspect >= max_aspect {
        policy.width_max
    } else {
        let natural = (source_aspect * height).round() as u32;
        if natural.abs_diff(policy.width_preferred) <= policy.preference_strength {
            policy.width_preferred
        } else {
            natural.clamp(policy.width_min, policy.width_max)
        }
    };

    VideoGeometry::new(width, policy.height)
}
