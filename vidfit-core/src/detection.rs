//! Black bar detection and crop rectangle selection.
//!
//! Samples cropdetect at three points through the video, pools every
//! candidate rectangle the detector reports, and keeps the most frequent
//! exact rectangle. Single-sample detection is unreliable on videos whose
//! early or late frames are dark or static; pooling across three points with
//! a significance floor filters out transient misdetections.

use std::collections::HashMap;
use std::path::Path;

use rayon::prelude::*;

use crate::error::CoreResult;
use crate::external::ffmpeg::sample_crop_window;
use crate::media::{CropBox, VideoGeometry};

/// Sources shorter than this are not sampled.
const MIN_DURATION_SECS: f64 = 2.0;

/// Fractions of the duration where cropdetect windows start.
const SAMPLE_POSITIONS: [f64; 3] = [0.1, 0.5, 0.9];

/// Minimum fraction of a dimension a bar must remove to be trusted.
const SIGNIFICANCE_FLOOR: f64 = 0.02;

/// Detects letterbox/pillarbox bars in a video.
///
/// Returns `Ok(None)` when the duration is unknown or too short to sample,
/// when no candidate rectangles are reported, or when the winning rectangle
/// removes no significant part of the frame.
pub fn detect_bars(
    input_path: &Path,
    source: VideoGeometry,
    duration: Option<f64>,
    window_secs: f64,
) -> CoreResult<Option<CropBox>> {
    let Some(duration) = duration else {
        log::debug!(
            "Skipping bar detection for {}: duration unknown",
            input_path.display()
        );
        return Ok(None);
    };
    if duration < MIN_DURATION_SECS {
        log::debug!(
            "Skipping bar detection for {}: too short ({duration:.1}s)",
            input_path.display()
        );
        return Ok(None);
    }

    // Ordered collect keeps the pool deterministic for the tie-break below.
    let pool: Vec<CropBox> = SAMPLE_POSITIONS
        .par_iter()
        .map(|&position| {
            let start_secs = duration * position;
            match sample_crop_window(input_path, start_secs, window_secs) {
                Ok(lines) => parse_crop_rects(&lines),
                Err(e) => {
                    log::warn!("Crop sample at {start_secs:.1}s failed: {e}");
                    Vec::new()
                }
            }
        })
        .collect::<Vec<Vec<CropBox>>>()
        .into_iter()
        .flatten()
        .collect();

    let Some(best) = most_frequent(&pool) else {
        log::debug!("No bar candidates found in {}", input_path.display());
        return Ok(None);
    };
    Ok(significant_crop(best, source))
}

/// Extracts every `crop=w:h:x:y` rectangle from cropdetect log lines, in
/// order of appearance.
fn parse_crop_rects(lines: &[String]) -> Vec<CropBox> {
    let mut rects = Vec::new();
    for line in lines {
        if let Some(pos) = line.find("crop=") {
            let crop_part = &line[pos + 5..];
            let end = crop_part
                .find(|c: char| c.is_whitespace())
                .unwrap_or(crop_part.len());
            if let Some(rect) = parse_crop_value(&crop_part[..end]) {
                rects.push(rect);
            }
        }
    }
    rects
}

/// Parses a single `w:h:x:y` value.
fn parse_crop_value(value: &str) -> Option<CropBox> {
    let mut parts = value.split(':');
    let width = parts.next()?.parse::<u32>().ok()?;
    let height = parts.next()?.parse::<u32>().ok()?;
    let x = parts.next()?.parse::<u32>().ok()?;
    let y = parts.next()?.parse::<u32>().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(CropBox::new(width, height, x, y))
}

/// The most frequently occurring exact rectangle. Ties resolve to the one
/// first seen in pool order.
fn most_frequent(pool: &[CropBox]) -> Option<CropBox> {
    let mut counts: HashMap<CropBox, (usize, usize)> = HashMap::new();
    for (index, &rect) in pool.iter().enumerate() {
        let entry = counts.entry(rect).or_insert((0, index));
        entry.0 += 1;
    }
    counts
        .iter()
        .max_by(|a, b| {
            let (count_a, first_a) = a.1;
            let (count_b, first_b) = b.1;
            count_a.cmp(count_b).then(first_b.cmp(first_a))
        })
        .map(|(&rect, _)| rect)
}

/// Accepts a rectangle only if it fits the source frame and removes more
/// than the significance floor on either axis.
fn significant_crop(rect: CropBox, source: VideoGeometry) -> Option<CropBox> {
    if !rect.fits_within(source) {
        log::debug!("Discarding out-of-frame crop candidate {rect} for {source}");
        return None;
    }

    let width_removed = f64::from(source.width - rect.width);
    let height_removed = f64::from(source.height - rect.height);
    let significant = width_removed > f64::from(source.width) * SIGNIFICANCE_FLOOR
        || height_removed > f64::from(source.height) * SIGNIFICANCE_FLOOR;

    if significant {
        log::debug!("Accepted bar crop {rect} on {source}");
        Some(rect)
    } else {
        log::debug!("Bar crop {rect} below significance floor on {source}");
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(value: &str) -> CropBox {
        parse_crop_value(value).unwrap()
    }

    #[test]
    fn test_parse_crop_value() {
        assert_eq!(
            parse_crop_value("1920:800:0:140"),
            Some(CropBox::new(1920, 800, 0, 140))
        );
        assert_eq!(parse_crop_value("0:0:0:0"), Some(CropBox::new(0, 0, 0, 0)));

        // Wrong arity
        assert_eq!(parse_crop_value("1920:800:0"), None);
        assert_eq!(parse_crop_value("1920:800:0:140:5"), None);
        assert_eq!(parse_crop_value(""), None);
        // Non-numeric or negative
        assert_eq!(parse_crop_value("w:h:x:y"), None);
        assert_eq!(parse_crop_value("1920:800:0:-10"), None);
        assert_eq!(parse_crop_value("1920.5:800:0:0"), None);
    }

    #[test]
    fn test_parse_crop_rects_from_log_lines() {
        let lines = vec![
            "[Parsed_cropdetect_0 @ 0x7f8] x1:0 x2:1919 y1:140 y2:939 w:1920 h:800 x:0 y:140 pts:0 t:0.000000 crop=1920:800:0:140".to_string(),
            "[Parsed_cropdetect_0 @ 0x7f8] crop=1920:800:0:140 pts:1234 t:1.234".to_string(),
            "[Parsed_cropdetect_0 @ 0x7f8] crop=1920:1080:0:0".to_string(),
            "no rectangle on this line".to_string(),
            "[Parsed_cropdetect_0 @ 0x7f8] crop=invalid:format".to_string(),
        ];
        assert_eq!(
            parse_crop_rects(&lines),
            vec![
                rect("1920:800:0:140"),
                rect("1920:800:0:140"),
                rect("1920:1080:0:0"),
            ]
        );
    }

    #[test]
    fn test_most_frequent_picks_mode() {
        let pool = vec![
            rect("1920:800:0:140"),
            rect("1920:1080:0:0"),
            rect("1920:800:0:140"),
            rect("1920:800:0:140"),
        ];
        assert_eq!(most_frequent(&pool), Some(rect("1920:800:0:140")));
    }

    #[test]
    fn test_most_frequent_tie_breaks_to_first_seen() {
        let pool = vec![
            rect("1920:1040:0:20"),
            rect("1920:800:0:140"),
            rect("1920:800:0:140"),
            rect("1920:1040:0:20"),
        ];
        assert_eq!(most_frequent(&pool), Some(rect("1920:1040:0:20")));

        let pool = vec![
            rect("1920:800:0:140"),
            rect("1920:1040:0:20"),
            rect("1920:1040:0:20"),
            rect("1920:800:0:140"),
        ];
        assert_eq!(most_frequent(&pool), Some(rect("1920:800:0:140")));
    }

    #[test]
    fn test_significance_floor() {
        let source = VideoGeometry::new(1920, 1080);

        // 280px off the height (26%) is well past the floor
        assert_eq!(
            significant_crop(rect("1920:800:0:140"), source),
            Some(rect("1920:800:0:140"))
        );

        // 1% on either axis is noise
        assert_eq!(significant_crop(rect("1900:1070:10:5"), source), None);

        // Removal at (not past) the floor is rejected
        let at_floor = CropBox::new(1920 - 38, 1080, 19, 0);
        assert!(f64::from(38u32) <= 1920.0 * SIGNIFICANCE_FLOOR);
        assert_eq!(significant_crop(at_floor, source), None);

        // Just past the floor on width alone is accepted
        assert_eq!(
            significant_crop(rect("1880:1080:20:0"), source),
            Some(rect("1880:1080:20:0"))
        );

        // A rectangle that does not fit the frame is parser noise
        assert_eq!(significant_crop(rect("1920:1080:0:140"), source), None);
    }

    #[test]
    fn test_detect_bars_skips_short_or_unknown_duration() {
        let source = VideoGeometry::new(1920, 1080);
        let path = Path::new("does-not-exist.mp4");

        // Neither of these reaches the sampler, so the missing file is fine
        assert_eq!(detect_bars(path, source, None, 3.0).unwrap(), None);
        assert_eq!(detect_bars(path, source, Some(1.5), 3.0).unwrap(), None);
    }
}
