//! Basic media geometry types shared across probing, detection and fitting.

use serde::Serialize;

/// Pixel dimensions of a video frame. Both dimensions are strictly positive;
/// a source whose dimensions cannot be determined is represented as
/// `Option<VideoGeometry>::None`, never as zeros.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VideoGeometry {
    pub width: u32,
    pub height: u32,
}

impl VideoGeometry {
    pub fn new(width: u32, height: u32) -> Self {
        debug_assert!(width > 0 && height > 0);
        Self { width, height }
    }

    /// Width-to-height ratio.
    #[must_use]
    pub fn aspect(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }

    /// The same frame with width and height exchanged, as seen after a
    /// 90 degree rotation.
    #[must_use]
    pub fn swapped(&self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }
}

impl std::fmt::Display for VideoGeometry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A sub-rectangle of a frame, in the `w:h:x:y` form ffmpeg's crop filter
/// takes. Invariant: `x + width` and `y + height` stay within the frame the
/// box applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CropBox {
    pub width: u32,
    pub height: u32,
    pub x: u32,
    pub y: u32,
}

impl CropBox {
    pub fn new(width: u32, height: u32, x: u32, y: u32) -> Self {
        Self {
            width,
            height,
            x,
            y,
        }
    }

    /// Whether this box lies entirely within `frame`.
    #[must_use]
    pub fn fits_within(&self, frame: VideoGeometry) -> bool {
        self.width > 0
            && self.height > 0
            && self.x.checked_add(self.width).is_some_and(|r| r <= frame.width)
            && self.y.checked_add(self.height).is_some_and(|b| b <= frame.height)
    }

    /// The dimensions of the cropped frame.
    #[must_use]
    pub fn geometry(&self) -> VideoGeometry {
        VideoGeometry::new(self.width, self.height)
    }
}

impl std::fmt::Display for CropBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}:{}", self.width, self.height, self.x, self.y)
    }
}

/// Stream and container metadata returned by the probe. Either field may be
/// absent; downstream code treats absence as a normal state.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MediaInfo {
    /// Dimensions of the first video stream, if one was found.
    pub geometry: Option<VideoGeometry>,
    /// Container duration in seconds, if reported.
    pub duration: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aspect_and_swap() {
        let geom = VideoGeometry::new(1920, 1080);
        assert!((geom.aspect() - 16.0 / 9.0).abs() < 1e-9);
        assert_eq!(geom.swapped(), VideoGeometry::new(1080, 1920));
        assert_eq!(geom.swapped().swapped(), geom);
    }

    #[test]
    fn test_crop_box_fits_within() {
        let frame = VideoGeometry::new(1920, 1080);

        assert!(CropBox::new(1920, 1080, 0, 0).fits_within(frame));
        assert!(CropBox::new(1920, 800, 0, 140).fits_within(frame));
        assert!(CropBox::new(100, 100, 1820, 980).fits_within(frame));

        // Overhangs the frame
        assert!(!CropBox::new(1920, 800, 0, 281).fits_within(frame));
        assert!(!CropBox::new(1921, 1080, 0, 0).fits_within(frame));
        // Degenerate boxes never fit
        assert!(!CropBox::new(0, 1080, 0, 0).fits_within(frame));
        assert!(!CropBox::new(1920, 0, 0, 0).fits_within(frame));
        // Offset arithmetic must not overflow
        assert!(!CropBox::new(u32::MAX, 100, u32::MAX, 0).fits_within(frame));
    }

    #[test]
    fn test_display_forms() {
        assert_eq!(VideoGeometry::new(800, 480).to_string(), "800x480");
        assert_eq!(CropBox::new(1920, 800, 0, 140).to_string(), "1920:800:0:140");
    }
}
