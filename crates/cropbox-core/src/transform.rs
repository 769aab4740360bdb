use serde::{Deserialize, Serialize};

use crate::consts::{MAX_ZOOM_RATIO, MIN_ZOOM_RATIO, ZOOM_SLIDER_SCALE};
use crate::viewport::Viewport;

/// What to do with pan offsets that push the crop window off the image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundsPolicy {
    /// Offsets are taken as-is; panning arbitrarily far off-frame is allowed.
    #[default]
    Unconstrained,
    /// Offsets are clamped so the viewport stays covered by the image
    /// wherever the scaled image is large enough to cover it.
    Clamp,
}

/// The pan/zoom mapping from source-image space to viewport space.
///
/// `offset_x`/`offset_y` place the source image's top-left corner in
/// viewport coordinates; `ratio` scales source pixels to viewport pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub ratio: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    /// Accumulated rotation applied around the viewport center at render
    /// time.
    #[cfg(feature = "rotate")]
    pub rotation_degrees: f64,
}

/// Map a zoom-slider value in the [-20, 20] control range to a
/// zoom ratio, clamped so the ratio stays positive.
pub fn slider_to_ratio(value: f64) -> f64 {
    (1.0 + value / ZOOM_SLIDER_SCALE).clamp(MIN_ZOOM_RATIO, MAX_ZOOM_RATIO)
}

impl Transform {
    /// Identity zoom with the image centered in the viewport.
    pub fn centered(natural_w: u32, natural_h: u32, viewport: Viewport) -> Self {
        Self::centered_at_ratio(natural_w, natural_h, viewport, 1.0)
    }

    pub fn centered_at_ratio(
        natural_w: u32,
        natural_h: u32,
        viewport: Viewport,
        ratio: f64,
    ) -> Self {
        let ratio = ratio.clamp(MIN_ZOOM_RATIO, MAX_ZOOM_RATIO);
        Self {
            ratio,
            offset_x: (viewport.width as f64 - natural_w as f64 * ratio) / 2.0,
            offset_y: (viewport.height as f64 - natural_h as f64 * ratio) / 2.0,
            #[cfg(feature = "rotate")]
            rotation_degrees: 0.0,
        }
    }

    /// Accumulate a rotation delta, in degrees.
    #[cfg(feature = "rotate")]
    pub fn rotate(&mut self, delta_degrees: f64) {
        self.rotation_degrees = (self.rotation_degrees + delta_degrees) % 360.0;
    }

    /// Displayed (scaled) image size in viewport pixels.
    pub fn displayed_size(&self, natural_w: u32, natural_h: u32) -> (f64, f64) {
        (natural_w as f64 * self.ratio, natural_h as f64 * self.ratio)
    }

    /// Change the zoom ratio while keeping the source point currently under
    /// the viewport's center stationary on screen.
    pub fn set_ratio(&mut self, new_ratio: f64, viewport: Viewport) {
        let new_ratio = new_ratio.clamp(MIN_ZOOM_RATIO, MAX_ZOOM_RATIO);
        if new_ratio == self.ratio {
            return;
        }
        let cx = viewport.width as f64 / 2.0;
        let cy = viewport.height as f64 / 2.0;
        let src_x = (cx - self.offset_x) / self.ratio;
        let src_y = (cy - self.offset_y) / self.ratio;
        self.offset_x = cx - src_x * new_ratio;
        self.offset_y = cy - src_y * new_ratio;
        self.ratio = new_ratio;
    }

    /// Add a drag delta to the offset.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.offset_x += dx;
        self.offset_y += dy;
    }

    /// Apply `BoundsPolicy::Clamp`: keep the viewport covered where the
    /// scaled image can cover it, and center the image on axes where it
    /// cannot.
    pub fn clamp_offset(&mut self, natural_w: u32, natural_h: u32, viewport: Viewport) {
        let (dw, dh) = self.displayed_size(natural_w, natural_h);
        let vw = viewport.width as f64;
        let vh = viewport.height as f64;

        self.offset_x = if dw >= vw {
            self.offset_x.clamp(vw - dw, 0.0)
        } else {
            (vw - dw) / 2.0
        };
        self.offset_y = if dh >= vh {
            self.offset_y.clamp(vh - dh, 0.0)
        } else {
            (vh - dh) / 2.0
        };
    }

    /// The source-image sub-rectangle visible through the viewport under
    /// this transform. Coordinates are in source pixels and may lie outside
    /// the image bounds.
    pub fn source_window(&self, viewport: Viewport) -> SourceWindow {
        SourceWindow {
            x: -self.offset_x / self.ratio,
            y: -self.offset_y / self.ratio,
            width: viewport.width as f64 / self.ratio,
            height: viewport.height as f64 / self.ratio,
        }
    }
}

/// A viewport-shaped rectangle expressed in source-image coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SourceWindow {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl SourceWindow {
    /// Whether any part of the window overlaps a `w` x `h` image.
    pub fn intersects(&self, w: u32, h: u32) -> bool {
        self.x < w as f64 && self.y < h as f64 && self.x + self.width > 0.0 && self.y + self.height > 0.0
    }

    /// Shift the window to the nearest position overlapping a `w` x `h`
    /// image. Size is unchanged; a window larger than the image is aligned
    /// to its top-left corner.
    pub fn shifted_into(&self, w: u32, h: u32) -> SourceWindow {
        let max_x = (w as f64 - self.width).max(0.0);
        let max_y = (h as f64 - self.height).max(0.0);
        SourceWindow {
            x: self.x.clamp(0.0, max_x),
            y: self.y.clamp(0.0, max_y),
            width: self.width,
            height: self.height,
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn vp() -> Viewport {
        Viewport::new(200, 200).unwrap()
    }

    #[test]
    fn test_slider_to_ratio() {
        assert!((slider_to_ratio(0.0) - 1.0).abs() < 1e-12);
        assert!((slider_to_ratio(20.0) - 2.0).abs() < 1e-12);
        assert!((slider_to_ratio(10.0) - 1.5).abs() < 1e-12);
        // Slider floor must not produce a non-positive ratio.
        assert!(slider_to_ratio(-20.0) > 0.0);
    }

    #[test]
    fn test_centered_offset() {
        let t = Transform::centered(400, 300, vp());
        assert_relative_eq!(t.offset_x, -100.0);
        assert_relative_eq!(t.offset_y, -50.0);
        assert_relative_eq!(t.ratio, 1.0);
    }

    #[test]
    fn test_set_ratio_preserves_center() {
        let viewport = vp();
        let mut t = Transform::centered(400, 300, viewport);
        t.pan(13.0, -7.0);

        let center_src_before = {
            let w = t.source_window(viewport);
            (w.x + w.width / 2.0, w.y + w.height / 2.0)
        };

        t.set_ratio(1.7, viewport);
        t.set_ratio(0.6, viewport);

        let w = t.source_window(viewport);
        let center_src_after = (w.x + w.width / 2.0, w.y + w.height / 2.0);

        assert!((center_src_before.0 - center_src_after.0).abs() < 1.0);
        assert!((center_src_before.1 - center_src_after.1).abs() < 1.0);
    }

    #[test]
    fn test_set_ratio_idempotent() {
        let viewport = vp();
        let mut t = Transform::centered(400, 300, viewport);
        t.set_ratio(2.0, viewport);
        let snapshot = t;
        t.set_ratio(2.0, viewport);
        assert_eq!(t, snapshot);
    }

    #[test]
    fn test_pan_round_trip() {
        let mut t = Transform::centered(400, 300, vp());
        let initial = t;
        t.pan(50.0, 0.0);
        t.pan(-50.0, 0.0);
        assert_eq!(t, initial);
    }

    #[test]
    fn test_source_window_centered() {
        let t = Transform::centered(400, 300, vp());
        let w = t.source_window(vp());
        assert_relative_eq!(w.x, 100.0);
        assert_relative_eq!(w.y, 50.0);
        assert_relative_eq!(w.width, 200.0);
        assert_relative_eq!(w.height, 200.0);
    }

    #[test]
    fn test_clamp_offset_large_image() {
        let viewport = vp();
        let mut t = Transform::centered(400, 300, viewport);
        t.pan(500.0, -500.0);
        t.clamp_offset(400, 300, viewport);
        // x: image wider than viewport, offset in [vw - dw, 0] = [-200, 0]
        assert!((t.offset_x - 0.0).abs() < 1e-12);
        // y: clamped to bottom edge, vh - dh = -100
        assert!((t.offset_y - (-100.0)).abs() < 1e-12);
    }

    #[test]
    fn test_clamp_offset_small_image_recenters() {
        let viewport = vp();
        let mut t = Transform::centered_at_ratio(100, 100, viewport, 1.0);
        t.pan(170.0, 170.0);
        t.clamp_offset(100, 100, viewport);
        assert!((t.offset_x - 50.0).abs() < 1e-12);
        assert!((t.offset_y - 50.0).abs() < 1e-12);
    }

    #[test]
    fn test_window_shifted_into_bounds() {
        let w = SourceWindow {
            x: -500.0,
            y: 900.0,
            width: 200.0,
            height: 200.0,
        };
        assert!(!w.intersects(400, 300));
        let s = w.shifted_into(400, 300);
        assert!((s.x - 0.0).abs() < 1e-12);
        assert!((s.y - 100.0).abs() < 1e-12);
        assert!(s.intersects(400, 300));
    }
}
